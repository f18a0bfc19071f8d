use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl FromStr for RecurrencePattern {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown recurrence pattern '{other}'")),
        }
    }
}

/// A field-level rejection from `validate`, naming the field so callers
/// can surface the message next to the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Raw timing fields as submitted by a caller, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleInput {
    pub schedule_date: Option<String>,
    pub schedule_times: Vec<String>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub end_date: Option<String>,
}

/// The validated timing portion of a task: a date, zero or more HH:mm
/// slots, and an optional Daily/Weekly/Monthly rule with an end date.
/// Only produced by `validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    #[serde(default)]
    pub schedule_date: Option<String>,
    #[serde(default)]
    pub schedule_times: Vec<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<RecurrencePattern>,
    #[serde(default)]
    pub end_date: Option<String>,
}

// Shape check only: two digits, colon, two digits. Hour and minute
// ranges are intentionally not bounded ("99:99" passes), matching the
// acceptance behavior this store has always had.
fn is_hh_mm(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b':'
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_digit()
}

fn parse_date(value: &str) -> Option<Date> {
    Date::parse(value, DATE_FORMAT).ok()
}

fn normalize_date_field(value: Option<&String>) -> Option<String> {
    value
        .map(|raw| raw.trim())
        .filter(|trimmed| !trimmed.is_empty())
        .map(|trimmed| trimmed.to_string())
}

/// Validate raw schedule fields into a normalized `ScheduleSpec`, or
/// report every field-level problem at once. Blank time entries are
/// dropped during normalization rather than rejected; whether at least
/// one slot must remain is the task-creation boundary's rule, not a
/// field rule.
pub fn validate(input: &ScheduleInput) -> Result<ScheduleSpec, Vec<FieldError>> {
    let mut errors = Vec::new();

    let mut schedule_times = Vec::new();
    for raw in &input.schedule_times {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_hh_mm(trimmed) {
            schedule_times.push(trimmed.to_string());
        } else {
            errors.push(FieldError {
                field: "schedule_times",
                message: format!("Each schedule time must be in HH:mm format: '{trimmed}'"),
            });
        }
    }

    let schedule_date = normalize_date_field(input.schedule_date.as_ref());
    let end_date = normalize_date_field(input.end_date.as_ref());

    if schedule_date.is_none() && (input.is_recurring || !schedule_times.is_empty()) {
        errors.push(FieldError {
            field: "schedule_date",
            message: "Schedule date is required".to_string(),
        });
    }

    let parsed_start = match schedule_date.as_deref() {
        Some(value) => {
            let parsed = parse_date(value);
            if parsed.is_none() {
                errors.push(FieldError {
                    field: "schedule_date",
                    message: format!("Schedule date must be a YYYY-MM-DD date: '{value}'"),
                });
            }
            parsed
        }
        None => None,
    };

    if input.is_recurring {
        if input.recurrence_pattern.is_none() {
            errors.push(FieldError {
                field: "recurrence_pattern",
                message: "Recurrence pattern is required for recurring tasks".to_string(),
            });
        }
        if end_date.is_none() {
            errors.push(FieldError {
                field: "end_date",
                message: "End date is required for recurring tasks".to_string(),
            });
        }
    }

    let parsed_end = match end_date.as_deref() {
        Some(value) => {
            let parsed = parse_date(value);
            if parsed.is_none() {
                errors.push(FieldError {
                    field: "end_date",
                    message: format!("End date must be a YYYY-MM-DD date: '{value}'"),
                });
            }
            parsed
        }
        None => None,
    };

    if let (Some(start), Some(end)) = (parsed_start, parsed_end)
        && end < start
    {
        errors.push(FieldError {
            field: "end_date",
            message: "End date must be after or equal to the start date.".to_string(),
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ScheduleSpec {
        schedule_date,
        schedule_times,
        is_recurring: input.is_recurring,
        recurrence_pattern: input.recurrence_pattern,
        end_date,
    })
}

/// Whether the stored rule produces an occurrence on `day`. The rule is
/// never expanded into concrete future occurrences; calendar views call
/// this per viewed day instead.
pub fn occurs_on(spec: &ScheduleSpec, day: Date) -> Result<bool, AppError> {
    let start = match spec.schedule_date.as_deref() {
        Some(value) => parse_date(value)
            .ok_or_else(|| AppError::invalid_data("schedule_date must be YYYY-MM-DD"))?,
        None => return Ok(false),
    };

    if !spec.is_recurring {
        return Ok(day == start);
    }

    let end = match spec.end_date.as_deref() {
        Some(value) => parse_date(value)
            .ok_or_else(|| AppError::invalid_data("end_date must be YYYY-MM-DD"))?,
        None => return Err(AppError::invalid_data("recurring schedule is missing an end date")),
    };

    if day < start || day > end {
        return Ok(false);
    }

    let pattern = spec
        .recurrence_pattern
        .ok_or_else(|| AppError::invalid_data("recurring schedule is missing a pattern"))?;

    Ok(match pattern {
        RecurrencePattern::Daily => true,
        RecurrencePattern::Weekly => day.weekday() == start.weekday(),
        // Short months simply produce no occurrence for day 29-31.
        RecurrencePattern::Monthly => day.day() == start.day(),
    })
}
