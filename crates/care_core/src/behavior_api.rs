use crate::error::AppError;
use crate::model::{AnimalStatus, BehaviorRecord, Eating, Mood, Movement};
use crate::storage::json_store::{self, ShelterState};
use serde::Serialize;
use std::path::Path;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
pub const DEFAULT_SUMMARY_DAYS: u32 = 7;

#[derive(Debug, Clone)]
pub struct NewBehavior {
    pub animal_id: String,
    pub recorded_by: String,
    pub eating: Eating,
    pub movement: Movement,
    pub mood: Mood,
    pub notes: String,
    pub video_proof: Option<String>,
}

/// The stored record plus the derived verdict. The verdict is computed
/// here and again on every read; it is never persisted.
#[derive(Debug, Clone)]
pub struct RecordedBehavior {
    pub record: BehaviorRecord,
    pub critical: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EatingCounts {
    pub normal: u32,
    pub low: u32,
    pub none: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MovementCounts {
    pub active: u32,
    pub lazy: u32,
    pub limping: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoodCounts {
    pub calm: u32,
    pub aggressive: u32,
    pub anxious: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: String,
    pub eating: EatingCounts,
    pub movement: MovementCounts,
    pub mood: MoodCounts,
    pub total: u32,
}

pub fn record_behavior(new_behavior: &NewBehavior) -> Result<RecordedBehavior, AppError> {
    let path = json_store::store_path()?;
    record_behavior_with_path(&path, new_behavior)
}

pub fn list_behaviors(animal_id: &str) -> Result<Vec<BehaviorRecord>, AppError> {
    let path = json_store::store_path()?;
    list_behaviors_with_path(&path, animal_id)
}

pub fn summary(range_days: u32) -> Result<Vec<DaySummary>, AppError> {
    let path = json_store::store_path()?;
    let today = OffsetDateTime::now_utc().date();
    summary_with_path(&path, range_days, today)
}

fn record_behavior_with_path(
    path: &Path,
    new_behavior: &NewBehavior,
) -> Result<RecordedBehavior, AppError> {
    let mut state = json_store::load_state(path)?;

    let animal_index = resolve_animal_index(&state, &new_behavior.animal_id)?;
    let recorded_by = new_behavior.recorded_by.trim().to_string();
    if !state.users.iter().any(|user| user.id == recorded_by) {
        return Err(AppError::not_found("recording user not found"));
    }

    let recorded_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    let id = format!(
        "behavior-{}",
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    );

    let record = BehaviorRecord {
        id,
        animal_id: state.animals[animal_index].id.clone(),
        recorded_by,
        eating: new_behavior.eating,
        movement: new_behavior.movement,
        mood: new_behavior.mood,
        notes: new_behavior.notes.trim().to_string(),
        video_proof: new_behavior
            .video_proof
            .as_deref()
            .map(|value| value.trim())
            .filter(|trimmed| !trimmed.is_empty())
            .map(|trimmed| trimmed.to_string()),
        recorded_at,
    };

    let critical = record.is_critical();
    // One-way flag: nothing in this workflow clears NeedsAttention, the
    // roster's clear_attention action does. Record and flag are part of
    // the same document write.
    if critical {
        state.animals[animal_index].status = AnimalStatus::NeedsAttention;
    }

    state.behaviors.push(record.clone());
    json_store::save_state(path, &state)?;

    Ok(RecordedBehavior { record, critical })
}

fn resolve_animal_index(state: &ShelterState, animal_id: &str) -> Result<usize, AppError> {
    let trimmed = animal_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("animal id is required"));
    }
    state
        .animals
        .iter()
        .position(|animal| animal.id == trimmed)
        .ok_or_else(|| AppError::not_found("animal not found"))
}

fn list_behaviors_with_path(path: &Path, animal_id: &str) -> Result<Vec<BehaviorRecord>, AppError> {
    let state = json_store::load_state(path)?;
    let animal_index = resolve_animal_index(&state, animal_id)?;
    let id = state.animals[animal_index].id.clone();

    Ok(state
        .behaviors
        .iter()
        .filter(|record| record.animal_id == id)
        .cloned()
        .collect())
}

// Per-day counts of each observed value over the trailing range,
// newest day first. Days with no records are included with zero counts
// so a chart over the range has a bucket per day.
fn summary_with_path(path: &Path, range_days: u32, today: Date) -> Result<Vec<DaySummary>, AppError> {
    if range_days == 0 {
        return Err(AppError::invalid_input("range must be at least one day"));
    }

    let state = json_store::load_state(path)?;
    let mut days = Vec::with_capacity(range_days as usize);
    for offset in 0..range_days {
        // Subtraction on Date panics past the calendar's bounds.
        let day = today
            .checked_sub(Duration::days(i64::from(offset)))
            .ok_or_else(|| AppError::invalid_input("range too large"))?;
        let date = day
            .format(DATE_FORMAT)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        days.push((day, DaySummary {
            date,
            ..DaySummary::default()
        }));
    }

    for record in &state.behaviors {
        let recorded = OffsetDateTime::parse(&record.recorded_at, &Rfc3339)
            .map_err(|_| AppError::invalid_data("recorded_at must be RFC3339"))?;
        let recorded_date = recorded.date();

        let Some((_, summary)) = days.iter_mut().find(|(day, _)| *day == recorded_date) else {
            continue;
        };

        match record.eating {
            Eating::Normal => summary.eating.normal += 1,
            Eating::Low => summary.eating.low += 1,
            Eating::None => summary.eating.none += 1,
        }
        match record.movement {
            Movement::Active => summary.movement.active += 1,
            Movement::Lazy => summary.movement.lazy += 1,
            Movement::Limping => summary.movement.limping += 1,
        }
        match record.mood {
            Mood::Calm => summary.mood.calm += 1,
            Mood::Aggressive => summary.mood.aggressive += 1,
            Mood::Anxious => summary.mood.anxious += 1,
        }
        summary.total += 1;
    }

    Ok(days.into_iter().map(|(_, summary)| summary).collect())
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_SUMMARY_DAYS, NewBehavior, list_behaviors_with_path, record_behavior_with_path,
        summary_with_path,
    };
    use crate::model::{Animal, AnimalStatus, BehaviorRecord, Eating, Mood, Movement, Role, User};
    use crate::storage::json_store::{self, ShelterState};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use time::macros::date;

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("sheltercare-{nanos}-{file_name}"))
    }

    fn seeded_state() -> ShelterState {
        ShelterState {
            animals: vec![Animal {
                id: "animal-1".to_string(),
                name: "Clover".to_string(),
                species: "goat".to_string(),
                status: AnimalStatus::Healthy,
            }],
            users: vec![User {
                id: "user-care".to_string(),
                name: "Sam".to_string(),
                role: Role::Caretaker,
            }],
            ..ShelterState::default()
        }
    }

    fn observation(eating: Eating, movement: Movement, mood: Mood) -> NewBehavior {
        NewBehavior {
            animal_id: "animal-1".to_string(),
            recorded_by: "user-care".to_string(),
            eating,
            movement,
            mood,
            notes: String::new(),
            video_proof: None,
        }
    }

    fn stored_record(id: &str, recorded_at: &str, eating: Eating) -> BehaviorRecord {
        BehaviorRecord {
            id: id.to_string(),
            animal_id: "animal-1".to_string(),
            recorded_by: "user-care".to_string(),
            eating,
            movement: Movement::Active,
            mood: Mood::Calm,
            notes: String::new(),
            video_proof: None,
            recorded_at: recorded_at.to_string(),
        }
    }

    #[test]
    fn critical_observation_flags_the_animal() {
        let path = temp_path("critical.json");
        json_store::save_state(&path, &seeded_state()).unwrap();

        let recorded = record_behavior_with_path(
            &path,
            &observation(Eating::None, Movement::Active, Mood::Calm),
        )
        .unwrap();
        let loaded = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(recorded.critical);
        assert_eq!(loaded.animals[0].status, AnimalStatus::NeedsAttention);
        assert_eq!(loaded.behaviors.len(), 1);
    }

    #[test]
    fn normal_observation_leaves_animal_status_alone() {
        let path = temp_path("normal.json");
        json_store::save_state(&path, &seeded_state()).unwrap();

        let recorded = record_behavior_with_path(
            &path,
            &observation(Eating::Low, Movement::Active, Mood::Calm),
        )
        .unwrap();
        let loaded = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!recorded.critical);
        assert_eq!(loaded.animals[0].status, AnimalStatus::Healthy);
    }

    #[test]
    fn normal_followup_does_not_clear_the_flag() {
        let path = temp_path("one-way.json");
        let mut state = seeded_state();
        state.animals[0].status = AnimalStatus::NeedsAttention;
        json_store::save_state(&path, &state).unwrap();

        record_behavior_with_path(
            &path,
            &observation(Eating::Normal, Movement::Active, Mood::Calm),
        )
        .unwrap();
        let loaded = json_store::load_state(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.animals[0].status, AnimalStatus::NeedsAttention);
    }

    #[test]
    fn record_rejects_unknown_animal() {
        let path = temp_path("no-animal.json");
        json_store::save_state(&path, &seeded_state()).unwrap();

        let mut input = observation(Eating::Normal, Movement::Active, Mood::Calm);
        input.animal_id = "animal-9".to_string();

        let err = record_behavior_with_path(&path, &input).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn record_rejects_unknown_recorder() {
        let path = temp_path("no-recorder.json");
        json_store::save_state(&path, &seeded_state()).unwrap();

        let mut input = observation(Eating::Normal, Movement::Active, Mood::Calm);
        input.recorded_by = "user-ghost".to_string();

        let err = record_behavior_with_path(&path, &input).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn list_behaviors_filters_by_animal() {
        let path = temp_path("list.json");
        let mut state = seeded_state();
        state.animals.push(Animal {
            id: "animal-2".to_string(),
            name: "Pip".to_string(),
            species: "hen".to_string(),
            status: AnimalStatus::Healthy,
        });
        state
            .behaviors
            .push(stored_record("behavior-1", "2024-06-01T08:00:00Z", Eating::Normal));
        let mut other = stored_record("behavior-2", "2024-06-01T09:00:00Z", Eating::Low);
        other.animal_id = "animal-2".to_string();
        state.behaviors.push(other);
        json_store::save_state(&path, &state).unwrap();

        let records = list_behaviors_with_path(&path, "animal-1").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "behavior-1");
    }

    #[test]
    fn summary_buckets_by_day_newest_first() {
        let path = temp_path("summary.json");
        let mut state = seeded_state();
        state
            .behaviors
            .push(stored_record("behavior-1", "2024-06-07T08:00:00Z", Eating::Normal));
        state
            .behaviors
            .push(stored_record("behavior-2", "2024-06-07T18:00:00Z", Eating::None));
        state
            .behaviors
            .push(stored_record("behavior-3", "2024-06-05T08:00:00Z", Eating::Low));
        // Outside the trailing week; must not be counted.
        state
            .behaviors
            .push(stored_record("behavior-4", "2024-05-20T08:00:00Z", Eating::Normal));
        json_store::save_state(&path, &state).unwrap();

        let summary =
            summary_with_path(&path, DEFAULT_SUMMARY_DAYS, date!(2024 - 06 - 07)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(summary.len(), 7);
        assert_eq!(summary[0].date, "2024-06-07");
        assert_eq!(summary[0].total, 2);
        assert_eq!(summary[0].eating.normal, 1);
        assert_eq!(summary[0].eating.none, 1);
        assert_eq!(summary[0].movement.active, 2);
        assert_eq!(summary[0].mood.calm, 2);
        assert_eq!(summary[2].date, "2024-06-05");
        assert_eq!(summary[2].total, 1);
        assert_eq!(summary[2].eating.low, 1);
        assert_eq!(summary[1].total, 0);
        assert_eq!(summary[6].date, "2024-06-01");
    }

    #[test]
    fn summary_rejects_zero_range() {
        let path = temp_path("summary-zero.json");
        json_store::save_state(&path, &seeded_state()).unwrap();

        let err = summary_with_path(&path, 0, date!(2024 - 06 - 07)).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn summary_rejects_range_past_the_calendar() {
        let path = temp_path("summary-huge.json");
        json_store::save_state(&path, &seeded_state()).unwrap();

        let err = summary_with_path(&path, 10_000_000, date!(2024 - 06 - 07)).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
        assert!(err.message().contains("range too large"));
    }

    #[test]
    fn summary_reports_corrupt_timestamps() {
        let path = temp_path("summary-corrupt.json");
        let mut state = seeded_state();
        state
            .behaviors
            .push(stored_record("behavior-1", "yesterday", Eating::Normal));
        json_store::save_state(&path, &state).unwrap();

        let err = summary_with_path(&path, 7, date!(2024 - 06 - 07)).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }
}
