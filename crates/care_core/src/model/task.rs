use crate::schedule::ScheduleSpec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Feeding,
    Cleaning,
    HealthCheck,
    Medication,
    Observation,
    WeightMonitoring,
}

impl TaskType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Feeding => "feeding",
            Self::Cleaning => "cleaning",
            Self::HealthCheck => "health_check",
            Self::Medication => "medication",
            Self::Observation => "observation",
            Self::WeightMonitoring => "weight_monitoring",
        }
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "feeding" => Ok(Self::Feeding),
            "cleaning" => Ok(Self::Cleaning),
            "health_check" => Ok(Self::HealthCheck),
            "medication" => Ok(Self::Medication),
            "observation" => Ok(Self::Observation),
            "weight_monitoring" => Ok(Self::WeightMonitoring),
            other => Err(format!("unknown task type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

/// A care task: what has to happen, for which animal, on whose plate,
/// and when. `status`, `completed_at` and `completion_verified` move
/// only through the task_api operations, never by direct field edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareTask {
    pub id: String,
    pub task_type: TaskType,
    pub assigned_to: String,
    pub animal_id: String,
    pub schedule: ScheduleSpec,
    pub status: TaskStatus,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub image_proof: Option<String>,
    #[serde(default)]
    pub completion_verified: bool,
}
