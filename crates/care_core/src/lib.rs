pub mod behavior_api;
pub mod config;
pub mod error;
pub mod model;
pub mod roster;
pub mod schedule;
pub mod storage;
pub mod task_api;
pub mod vet_api;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{CareTask, TaskStatus, TaskType};
    use crate::schedule::ScheduleSpec;

    #[test]
    fn care_task_has_required_fields() {
        let task = CareTask {
            id: "task-1".to_string(),
            task_type: TaskType::Feeding,
            assigned_to: "user-1".to_string(),
            animal_id: "animal-1".to_string(),
            schedule: ScheduleSpec {
                schedule_date: Some("2024-06-01".to_string()),
                schedule_times: vec!["08:00".to_string()],
                ..ScheduleSpec::default()
            },
            status: TaskStatus::Pending,
            created_at: "2024-05-01T00:00:00Z".to_string(),
            completed_at: None,
            image_proof: None,
            completion_verified: false,
        };

        assert_eq!(task.id, "task-1");
        assert_eq!(task.task_type, TaskType::Feeding);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.image_proof, None);
        assert!(!task.completion_verified);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing reason");
        assert_eq!(err.code(), "invalid_input");

        let err = AppError::forbidden("admins only");
        assert_eq!(err.code(), "forbidden");

        let err = AppError::not_found("animal not found");
        assert_eq!(err.code(), "not_found");
    }
}
