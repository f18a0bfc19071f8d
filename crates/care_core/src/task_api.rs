use crate::error::AppError;
use crate::model::{CareTask, Role, TaskStatus, TaskType, User};
use crate::schedule::{self, FieldError, ScheduleInput, ScheduleSpec};
use crate::storage::json_store::{self, ShelterState};
use std::path::Path;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone)]
pub struct NewTask {
    pub task_type: TaskType,
    pub assigned_to: String,
    pub animal_id: String,
    pub schedule: ScheduleInput,
}

#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub task_type: Option<TaskType>,
    pub assigned_to: Option<String>,
    pub animal_id: Option<String>,
    pub schedule: Option<ScheduleInput>,
}

pub fn add_task(actor_id: &str, new_task: &NewTask) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    add_task_with_path(&path, actor_id, new_task)
}

pub fn edit_task(actor_id: &str, id: &str, edit: &TaskEdit) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    edit_task_with_path(&path, actor_id, id, edit)
}

pub fn delete_task(actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    delete_task_with_path(&path, actor_id, id)
}

pub fn get_task(id: &str) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    get_task_with_path(&path, id)
}

pub fn list_tasks() -> Result<Vec<CareTask>, AppError> {
    let path = json_store::store_path()?;
    Ok(json_store::load_state(&path)?.tasks)
}

pub fn list_for_day(day: &str) -> Result<Vec<CareTask>, AppError> {
    let path = json_store::store_path()?;
    list_for_day_with_path(&path, day)
}

pub fn list_for_assignee(user_id: &str) -> Result<Vec<CareTask>, AppError> {
    let path = json_store::store_path()?;
    list_for_assignee_with_path(&path, user_id)
}

pub fn mark_complete(actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    mark_complete_with_path(&path, actor_id, id)
}

pub fn mark_pending(actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    mark_pending_with_path(&path, actor_id, id)
}

pub fn submit_proof(actor_id: &str, id: &str, url: &str) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    submit_proof_with_path(&path, actor_id, id, url)
}

pub fn verify(actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    verify_with_path(&path, actor_id, id)
}

pub fn unverify(actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let path = json_store::store_path()?;
    unverify_with_path(&path, actor_id, id)
}

fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

fn schedule_errors(errors: Vec<FieldError>) -> AppError {
    let joined = errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join("; ");
    AppError::invalid_input(joined)
}

fn validate_schedule_for_task(input: &ScheduleInput) -> Result<ScheduleSpec, AppError> {
    let spec = schedule::validate(input).map_err(schedule_errors)?;
    // Field validation tolerates an empty slot list; a task does not.
    if spec.schedule_times.is_empty() {
        return Err(AppError::invalid_input(
            "at least one schedule time is required",
        ));
    }
    Ok(spec)
}

fn resolve_actor<'a>(state: &'a ShelterState, actor_id: &str) -> Result<&'a User, AppError> {
    let trimmed = actor_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("acting user is required"));
    }
    state
        .users
        .iter()
        .find(|user| user.id == trimmed)
        .ok_or_else(|| AppError::not_found("acting user not found"))
}

fn require_staff(actor: &User, action: &str) -> Result<(), AppError> {
    match actor.role {
        Role::Admin | Role::Caretaker => Ok(()),
        Role::Veterinarian => Err(AppError::forbidden(format!(
            "{action} requires an admin or caretaker"
        ))),
    }
}

fn require_admin(actor: &User, action: &str) -> Result<(), AppError> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("{action} requires an admin")))
    }
}

fn check_references(state: &ShelterState, assigned_to: &str, animal_id: &str) -> Result<(), AppError> {
    if !state.users.iter().any(|user| user.id == assigned_to) {
        return Err(AppError::not_found("assigned user not found"));
    }
    if !state.animals.iter().any(|animal| animal.id == animal_id) {
        return Err(AppError::not_found("animal not found"));
    }
    Ok(())
}

fn find_task_index(state: &ShelterState, id: &str) -> Result<usize, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }
    state
        .tasks
        .iter()
        .position(|task| task.id == trimmed)
        .ok_or_else(|| AppError::not_found("task not found"))
}

fn add_task_with_path(path: &Path, actor_id: &str, new_task: &NewTask) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_staff(actor, "creating a task")?;

    let spec = validate_schedule_for_task(&new_task.schedule)?;
    let assigned_to = new_task.assigned_to.trim().to_string();
    let animal_id = new_task.animal_id.trim().to_string();
    check_references(&state, &assigned_to, &animal_id)?;

    let created_at = now_rfc3339()?;
    let id = format!("task-{}", OffsetDateTime::now_utc().unix_timestamp_nanos());

    let task = CareTask {
        id,
        task_type: new_task.task_type,
        assigned_to,
        animal_id,
        schedule: spec,
        status: TaskStatus::Pending,
        created_at,
        completed_at: None,
        image_proof: None,
        completion_verified: false,
    };

    state.tasks.push(task.clone());
    json_store::save_state(path, &state)?;

    Ok(task)
}

fn edit_task_with_path(
    path: &Path,
    actor_id: &str,
    id: &str,
    edit: &TaskEdit,
) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_staff(actor, "editing a task")?;

    let index = find_task_index(&state, id)?;

    let spec = match edit.schedule.as_ref() {
        Some(input) => Some(validate_schedule_for_task(input)?),
        None => None,
    };

    let assigned_to = edit
        .assigned_to
        .as_deref()
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| state.tasks[index].assigned_to.clone());
    let animal_id = edit
        .animal_id
        .as_deref()
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| state.tasks[index].animal_id.clone());
    check_references(&state, &assigned_to, &animal_id)?;

    let task = &mut state.tasks[index];
    if let Some(task_type) = edit.task_type {
        task.task_type = task_type;
    }
    task.assigned_to = assigned_to;
    task.animal_id = animal_id;
    if let Some(spec) = spec {
        task.schedule = spec;
    }

    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn delete_task_with_path(path: &Path, actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_admin(actor, "deleting a task")?;

    let index = find_task_index(&state, id)?;
    let removed = state.tasks.remove(index);
    json_store::save_state(path, &state)?;

    Ok(removed)
}

fn get_task_with_path(path: &Path, id: &str) -> Result<CareTask, AppError> {
    let state = json_store::load_state(path)?;
    let index = find_task_index(&state, id)?;
    Ok(state.tasks[index].clone())
}

fn list_for_day_with_path(path: &Path, day: &str) -> Result<Vec<CareTask>, AppError> {
    let trimmed = day.trim();
    let day = Date::parse(trimmed, DATE_FORMAT)
        .map_err(|_| AppError::invalid_input("day must be a YYYY-MM-DD date"))?;

    let state = json_store::load_state(path)?;
    let mut matching = Vec::new();
    for task in &state.tasks {
        if schedule::occurs_on(&task.schedule, day)? {
            matching.push(task.clone());
        }
    }
    Ok(matching)
}

fn list_for_assignee_with_path(path: &Path, user_id: &str) -> Result<Vec<CareTask>, AppError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("user id is required"));
    }

    let state = json_store::load_state(path)?;
    if !state.users.iter().any(|user| user.id == trimmed) {
        return Err(AppError::not_found("user not found"));
    }

    Ok(state
        .tasks
        .iter()
        .filter(|task| task.assigned_to == trimmed)
        .cloned()
        .collect())
}

// The caretaker toggle path. Once proof has been submitted the status
// is derived from verification alone, so the toggle is rejected.
fn mark_complete_with_path(path: &Path, actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_staff(actor, "completing a task")?;

    let index = find_task_index(&state, id)?;
    let stamp = now_rfc3339()?;
    let task = &mut state.tasks[index];

    if task.image_proof.is_some() {
        return Err(AppError::invalid_input(
            "status is derived from verification once proof is submitted",
        ));
    }
    if task.status == TaskStatus::Completed {
        return Err(AppError::invalid_input("task already completed"));
    }

    task.status = TaskStatus::Completed;
    if task.completed_at.is_none() {
        task.completed_at = Some(stamp);
    }

    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn mark_pending_with_path(path: &Path, actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_staff(actor, "reopening a task")?;

    let index = find_task_index(&state, id)?;
    let task = &mut state.tasks[index];

    if task.image_proof.is_some() {
        return Err(AppError::invalid_input(
            "status is derived from verification once proof is submitted",
        ));
    }
    if task.status == TaskStatus::Pending {
        return Err(AppError::invalid_input("task is not completed"));
    }

    task.status = TaskStatus::Pending;
    task.completed_at = None;

    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn submit_proof_with_path(
    path: &Path,
    actor_id: &str,
    id: &str,
    url: &str,
) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_staff(actor, "submitting proof")?;

    let trimmed_url = url.trim();
    if trimmed_url.is_empty() {
        return Err(AppError::invalid_input("image proof URL is required"));
    }

    let index = find_task_index(&state, id)?;
    let task = &mut state.tasks[index];
    task.image_proof = Some(trimmed_url.to_string());

    let updated = task.clone();
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn verify_with_path(path: &Path, actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_admin(actor, "verifying completion proof")?;

    let index = find_task_index(&state, id)?;
    let stamp = now_rfc3339()?;
    let task = &mut state.tasks[index];

    if task.image_proof.is_none() {
        return Err(AppError::invalid_input(
            "task has no completion proof to verify",
        ));
    }

    if !task.completion_verified {
        task.completion_verified = true;
        task.status = TaskStatus::Completed;
        if task.completed_at.is_none() {
            task.completed_at = Some(stamp);
        }
        let updated = task.clone();
        json_store::save_state(path, &state)?;
        return Ok(updated);
    }

    // Re-applying the same toggle value is a no-op.
    Ok(task.clone())
}

fn unverify_with_path(path: &Path, actor_id: &str, id: &str) -> Result<CareTask, AppError> {
    let mut state = json_store::load_state(path)?;
    let actor = resolve_actor(&state, actor_id)?;
    require_admin(actor, "withdrawing a verification")?;

    let index = find_task_index(&state, id)?;
    let task = &mut state.tasks[index];

    if task.completion_verified {
        task.completion_verified = false;
        task.status = TaskStatus::Pending;
        task.completed_at = None;
        let updated = task.clone();
        json_store::save_state(path, &state)?;
        return Ok(updated);
    }

    Ok(task.clone())
}
