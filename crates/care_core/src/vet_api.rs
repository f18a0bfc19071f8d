use crate::error::AppError;
use crate::model::{Role, User, VetAssignment};
use crate::storage::json_store::{self, ShelterState};
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn assign_vet(animal_id: &str, vet_id: &str, reason: &str) -> Result<VetAssignment, AppError> {
    let path = json_store::store_path()?;
    assign_vet_with_path(&path, animal_id, vet_id, reason)
}

pub fn current_assignment(animal_id: &str) -> Result<Option<VetAssignment>, AppError> {
    let path = json_store::store_path()?;
    current_assignment_with_path(&path, animal_id)
}

pub fn list_vets() -> Result<Vec<User>, AppError> {
    let path = json_store::store_path()?;
    let state = json_store::load_state(&path)?;
    Ok(state
        .users
        .iter()
        .filter(|user| user.role == Role::Veterinarian)
        .cloned()
        .collect())
}

fn check_animal(state: &ShelterState, animal_id: &str) -> Result<String, AppError> {
    let trimmed = animal_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("animal id is required"));
    }
    if !state.animals.iter().any(|animal| animal.id == trimmed) {
        return Err(AppError::not_found("animal not found"));
    }
    Ok(trimmed.to_string())
}

// Always appends a new row. A reassignment is not an update in place:
// the previous row stays for history and "current" is recomputed from
// assigned_at on every read. Concurrent assigns may both land; the
// later timestamp wins on the next read.
fn assign_vet_with_path(
    path: &Path,
    animal_id: &str,
    vet_id: &str,
    reason: &str,
) -> Result<VetAssignment, AppError> {
    let trimmed_reason = reason.trim();
    if trimmed_reason.is_empty() {
        return Err(AppError::invalid_input("reason is required"));
    }

    let mut state = json_store::load_state(path)?;
    let animal_id = check_animal(&state, animal_id)?;

    let trimmed_vet = vet_id.trim();
    let is_vet = state
        .users
        .iter()
        .any(|user| user.id == trimmed_vet && user.role == Role::Veterinarian);
    if !is_vet {
        return Err(AppError::not_found("veterinarian not found"));
    }

    let assigned_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    let id = format!(
        "assignment-{}",
        OffsetDateTime::now_utc().unix_timestamp_nanos()
    );

    let assignment = VetAssignment {
        id,
        animal_id,
        vet_id: trimmed_vet.to_string(),
        reason: trimmed_reason.to_string(),
        assigned_at,
        status: None,
    };

    state.assignments.push(assignment.clone());
    json_store::save_state(path, &state)?;

    Ok(assignment)
}

// Max-assigned_at scan over the animal's rows; on equal timestamps the
// later row wins. No assignment is a normal answer, not an error.
fn current_assignment_with_path(
    path: &Path,
    animal_id: &str,
) -> Result<Option<VetAssignment>, AppError> {
    let state = json_store::load_state(path)?;
    let animal_id = check_animal(&state, animal_id)?;

    let mut current: Option<(OffsetDateTime, &VetAssignment)> = None;
    for assignment in &state.assignments {
        if assignment.animal_id != animal_id {
            continue;
        }
        let assigned = OffsetDateTime::parse(&assignment.assigned_at, &Rfc3339)
            .map_err(|_| AppError::invalid_data("assigned_at must be RFC3339"))?;
        match current {
            Some((best, _)) if assigned < best => {}
            _ => current = Some((assigned, assignment)),
        }
    }

    Ok(current.map(|(_, assignment)| assignment.clone()))
}
