use crate::error::AppError;
use crate::model::{Animal, AnimalStatus, Role, User};
use crate::storage::json_store;
use std::path::Path;
use time::OffsetDateTime;

pub fn add_animal(name: &str, species: &str) -> Result<Animal, AppError> {
    let path = json_store::store_path()?;
    add_animal_with_path(&path, name, species)
}

pub fn get_animal(id: &str) -> Result<Animal, AppError> {
    let path = json_store::store_path()?;
    get_animal_with_path(&path, id)
}

pub fn list_animals() -> Result<Vec<Animal>, AppError> {
    let path = json_store::store_path()?;
    Ok(json_store::load_state(&path)?.animals)
}

/// The manual review step that un-flags an animal. Nothing in the
/// behavior workflow does this automatically.
pub fn clear_attention(id: &str) -> Result<Animal, AppError> {
    let path = json_store::store_path()?;
    clear_attention_with_path(&path, id)
}

pub fn add_user(name: &str, role: Role) -> Result<User, AppError> {
    let path = json_store::store_path()?;
    add_user_with_path(&path, name, role)
}

pub fn list_users() -> Result<Vec<User>, AppError> {
    let path = json_store::store_path()?;
    Ok(json_store::load_state(&path)?.users)
}

fn add_animal_with_path(path: &Path, name: &str, species: &str) -> Result<Animal, AppError> {
    let trimmed_name = name.trim();
    if trimmed_name.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }
    let trimmed_species = species.trim();
    if trimmed_species.is_empty() {
        return Err(AppError::invalid_input("species is required"));
    }

    let id = format!("animal-{}", OffsetDateTime::now_utc().unix_timestamp_nanos());
    let animal = Animal {
        id,
        name: trimmed_name.to_string(),
        species: trimmed_species.to_string(),
        status: AnimalStatus::Healthy,
    };

    let mut state = json_store::load_state(path)?;
    state.animals.push(animal.clone());
    json_store::save_state(path, &state)?;

    Ok(animal)
}

fn get_animal_with_path(path: &Path, id: &str) -> Result<Animal, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let state = json_store::load_state(path)?;
    state
        .animals
        .into_iter()
        .find(|animal| animal.id == trimmed)
        .ok_or_else(|| AppError::not_found("animal not found"))
}

fn clear_attention_with_path(path: &Path, id: &str) -> Result<Animal, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("id is required"));
    }

    let mut state = json_store::load_state(path)?;
    let mut updated_animal = None;

    for animal in &mut state.animals {
        if animal.id == trimmed {
            animal.status = AnimalStatus::Healthy;
            updated_animal = Some(animal.clone());
            break;
        }
    }

    let updated = updated_animal.ok_or_else(|| AppError::not_found("animal not found"))?;
    json_store::save_state(path, &state)?;

    Ok(updated)
}

fn add_user_with_path(path: &Path, name: &str, role: Role) -> Result<User, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }

    let id = format!("user-{}", OffsetDateTime::now_utc().unix_timestamp_nanos());
    let user = User {
        id,
        name: trimmed.to_string(),
        role,
    };

    let mut state = json_store::load_state(path)?;
    state.users.push(user.clone());
    json_store::save_state(path, &state)?;

    Ok(user)
}
