use crate::error::AppError;
use crate::model::{Animal, BehaviorRecord, CareTask, User, VetAssignment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    schema_version: u32,
    #[serde(default)]
    tasks: Vec<CareTask>,
    #[serde(default)]
    animals: Vec<Animal>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    behaviors: Vec<BehaviorRecord>,
    #[serde(default)]
    assignments: Vec<VetAssignment>,
}

/// The whole shelter document. Every mutation is a single
/// load-modify-save of this one value, so related writes (a behavior
/// record and the animal flag it sets) land or fail together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelterState {
    pub tasks: Vec<CareTask>,
    pub animals: Vec<Animal>,
    pub users: Vec<User>,
    pub behaviors: Vec<BehaviorRecord>,
    pub assignments: Vec<VetAssignment>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var("SHELTERCARE_STORE_PATH")
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("sheltercare")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("sheltercare")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_state(path: &Path) -> Result<ShelterState, AppError> {
    if !path.exists() {
        return Ok(ShelterState::default());
    }

    let content = std::fs::read_to_string(path).map_err(|err| AppError::io(err.to_string()))?;
    let stored: StoredState =
        serde_json::from_str(&content).map_err(|err| AppError::invalid_data(err.to_string()))?;

    if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    Ok(ShelterState {
        tasks: stored.tasks,
        animals: stored.animals,
        users: stored.users,
        behaviors: stored.behaviors,
        assignments: stored.assignments,
    })
}

pub fn save_state(path: &Path, state: &ShelterState) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredState {
        schema_version: SCHEMA_VERSION,
        tasks: state.tasks.to_vec(),
        animals: state.animals.to_vec(),
        users: state.users.to_vec(),
        behaviors: state.behaviors.to_vec(),
        assignments: state.assignments.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}
