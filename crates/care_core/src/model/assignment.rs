use serde::{Deserialize, Serialize};

/// One veterinarian-to-animal assignment. Rows are append-only: a
/// reassignment is a new row, and the "current" one is whichever has
/// the latest `assigned_at` at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetAssignment {
    pub id: String,
    pub animal_id: String,
    pub vet_id: String,
    pub reason: String,
    pub assigned_at: String,
    #[serde(default)]
    pub status: Option<String>,
}
