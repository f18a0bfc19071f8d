use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalStatus {
    Healthy,
    NeedsAttention,
    UnderTreatment,
}

impl Default for AnimalStatus {
    fn default() -> Self {
        Self::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: String,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub status: AnimalStatus,
}
