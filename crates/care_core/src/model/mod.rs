mod animal;
mod assignment;
mod behavior;
mod task;
mod user;

pub use animal::{Animal, AnimalStatus};
pub use assignment::VetAssignment;
pub use behavior::{BehaviorRecord, Eating, Mood, Movement, is_critical};
pub use task::{CareTask, TaskStatus, TaskType};
pub use user::{Role, User};
