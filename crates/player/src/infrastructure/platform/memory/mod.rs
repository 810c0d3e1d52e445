//! In-memory sheet page and virtual clock.

mod document;
mod scheduler;

pub use document::{MemoryDocument, MemorySkillRow};
pub use scheduler::ManualScheduler;
