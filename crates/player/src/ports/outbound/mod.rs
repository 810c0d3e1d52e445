//! Outbound ports - Interfaces for the hosting page
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the form controller to read and write the sheet without
//! depending on a concrete DOM.

pub mod form_document;
pub mod scheduler;

pub use form_document::{
    FormDocument, Listener, RowPart, SkillRowElement, ROW_ABILITY_ATTRIBUTE, SKILL_ROW_CLASS,
};
pub use scheduler::{DeferredTask, Scheduler};

#[cfg(test)]
pub use scheduler::MockScheduler;
