//! Platform-specific implementations
//!
//! This module provides implementations of the form document and scheduler
//! ports defined in `ports/outbound`.
//!
//! The browser platform is selected at compile time for wasm32. The in-memory
//! platform is always available: the native binary renders sheets with it,
//! and tests drive the controller through it.

#[cfg(target_arch = "wasm32")]
mod wasm;

pub mod memory;

#[cfg(target_arch = "wasm32")]
pub use wasm::{WebFormDocument, WebScheduler, WebSkillRow};

pub use memory::{ManualScheduler, MemoryDocument, MemorySkillRow};
