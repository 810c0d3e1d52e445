//! Character sheet player.
//!
//! Keeps a character sheet page's derived fields (ability modifiers, skill
//! totals) consistent with what the user types. The controller works against
//! the ports in `ports::outbound`; the browser adapter is selected at compile
//! time for wasm32, and an in-memory page is available everywhere.

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod runner;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use application::{adjust_value, FormController};
pub use runner::config::{ConfigError, ControllerConfig};
pub use runner::{run_headless, HeadlessReport, RowSnapshot};
