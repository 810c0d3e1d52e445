//! Game system implementations.
//!
//! Each system implements the core traits defined in `traits.rs`.
//!
//! # Supported Systems
//!
//! - Pathfinder 1e (`pf1e`)

mod pf1e;
mod traits;

// Pathfinder 1e exports
pub use pf1e::{skill_ability as pf1e_skill_ability, Pathfinder1eSystem};

// Core traits
pub use traits::{
    BabProgression, BonusType, CalculationEngine, GameSystem, SaveProgression, TypedBonus,
};
