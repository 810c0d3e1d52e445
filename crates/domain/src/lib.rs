//! Character sheet domain.
//!
//! Pure rules for a d20 character sheet: ability modifiers, browser-style
//! form number parsing, skill totals, and the Pathfinder 1e derived
//! statistics the sheet page displays.

pub mod character_sheet;
pub mod error;
pub mod game_systems;
pub mod value_objects;

pub use error::DomainError;

// Re-export game system traits and types
pub use game_systems::{
    pf1e_skill_ability, BabProgression, BonusType, CalculationEngine, GameSystem,
    Pathfinder1eSystem, SaveProgression, TypedBonus,
};

// Re-export character sheet types
pub use character_sheet::{
    apply_form, AbilitySummary, ArmorClass, CharacterSheet, ClassLevel, DerivedSheet, HitPoints,
    SaveBreakdown, Saves, SkillEntry, SkillSummary,
};

// Re-export value objects (explicit list in value_objects/mod.rs)
pub use value_objects::{
    ability_modifier, form_int_or, parse_form_int, Ability, AbilityScores, Modifier,
    SkillRowInput, CLASS_SKILL_BONUS, DEFAULT_ABILITY_SCORE, DEFAULT_MISC, DEFAULT_MODIFIER,
    DEFAULT_RANKS,
};
