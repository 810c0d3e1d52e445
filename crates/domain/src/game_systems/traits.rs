//! Game system traits for d20-style sheet mechanics.
//!
//! These traits define the interface for system-specific calculations so
//! the sheet can be derived without hard-coding one rulebook's numbers into
//! the callers.

use serde::{Deserialize, Serialize};

use crate::value_objects::SkillRowInput;

/// Core trait all game systems must implement.
///
/// This trait provides system identification and access to the calculation engine.
pub trait GameSystem: Send + Sync {
    /// Unique identifier for this game system (e.g., "pf1e").
    fn system_id(&self) -> &str;

    /// Human-readable display name (e.g., "Pathfinder 1st Edition").
    fn display_name(&self) -> &str;

    /// Get the calculation engine for this system.
    fn calculation_engine(&self) -> &dyn CalculationEngine;

    /// List of skill names used by this system.
    fn skill_names(&self) -> Vec<&'static str>;
}

/// Calculation rules that vary per game system.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    ///
    /// For d20 systems: floor((score - 10) / 2)
    fn ability_modifier(&self, score: i32) -> i32;

    /// Calculate a skill's total from its parsed row.
    fn skill_total(&self, row: &SkillRowInput) -> i32;

    /// Base attack bonus contributed by `level` levels of one class.
    fn base_attack_bonus(&self, progression: BabProgression, level: u8) -> i32;

    /// Base save bonus contributed by `level` levels of one class.
    fn base_save(&self, progression: SaveProgression, level: u8) -> i32;

    /// Stack typed bonuses according to system rules.
    fn stack_modifiers(&self, bonuses: &[TypedBonus]) -> i32;
}

/// Base attack bonus progression of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BabProgression {
    /// +1 per level (fighters, paladins)
    Fast,
    /// +3/4 per level (clerics, rogues)
    #[default]
    Medium,
    /// +1/2 per level (wizards, sorcerers)
    Slow,
}

/// Saving throw progression of a class for one save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveProgression {
    /// 2 + level/2
    Good,
    /// level/3
    #[default]
    Poor,
}

/// Bonus types that govern stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    Alchemical,
    Armor,
    Circumstance,
    Competence,
    Deflection,
    Dodge,
    Enhancement,
    Insight,
    Luck,
    Morale,
    NaturalArmor,
    Profane,
    Racial,
    Resistance,
    Sacred,
    Shield,
    Size,
    Trait,
    #[default]
    Untyped,
}

impl BonusType {
    /// Whether several bonuses of this type add together.
    pub fn stacks(&self) -> bool {
        matches!(
            self,
            BonusType::Circumstance | BonusType::Dodge | BonusType::Untyped
        )
    }
}

fn active_default() -> bool {
    true
}

/// A bonus (positive) or penalty (negative) from an item, spell, or condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedBonus {
    /// Source of the bonus (e.g., "Cloak of Resistance +1", "Shield spell")
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub bonus_type: BonusType,
    pub value: i32,
    /// Whether this bonus currently applies
    #[serde(default = "active_default")]
    pub active: bool,
}

impl TypedBonus {
    pub fn new(source: impl Into<String>, bonus_type: BonusType, value: i32) -> Self {
        Self {
            source: source.into(),
            bonus_type,
            value,
            active: true,
        }
    }

    /// Create an inactive bonus (for tracking but not applying)
    pub fn inactive(source: impl Into<String>, bonus_type: BonusType, value: i32) -> Self {
        Self {
            active: false,
            ..Self::new(source, bonus_type, value)
        }
    }
}
