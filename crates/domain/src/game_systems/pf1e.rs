//! Pathfinder 1st Edition game system implementation.
//!
//! PF1e keeps the d20 ability modifier and layers class-based progressions
//! on top of it:
//! - Skills: ranks + ability modifier + misc, with +3 for trained class skills
//! - Base attack bonus: fast, medium, or slow progression per class
//! - Saves: good or poor progression per class and save
//! - Typed bonuses: only dodge, circumstance, and untyped bonuses stack

use std::collections::HashMap;

use super::traits::{
    BabProgression, BonusType, CalculationEngine, GameSystem, SaveProgression, TypedBonus,
};
use crate::value_objects::{ability_modifier, Ability, SkillRowInput};

/// Core rulebook skills and their governing ability.
const SKILLS: &[(&str, Ability)] = &[
    ("Acrobatics", Ability::Dex),
    ("Appraise", Ability::Int),
    ("Bluff", Ability::Cha),
    ("Climb", Ability::Str),
    ("Craft", Ability::Int),
    ("Diplomacy", Ability::Cha),
    ("Disable Device", Ability::Dex),
    ("Disguise", Ability::Cha),
    ("Escape Artist", Ability::Dex),
    ("Fly", Ability::Dex),
    ("Handle Animal", Ability::Cha),
    ("Heal", Ability::Wis),
    ("Intimidate", Ability::Cha),
    ("Knowledge (Arcana)", Ability::Int),
    ("Knowledge (Dungeoneering)", Ability::Int),
    ("Knowledge (Engineering)", Ability::Int),
    ("Knowledge (Geography)", Ability::Int),
    ("Knowledge (History)", Ability::Int),
    ("Knowledge (Local)", Ability::Int),
    ("Knowledge (Nature)", Ability::Int),
    ("Knowledge (Nobility)", Ability::Int),
    ("Knowledge (Planes)", Ability::Int),
    ("Knowledge (Religion)", Ability::Int),
    ("Linguistics", Ability::Int),
    ("Perception", Ability::Wis),
    ("Perform", Ability::Cha),
    ("Profession", Ability::Wis),
    ("Ride", Ability::Dex),
    ("Sense Motive", Ability::Wis),
    ("Sleight of Hand", Ability::Dex),
    ("Spellcraft", Ability::Int),
    ("Stealth", Ability::Dex),
    ("Survival", Ability::Wis),
    ("Swim", Ability::Str),
    ("Use Magic Device", Ability::Cha),
];

/// Keyword fallback for skills missing from the table (homebrew, or
/// subtyped names like "Perform (Oratory)").
const SKILL_KEYWORDS: &[(&[&str], Ability)] = &[
    (
        &["acrobatics", "stealth", "ride", "fly", "sleight", "escape"],
        Ability::Dex,
    ),
    (&["climb", "swim"], Ability::Str),
    (&["perception", "sense", "survival", "heal"], Ability::Wis),
    (
        &["bluff", "diplomacy", "intimidate", "use magic", "perform"],
        Ability::Cha,
    ),
];

/// Get the governing ability for a PF1e skill name.
///
/// Unknown skills default to Intelligence.
pub fn skill_ability(skill_name: &str) -> Ability {
    let normalized = skill_name.trim().to_lowercase();

    if let Some((_, ability)) = SKILLS
        .iter()
        .find(|(name, _)| name.to_lowercase() == normalized)
    {
        return *ability;
    }

    SKILL_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(_, ability)| *ability)
        .unwrap_or(Ability::Int)
}

/// Pathfinder 1st Edition rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pathfinder1eSystem;

impl Pathfinder1eSystem {
    pub fn new() -> Self {
        Self
    }
}

impl GameSystem for Pathfinder1eSystem {
    fn system_id(&self) -> &str {
        "pf1e"
    }

    fn display_name(&self) -> &str {
        "Pathfinder 1st Edition"
    }

    fn calculation_engine(&self) -> &dyn CalculationEngine {
        self
    }

    fn skill_names(&self) -> Vec<&'static str> {
        SKILLS.iter().map(|(name, _)| *name).collect()
    }
}

impl CalculationEngine for Pathfinder1eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        ability_modifier(score)
    }

    fn skill_total(&self, row: &SkillRowInput) -> i32 {
        row.total()
    }

    fn base_attack_bonus(&self, progression: BabProgression, level: u8) -> i32 {
        let level = i32::from(level);
        match progression {
            BabProgression::Fast => level,
            BabProgression::Medium => level * 3 / 4,
            BabProgression::Slow => level / 2,
        }
    }

    fn base_save(&self, progression: SaveProgression, level: u8) -> i32 {
        let level = i32::from(level);
        match progression {
            SaveProgression::Good => 2 + level / 2,
            SaveProgression::Poor => level / 3,
        }
    }

    fn stack_modifiers(&self, bonuses: &[TypedBonus]) -> i32 {
        let mut highest_by_type: HashMap<BonusType, i32> = HashMap::new();
        let mut stacked: i32 = 0;

        for bonus in bonuses.iter().filter(|b| b.active) {
            if bonus.bonus_type.stacks() || bonus.value < 0 {
                // Stacking types and penalties always add
                stacked = stacked.saturating_add(bonus.value);
            } else {
                let current = highest_by_type.entry(bonus.bonus_type).or_insert(0);
                *current = (*current).max(bonus.value);
            }
        }

        highest_by_type
            .values()
            .fold(stacked, |total, value| total.saturating_add(*value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_calculation() {
        let system = Pathfinder1eSystem::new();
        assert_eq!(system.ability_modifier(1), -5);
        assert_eq!(system.ability_modifier(8), -1);
        assert_eq!(system.ability_modifier(10), 0);
        assert_eq!(system.ability_modifier(11), 0);
        assert_eq!(system.ability_modifier(19), 4);
    }

    #[test]
    fn base_attack_bonus_progressions() {
        let system = Pathfinder1eSystem::new();
        assert_eq!(system.base_attack_bonus(BabProgression::Fast, 5), 5);
        assert_eq!(system.base_attack_bonus(BabProgression::Medium, 5), 3);
        assert_eq!(system.base_attack_bonus(BabProgression::Medium, 4), 3);
        assert_eq!(system.base_attack_bonus(BabProgression::Slow, 5), 2);
        assert_eq!(system.base_attack_bonus(BabProgression::Slow, 1), 0);
    }

    #[test]
    fn save_progressions() {
        let system = Pathfinder1eSystem::new();
        assert_eq!(system.base_save(SaveProgression::Good, 1), 2);
        assert_eq!(system.base_save(SaveProgression::Good, 6), 5);
        assert_eq!(system.base_save(SaveProgression::Poor, 1), 0);
        assert_eq!(system.base_save(SaveProgression::Poor, 6), 2);
    }

    #[test]
    fn typed_bonuses_take_highest() {
        let system = Pathfinder1eSystem::new();
        let bonuses = vec![
            TypedBonus::new("Ring of Protection +1", BonusType::Deflection, 1),
            TypedBonus::new("Shield of Faith", BonusType::Deflection, 2),
        ];
        assert_eq!(system.stack_modifiers(&bonuses), 2);
    }

    #[test]
    fn dodge_circumstance_and_untyped_stack() {
        let system = Pathfinder1eSystem::new();
        let bonuses = vec![
            TypedBonus::new("Dodge feat", BonusType::Dodge, 1),
            TypedBonus::new("Haste", BonusType::Dodge, 1),
            TypedBonus::new("Higher ground", BonusType::Circumstance, 1),
            TypedBonus::new("Fighting defensively", BonusType::Untyped, 2),
            TypedBonus::new("Cover", BonusType::Untyped, 4),
        ];
        assert_eq!(system.stack_modifiers(&bonuses), 9);
    }

    #[test]
    fn penalties_stack_and_inactive_bonuses_are_ignored() {
        let system = Pathfinder1eSystem::new();
        let bonuses = vec![
            TypedBonus::new("Mage Armor", BonusType::Armor, 4),
            TypedBonus::new("Sunder", BonusType::Armor, -1),
            TypedBonus::new("Rust", BonusType::Armor, -1),
            TypedBonus::inactive("Bracers of Armor +6", BonusType::Armor, 6),
        ];
        assert_eq!(system.stack_modifiers(&bonuses), 2);
    }

    #[test]
    fn stacking_saturates_at_i32_bounds() {
        let system = Pathfinder1eSystem::new();
        let bonuses = vec![
            TypedBonus::new("Heroism", BonusType::Morale, i32::MAX),
            TypedBonus::new("Flanking", BonusType::Circumstance, i32::MAX),
            TypedBonus::new("Aid", BonusType::Untyped, 5),
        ];
        assert_eq!(system.stack_modifiers(&bonuses), i32::MAX);

        let penalties = vec![
            TypedBonus::new("Drain", BonusType::Untyped, i32::MIN),
            TypedBonus::new("Fatigue", BonusType::Untyped, -1),
        ];
        assert_eq!(system.stack_modifiers(&penalties), i32::MIN);
    }

    #[test]
    fn skill_ability_uses_table_then_keywords() {
        assert_eq!(skill_ability("Acrobatics"), Ability::Dex);
        assert_eq!(skill_ability("disable device"), Ability::Dex);
        assert_eq!(skill_ability("Handle Animal"), Ability::Cha);
        assert_eq!(skill_ability("Profession"), Ability::Wis);
        assert_eq!(skill_ability("Perform (Oratory)"), Ability::Cha);
        assert_eq!(skill_ability("Swim (Underwater)"), Ability::Str);
        assert_eq!(skill_ability("Knowledge (Arcana)"), Ability::Int);
        assert_eq!(skill_ability("Basket Weaving"), Ability::Int);
    }

    #[test]
    fn system_identity() {
        let system = Pathfinder1eSystem::new();
        assert_eq!(system.system_id(), "pf1e");
        assert!(system.skill_names().contains(&"Perception"));
        assert_eq!(
            system
                .calculation_engine()
                .skill_total(&SkillRowInput::new(2, 1, 1, true)),
            6
        );
    }
}
