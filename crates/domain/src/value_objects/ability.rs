//! Ability value object - the six d20 ability scores and their modifiers.
//!
//! Provides type safety for ability references instead of passing the raw
//! short codes ("str", "dex", ...) that the sheet page uses as element ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Score used when a score field is empty or unparseable.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

/// Character abilities, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    /// Strength - physical power
    Str,
    /// Dexterity - agility and reflexes
    Dex,
    /// Constitution - endurance and health
    Con,
    /// Intelligence - reasoning and memory
    Int,
    /// Wisdom - perception and insight
    Wis,
    /// Charisma - force of personality
    Cha,
}

impl Ability {
    /// All abilities in the order the sheet lists them.
    pub const ALL: [Ability; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];

    /// Returns the short lowercase code (e.g., "str", "dex").
    pub fn code(&self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Dex => "dex",
            Self::Con => "con",
            Self::Int => "int",
            Self::Wis => "wis",
            Self::Cha => "cha",
        }
    }

    /// Returns the full name of the ability (e.g., "Strength", "Dexterity").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Dex => "Dexterity",
            Self::Con => "Constitution",
            Self::Int => "Intelligence",
            Self::Wis => "Wisdom",
            Self::Cha => "Charisma",
        }
    }

    /// Element id of the editable score input, e.g. `str_score`.
    pub fn score_field_id(&self) -> String {
        format!("{}_score", self.code())
    }

    /// Element id of the derived modifier display, e.g. `str_mod`.
    pub fn modifier_field_id(&self) -> String {
        format!("{}_mod", self.code())
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Self::Str),
            "dex" | "dexterity" => Ok(Self::Dex),
            "con" | "constitution" => Ok(Self::Con),
            "int" | "intelligence" => Ok(Self::Int),
            "wis" | "wisdom" => Ok(Self::Wis),
            "cha" | "charisma" => Ok(Self::Cha),
            other => Err(DomainError::parse(format!("Unknown ability: {}", other))),
        }
    }
}

/// Modifier for an ability score: `floor((score - 10) / 2)`.
///
/// Rust's `/` truncates toward zero, so this uses Euclidean division on a
/// widened value to get the floor for odd negative differences (8 -> -1,
/// 7 -> -2) without overflowing near `i32::MIN`.
pub fn ability_modifier(score: i32) -> i32 {
    let modifier = (i64::from(score) - i64::from(DEFAULT_ABILITY_SCORE)).div_euclid(2);
    // |modifier| <= (|i32::MIN| + 10) / 2, always representable
    modifier as i32
}

fn default_score() -> i32 {
    DEFAULT_ABILITY_SCORE
}

/// The six ability scores of a character.
///
/// Serialized with the short codes as keys; missing keys default to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "str", default = "default_score")]
    strength: i32,
    #[serde(rename = "dex", default = "default_score")]
    dexterity: i32,
    #[serde(rename = "con", default = "default_score")]
    constitution: i32,
    #[serde(rename = "int", default = "default_score")]
    intelligence: i32,
    #[serde(rename = "wis", default = "default_score")]
    wisdom: i32,
    #[serde(rename = "cha", default = "default_score")]
    charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: DEFAULT_ABILITY_SCORE,
            dexterity: DEFAULT_ABILITY_SCORE,
            constitution: DEFAULT_ABILITY_SCORE,
            intelligence: DEFAULT_ABILITY_SCORE,
            wisdom: DEFAULT_ABILITY_SCORE,
            charisma: DEFAULT_ABILITY_SCORE,
        }
    }
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.strength,
            Ability::Dex => self.dexterity,
            Ability::Con => self.constitution,
            Ability::Int => self.intelligence,
            Ability::Wis => self.wisdom,
            Ability::Cha => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, score: i32) {
        let slot = match ability {
            Ability::Str => &mut self.strength,
            Ability::Dex => &mut self.dexterity,
            Ability::Con => &mut self.constitution,
            Ability::Int => &mut self.intelligence,
            Ability::Wis => &mut self.wisdom,
            Ability::Cha => &mut self.charisma,
        };
        *slot = score;
    }

    /// Builder-style variant of [`AbilityScores::set`].
    pub fn with(mut self, ability: Ability, score: i32) -> Self {
        self.set(ability, score);
        self
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.get(ability))
    }

    /// Iterate `(ability, score)` pairs in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}
