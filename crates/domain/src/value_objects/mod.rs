//! Value objects - Immutable objects defined by their attributes

mod ability;
mod form_number;
mod modifier;
mod skill_row;

pub use ability::{ability_modifier, Ability, AbilityScores, DEFAULT_ABILITY_SCORE};
pub use form_number::{form_int_or, parse_form_int, DEFAULT_MISC, DEFAULT_MODIFIER, DEFAULT_RANKS};
pub use modifier::Modifier;
pub use skill_row::{SkillRowInput, CLASS_SKILL_BONUS};
