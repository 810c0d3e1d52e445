//! Signed ability modifier as shown on the sheet.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ability::ability_modifier;
use super::form_number::{form_int_or, DEFAULT_MODIFIER};

/// An ability modifier.
///
/// Displays with an explicit sign for non-negative values (`+0`, `+3`) and
/// as-is for negative values (`-1`), matching the modifier fields on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifier(i32);

impl Modifier {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// Modifier derived from an ability score.
    pub fn from_score(score: i32) -> Self {
        Self(ability_modifier(score))
    }

    /// Read a modifier back from its displayed text ("+2", "-1", "").
    /// Unreadable text counts as no modifier.
    pub fn from_display(raw: Option<&str>) -> Self {
        Self(form_int_or(raw, DEFAULT_MODIFIER))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for Modifier {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 0 {
            write!(f, "+{}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
