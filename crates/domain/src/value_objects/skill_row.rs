//! Skill total calculation for a single sheet row.

use serde::{Deserialize, Serialize};

/// Flat bonus for a class skill with at least one rank invested.
pub const CLASS_SKILL_BONUS: i32 = 3;

/// The inputs of one skill row, already parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRowInput {
    /// Modifier of the governing ability
    pub modifier: i32,
    pub ranks: i32,
    pub misc: i32,
    pub class_skill: bool,
}

impl SkillRowInput {
    pub fn new(modifier: i32, ranks: i32, misc: i32, class_skill: bool) -> Self {
        Self {
            modifier,
            ranks,
            misc,
            class_skill,
        }
    }

    /// The class-skill bonus only applies once the skill is trained.
    pub fn class_bonus(&self) -> i32 {
        if self.class_skill && self.ranks > 0 {
            CLASS_SKILL_BONUS
        } else {
            0
        }
    }

    /// `modifier + ranks + misc`, plus the class-skill bonus when it applies.
    ///
    /// Saturates rather than overflowing on absurd inputs.
    pub fn total(&self) -> i32 {
        self.modifier
            .saturating_add(self.ranks)
            .saturating_add(self.misc)
            .saturating_add(self.class_bonus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untrained_class_skill_gets_no_bonus() {
        let row = SkillRowInput::new(2, 0, 1, true);
        assert_eq!(row.class_bonus(), 0);
        assert_eq!(row.total(), 3);
    }

    #[test]
    fn trained_class_skill_gets_bonus() {
        let row = SkillRowInput::new(2, 1, 1, true);
        assert_eq!(row.total(), 6);
    }

    #[test]
    fn cross_class_skill_has_no_bonus() {
        let row = SkillRowInput::new(-1, 4, 0, false);
        assert_eq!(row.total(), 3);
    }

    #[test]
    fn negative_ranks_do_not_trigger_bonus() {
        let row = SkillRowInput::new(0, -2, 0, true);
        assert_eq!(row.total(), -2);
    }

    #[test]
    fn total_saturates() {
        let row = SkillRowInput::new(i32::MAX, 5, 5, true);
        assert_eq!(row.total(), i32::MAX);
    }
}
