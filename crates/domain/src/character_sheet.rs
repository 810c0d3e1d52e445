//! Character sheet aggregate and its derived statistics.
//!
//! A [`CharacterSheet`] holds what the player edits; [`DerivedSheet`] holds
//! what the page computes from it (modifiers, AC, saves, skill totals).
//! [`apply_form`] folds a submitted sheet form back into a sheet using the
//! same field names the page renders.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::{
    pf1e_skill_ability, BabProgression, BonusType, GameSystem, Pathfinder1eSystem,
    SaveProgression, TypedBonus,
};
use crate::value_objects::{
    Ability, AbilityScores, Modifier, SkillRowInput, DEFAULT_ABILITY_SCORE,
};

/// Base value for armor class and combat maneuver defense.
const DEFENSE_BASE: i32 = 10;

/// Max hit points of a fresh sheet, and the fallback for an empty HP field.
const DEFAULT_MAX_HP: i32 = 10;

static SKILL_RANKS_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^skill_(\d+)_ranks$").expect("valid regex"));

/// Sum without overflowing; sheet values come straight from user input.
fn sum_saturating(values: &[i32]) -> i32 {
    values.iter().fold(0i32, |acc, v| acc.saturating_add(*v))
}

fn default_max_hp() -> i32 {
    DEFAULT_MAX_HP
}

/// Hit point tracking. Current HP is derived from lethal damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    #[serde(default = "default_max_hp")]
    pub max: i32,
    #[serde(default)]
    pub lethal: i32,
    #[serde(default)]
    pub nonlethal: i32,
}

impl Default for HitPoints {
    fn default() -> Self {
        Self {
            max: DEFAULT_MAX_HP,
            lethal: 0,
            nonlethal: 0,
        }
    }
}

impl HitPoints {
    pub fn current(&self) -> i32 {
        self.max.saturating_sub(self.lethal)
    }
}

/// Levels taken in one class, with that class's progressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevel {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub bab: BabProgression,
    #[serde(default)]
    pub fortitude: SaveProgression,
    #[serde(default)]
    pub reflex: SaveProgression,
    #[serde(default)]
    pub will: SaveProgression,
}

/// One skill line on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub id: u32,
    pub name: String,
    pub ability: Ability,
    #[serde(default)]
    pub ranks: i32,
    #[serde(default)]
    pub misc: i32,
    #[serde(default)]
    pub class_skill: bool,
}

impl SkillEntry {
    /// A new, untrained skill whose ability is looked up from its name.
    pub fn named(id: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            ability: pf1e_skill_ability(&name),
            name,
            ranks: 0,
            misc: 0,
            class_skill: false,
        }
    }

    /// Element id prefix used by the sheet form, e.g. `skill_4`.
    pub fn field_key(&self) -> String {
        format!("skill_{}", self.id)
    }
}

/// Everything the player edits on a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    pub name: String,
    #[serde(default)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub hit_points: HitPoints,
    #[serde(default)]
    pub classes: Vec<ClassLevel>,
    #[serde(default)]
    pub bonuses: Vec<TypedBonus>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self::new("")
    }
}

impl CharacterSheet {
    /// A fresh sheet: all scores 10, 10 HP, and the full untrained skill list.
    pub fn new(name: impl Into<String>) -> Self {
        let skills = Pathfinder1eSystem::new()
            .skill_names()
            .into_iter()
            .zip(1u32..)
            .map(|(skill, id)| SkillEntry::named(id, skill))
            .collect();

        Self {
            name: name.into(),
            abilities: AbilityScores::default(),
            hit_points: HitPoints::default(),
            classes: Vec::new(),
            bonuses: Vec::new(),
            skills,
        }
    }

    /// Total character level across all classes.
    pub fn level(&self) -> u32 {
        self.classes.iter().map(|c| u32::from(c.level)).sum()
    }

    pub fn skill(&self, id: u32) -> Option<&SkillEntry> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn skill_mut(&mut self, id: u32) -> Option<&mut SkillEntry> {
        self.skills.iter_mut().find(|s| s.id == id)
    }

    /// Compute every derived value shown on the sheet.
    pub fn derive(&self, system: &dyn GameSystem) -> DerivedSheet {
        let engine = system.calculation_engine();
        let modifier = |ability: Ability| engine.ability_modifier(self.abilities.get(ability));
        let bonus = |bonus_type: BonusType| {
            let matching: Vec<TypedBonus> = self
                .bonuses
                .iter()
                .filter(|b| b.bonus_type == bonus_type)
                .cloned()
                .collect();
            engine.stack_modifiers(&matching)
        };

        let abilities = self
            .abilities
            .iter()
            .map(|(ability, score)| AbilitySummary {
                ability,
                score,
                modifier: Modifier::new(engine.ability_modifier(score)),
            })
            .collect();

        let mut bab = 0i32;
        let (mut base_fort, mut base_ref, mut base_will) = (0i32, 0i32, 0i32);
        for class in &self.classes {
            let level = class.level;
            bab = bab.saturating_add(engine.base_attack_bonus(class.bab, level));
            base_fort = base_fort.saturating_add(engine.base_save(class.fortitude, level));
            base_ref = base_ref.saturating_add(engine.base_save(class.reflex, level));
            base_will = base_will.saturating_add(engine.base_save(class.will, level));
        }

        let str_mod = modifier(Ability::Str);
        let dex_mod = modifier(Ability::Dex);

        let armor = bonus(BonusType::Armor);
        let shield = bonus(BonusType::Shield);
        let natural = bonus(BonusType::NaturalArmor);
        let deflection = bonus(BonusType::Deflection);
        let dodge = bonus(BonusType::Dodge);
        let size = bonus(BonusType::Size);
        let resistance = bonus(BonusType::Resistance);

        let ac = ArmorClass {
            total: sum_saturating(&[
                DEFENSE_BASE,
                armor,
                shield,
                dex_mod,
                size,
                dodge,
                deflection,
                natural,
            ]),
            touch: sum_saturating(&[DEFENSE_BASE, dex_mod, size, dodge, deflection]),
            flat_footed: sum_saturating(&[DEFENSE_BASE, armor, shield, size, deflection, natural]),
        };

        let save = |base: i32, ability: Ability| {
            SaveBreakdown::new(base, modifier(ability), resistance)
        };
        let saves = Saves {
            fortitude: save(base_fort, Ability::Con),
            reflex: save(base_ref, Ability::Dex),
            will: save(base_will, Ability::Wis),
        };

        let skills = self
            .skills
            .iter()
            .map(|skill| {
                let row = SkillRowInput::new(
                    modifier(skill.ability),
                    skill.ranks,
                    skill.misc,
                    skill.class_skill,
                );
                SkillSummary {
                    id: skill.id,
                    name: skill.name.clone(),
                    ability: skill.ability,
                    modifier: Modifier::new(row.modifier),
                    ranks: skill.ranks,
                    misc: skill.misc,
                    class_skill: skill.class_skill,
                    total: engine.skill_total(&row),
                }
            })
            .collect();

        DerivedSheet {
            name: self.name.clone(),
            class_summary: self.class_summary(),
            level: self.level(),
            abilities,
            base_attack_bonus: bab,
            armor_class: ac,
            initiative: dex_mod,
            saves,
            combat_maneuver_bonus: sum_saturating(&[bab, str_mod, size]),
            combat_maneuver_defense: sum_saturating(&[
                DEFENSE_BASE,
                bab,
                str_mod,
                dex_mod,
                size,
                dodge,
                deflection,
            ]),
            hp_max: self.hit_points.max,
            hp_current: self.hit_points.current(),
            hp_nonlethal: self.hit_points.nonlethal,
            skills,
        }
    }

    /// "Fighter (3), Wizard (2)", or "Level 1" for a classless sheet.
    fn class_summary(&self) -> String {
        if self.level() == 0 {
            return "Level 1".to_string();
        }
        self.classes
            .iter()
            .map(|c| format!("{} ({})", c.name, c.level))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Score and modifier of one ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilitySummary {
    pub ability: Ability,
    pub score: i32,
    pub modifier: Modifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorClass {
    pub total: i32,
    pub touch: i32,
    pub flat_footed: i32,
}

/// One saving throw, broken down the way the sheet prints it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBreakdown {
    pub base: i32,
    pub ability: i32,
    pub magic: i32,
    pub misc: i32,
    pub total: i32,
}

impl SaveBreakdown {
    fn new(base: i32, ability: i32, magic: i32) -> Self {
        Self {
            base,
            ability,
            magic,
            misc: 0,
            total: sum_saturating(&[base, ability, magic]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saves {
    pub fortitude: SaveBreakdown,
    pub reflex: SaveBreakdown,
    pub will: SaveBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub id: u32,
    pub name: String,
    pub ability: Ability,
    pub modifier: Modifier,
    pub ranks: i32,
    pub misc: i32,
    pub class_skill: bool,
    pub total: i32,
}

/// Everything the sheet page computes from a [`CharacterSheet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSheet {
    pub name: String,
    pub class_summary: String,
    pub level: u32,
    pub abilities: Vec<AbilitySummary>,
    pub base_attack_bonus: i32,
    pub armor_class: ArmorClass,
    pub initiative: i32,
    pub saves: Saves,
    pub combat_maneuver_bonus: i32,
    pub combat_maneuver_defense: i32,
    pub hp_max: i32,
    pub hp_current: i32,
    pub hp_nonlethal: i32,
    pub skills: Vec<SkillSummary>,
}

/// Parse a submitted number the way the server side does: strict, with an
/// empty field meaning `empty_default`.
fn submitted_int(
    form: &HashMap<String, String>,
    key: &str,
    empty_default: i32,
) -> Result<Option<i32>, DomainError> {
    let Some(raw) = form.get(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Some(empty_default));
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| DomainError::validation(format!("{} must be an integer, got {:?}", key, raw)))
}

/// Apply a submitted sheet form to `sheet`.
///
/// Recognized keys: `name`, `{code}_score`, `hp_total`, `hp_nonlethal`,
/// `hp_current`, and `skill_{id}_ranks` / `skill_{id}_misc` /
/// `skill_{id}_class` (checkbox, `"on"` when ticked). Absent keys leave the
/// sheet unchanged. A malformed ability or HP number rejects the whole form
/// and leaves `sheet` untouched; a malformed skill entry is skipped.
pub fn apply_form(
    sheet: &mut CharacterSheet,
    form: &HashMap<String, String>,
) -> Result<(), DomainError> {
    let mut updated = sheet.clone();

    if let Some(name) = form.get("name") {
        updated.name = name.clone();
    }

    for ability in Ability::ALL {
        let score = submitted_int(form, &ability.score_field_id(), DEFAULT_ABILITY_SCORE)?;
        if let Some(score) = score {
            updated.abilities.set(ability, score);
        }
    }

    if let Some(max) = submitted_int(form, "hp_total", DEFAULT_MAX_HP)? {
        updated.hit_points.max = max;
    }
    if let Some(nonlethal) = submitted_int(form, "hp_nonlethal", 0)? {
        updated.hit_points.nonlethal = nonlethal;
    }
    if let Some(current) = submitted_int(form, "hp_current", 0)? {
        updated.hit_points.lethal = updated.hit_points.max.saturating_sub(current).max(0);
    }

    let mut skill_ids: Vec<u32> = form
        .keys()
        .filter_map(|key| SKILL_RANKS_KEY.captures(key))
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
        .collect();
    skill_ids.sort_unstable();

    for id in skill_ids {
        let mut skill = match updated.skill(id) {
            Some(existing) => existing.clone(),
            None => {
                let name = Pathfinder1eSystem::new()
                    .skill_names()
                    .get((id as usize).wrapping_sub(1))
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("Skill {}", id));
                SkillEntry::named(id, name)
            }
        };

        let key = skill.field_key();
        let ranks = submitted_int(form, &format!("{}_ranks", key), 0);
        let misc = submitted_int(form, &format!("{}_misc", key), 0);
        let (Ok(Some(ranks)), Ok(misc)) = (ranks, misc) else {
            continue;
        };
        skill.ranks = ranks;
        skill.misc = misc.unwrap_or(0);
        skill.class_skill = form
            .get(&format!("{}_class", key))
            .is_some_and(|v| v == "on");

        match updated.skill_mut(id) {
            Some(existing) => *existing = skill,
            None => updated.skills.push(skill),
        }
    }

    *sheet = updated;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter() -> CharacterSheet {
        let mut sheet = CharacterSheet::new("Valeros");
        sheet.abilities = AbilityScores::default()
            .with(Ability::Str, 16)
            .with(Ability::Dex, 14)
            .with(Ability::Con, 14)
            .with(Ability::Wis, 8);
        sheet.classes.push(ClassLevel {
            name: "Fighter".to_string(),
            level: 4,
            bab: BabProgression::Fast,
            fortitude: SaveProgression::Good,
            reflex: SaveProgression::Poor,
            will: SaveProgression::Poor,
        });
        sheet.bonuses = vec![
            TypedBonus::new("Chainmail", BonusType::Armor, 6),
            TypedBonus::new("Heavy shield", BonusType::Shield, 2),
            TypedBonus::new("Dodge feat", BonusType::Dodge, 1),
            TypedBonus::new("Cloak of Resistance +1", BonusType::Resistance, 1),
        ];
        sheet.hit_points = HitPoints {
            max: 38,
            lethal: 5,
            nonlethal: 2,
        };
        sheet
    }

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn new_sheet_has_default_scores_and_skills() {
        let sheet = CharacterSheet::new("Ezren");
        assert_eq!(sheet.abilities, AbilityScores::default());
        assert_eq!(sheet.hit_points.max, 10);
        assert_eq!(sheet.skill(1).map(|s| s.name.as_str()), Some("Acrobatics"));
        assert!(sheet.skills.iter().all(|s| s.ranks == 0 && !s.class_skill));
    }

    #[test]
    fn derives_combat_statistics() {
        let derived = fighter().derive(&Pathfinder1eSystem::new());

        assert_eq!(derived.level, 4);
        assert_eq!(derived.class_summary, "Fighter (4)");
        assert_eq!(derived.base_attack_bonus, 4);
        assert_eq!(derived.initiative, 2);
        assert_eq!(
            derived.armor_class,
            ArmorClass {
                total: 21,
                touch: 13,
                flat_footed: 18,
            }
        );
        assert_eq!(derived.combat_maneuver_bonus, 7);
        assert_eq!(derived.combat_maneuver_defense, 20);
        assert_eq!(derived.hp_current, 33);
        assert_eq!(derived.hp_nonlethal, 2);
    }

    #[test]
    fn huge_bonuses_saturate_instead_of_overflowing() {
        let mut sheet = fighter();
        sheet.bonuses.extend([
            TypedBonus::new("Wish", BonusType::Armor, i32::MAX),
            TypedBonus::new("Miracle", BonusType::Resistance, i32::MAX),
            TypedBonus::new("Giant form", BonusType::Size, i32::MAX),
        ]);

        let derived = sheet.derive(&Pathfinder1eSystem::new());

        assert_eq!(derived.armor_class.total, i32::MAX);
        assert_eq!(derived.armor_class.touch, i32::MAX);
        assert_eq!(derived.armor_class.flat_footed, i32::MAX);
        assert_eq!(derived.saves.fortitude.total, i32::MAX);
        assert_eq!(derived.saves.will.total, i32::MAX);
        assert_eq!(derived.combat_maneuver_bonus, i32::MAX);
        assert_eq!(derived.combat_maneuver_defense, i32::MAX);
    }

    #[test]
    fn derives_saves_with_resistance() {
        let derived = fighter().derive(&Pathfinder1eSystem::new());

        assert_eq!(derived.saves.fortitude.base, 4);
        assert_eq!(derived.saves.fortitude.total, 4 + 2 + 1);
        assert_eq!(derived.saves.reflex.total, 1 + 2 + 1);
        assert_eq!(derived.saves.will.total, 1 - 1 + 1);
    }

    #[test]
    fn derives_ability_summaries_in_sheet_order() {
        let derived = fighter().derive(&Pathfinder1eSystem::new());
        let codes: Vec<&str> = derived.abilities.iter().map(|a| a.ability.code()).collect();
        assert_eq!(codes, ["str", "dex", "con", "int", "wis", "cha"]);
        assert_eq!(derived.abilities[0].modifier.to_string(), "+3");
        assert_eq!(derived.abilities[4].modifier.to_string(), "-1");
    }

    #[test]
    fn derives_skill_totals() {
        let mut sheet = fighter();
        if let Some(climb) = sheet.skills.iter_mut().find(|s| s.name == "Climb") {
            climb.ranks = 4;
            climb.class_skill = true;
        }
        if let Some(perception) = sheet.skills.iter_mut().find(|s| s.name == "Perception") {
            perception.misc = 2;
            perception.class_skill = true;
        }

        let derived = sheet.derive(&Pathfinder1eSystem::new());
        let total = |name: &str| derived.skills.iter().find(|s| s.name == name).map(|s| s.total);

        assert_eq!(total("Climb"), Some(3 + 4 + 3));
        assert_eq!(total("Perception"), Some(-1 + 2));
        assert_eq!(total("Acrobatics"), Some(2));
    }

    #[test]
    fn classless_sheet_reads_level_one() {
        let derived = CharacterSheet::new("Commoner").derive(&Pathfinder1eSystem::new());
        assert_eq!(derived.class_summary, "Level 1");
        assert_eq!(derived.level, 0);
        assert_eq!(derived.armor_class.total, 10);
    }

    #[test]
    fn apply_form_updates_scores_and_hp() {
        let mut sheet = fighter();
        apply_form(
            &mut sheet,
            &form(&[
                ("name", "Valeros the Bold"),
                ("str_score", "18"),
                ("dex_score", ""),
                ("hp_total", "40"),
                ("hp_current", "31"),
                ("hp_nonlethal", "0"),
            ]),
        )
        .expect("valid form");

        assert_eq!(sheet.name, "Valeros the Bold");
        assert_eq!(sheet.abilities.get(Ability::Str), 18);
        assert_eq!(sheet.abilities.get(Ability::Dex), 10);
        assert_eq!(sheet.abilities.get(Ability::Con), 14);
        assert_eq!(sheet.hit_points.max, 40);
        assert_eq!(sheet.hit_points.lethal, 9);
        assert_eq!(sheet.hit_points.nonlethal, 0);
    }

    #[test]
    fn apply_form_keeps_a_zero_score() {
        let mut sheet = fighter();
        apply_form(&mut sheet, &form(&[("wis_score", "0")])).expect("valid form");

        assert_eq!(sheet.abilities.get(Ability::Wis), 0);
        assert_eq!(
            sheet.derive(&Pathfinder1eSystem::new()).saves.will.ability,
            -5
        );
    }

    #[test]
    fn skill_field_keys_use_the_skill_id() {
        let sheet = CharacterSheet::new("Kyra");
        let climb = sheet.skill(4).expect("climb");
        assert_eq!(climb.name, "Climb");
        assert_eq!(climb.field_key(), "skill_4");
    }

    #[test]
    fn apply_form_clamps_lethal_damage_at_zero() {
        let mut sheet = fighter();
        apply_form(&mut sheet, &form(&[("hp_current", "50")])).expect("valid form");
        assert_eq!(sheet.hit_points.lethal, 0);
    }

    #[test]
    fn apply_form_rejects_malformed_scores_without_changes() {
        let mut sheet = fighter();
        let before = sheet.clone();
        let result = apply_form(
            &mut sheet,
            &form(&[("name", "Changed"), ("con_score", "tough")]),
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(sheet, before);
    }

    #[test]
    fn apply_form_updates_and_creates_skills() {
        let mut sheet = CharacterSheet::new("Merisiel");
        let skill_count = sheet.skills.len();

        apply_form(
            &mut sheet,
            &form(&[
                ("skill_1_ranks", "3"),
                ("skill_1_misc", "1"),
                ("skill_1_class", "on"),
                ("skill_900_ranks", "2"),
                ("skill_2_ranks", "lots"),
                ("skill_x_ranks", "4"),
            ]),
        )
        .expect("valid form");

        let acrobatics = sheet.skill(1).expect("acrobatics");
        assert_eq!(
            (acrobatics.ranks, acrobatics.misc, acrobatics.class_skill),
            (3, 1, true)
        );

        let appraise = sheet.skill(2).expect("appraise");
        assert_eq!(appraise.ranks, 0);

        let custom = sheet.skill(900).expect("created skill");
        assert_eq!(custom.name, "Skill 900");
        assert_eq!(custom.ability, Ability::Int);
        assert_eq!(custom.ranks, 2);
        assert!(!custom.class_skill);
        assert_eq!(sheet.skills.len(), skill_count + 1);
    }

    #[test]
    fn unchecked_class_box_clears_class_skill() {
        let mut sheet = CharacterSheet::new("Kyra");
        if let Some(heal) = sheet.skill_mut(12) {
            heal.class_skill = true;
        }
        apply_form(&mut sheet, &form(&[("skill_12_ranks", "1")])).expect("valid form");
        assert_eq!(sheet.skill(12).map(|s| s.class_skill), Some(false));
    }

    #[test]
    fn sheet_serde_fills_defaults() {
        let sheet: CharacterSheet =
            serde_json::from_str(r#"{"name": "Seoni", "abilities": {"cha": 17}}"#)
                .expect("valid sheet");
        assert_eq!(sheet.abilities.get(Ability::Cha), 17);
        assert_eq!(sheet.hit_points.max, 10);
        assert!(sheet.skills.is_empty());
    }
}
