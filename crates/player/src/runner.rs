use std::collections::BTreeMap;

use charsheet_domain::{CharacterSheet, DerivedSheet, Pathfinder1eSystem};
use serde::Serialize;

use crate::application::FormController;
use crate::infrastructure::platform::{ManualScheduler, MemoryDocument};
use crate::ports::outbound::{FormDocument, RowPart, SkillRowElement};

/// Configuration types for the player runner.
pub mod config {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    /// Timing knobs for the form controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct ControllerConfig {
        /// Delay before the initial pass over every skill row, giving the
        /// seeded modifiers time to land.
        pub seed_delay_ms: u32,
        /// Delay before the pass over every skill row that follows a score
        /// change.
        pub rescan_delay_ms: u32,
    }

    impl Default for ControllerConfig {
        fn default() -> Self {
            Self {
                seed_delay_ms: 100,
                rescan_delay_ms: 0,
            }
        }
    }

    /// A configurable value and where it can be set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ConfigKey {
        SeedDelay,
        RescanDelay,
    }

    impl ConfigKey {
        pub const ALL: [ConfigKey; 2] = [Self::SeedDelay, Self::RescanDelay];

        /// Environment variable (native).
        pub fn env_var(&self) -> &'static str {
            match self {
                Self::SeedDelay => "CHARSHEET_SEED_DELAY_MS",
                Self::RescanDelay => "CHARSHEET_RESCAN_DELAY_MS",
            }
        }

        /// Attribute on `<body>` (browser).
        pub fn attribute(&self) -> &'static str {
            match self {
                Self::SeedDelay => "data-seed-delay-ms",
                Self::RescanDelay => "data-rescan-delay-ms",
            }
        }
    }

    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum ConfigError {
        #[error("Invalid value for {key}: {value:?} (expected milliseconds)")]
        InvalidValue { key: &'static str, value: String },
    }

    impl ControllerConfig {
        /// Build a config from a key lookup; absent keys keep their defaults.
        ///
        /// `name` picks the spelling of the key the lookup understands (and
        /// the one reported in errors).
        pub fn from_lookup(
            name: impl Fn(ConfigKey) -> &'static str,
            lookup: impl Fn(&str) -> Option<String>,
        ) -> Result<Self, ConfigError> {
            let mut config = Self::default();
            for key in ConfigKey::ALL {
                let key_name = name(key);
                let Some(raw) = lookup(key_name) else {
                    continue;
                };
                let value = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: key_name,
                        value: raw.clone(),
                    })?;
                match key {
                    ConfigKey::SeedDelay => config.seed_delay_ms = value,
                    ConfigKey::RescanDelay => config.rescan_delay_ms = value,
                }
            }
            Ok(config)
        }

        /// Read overrides from the process environment.
        #[cfg(not(target_arch = "wasm32"))]
        pub fn from_env() -> Result<Self, ConfigError> {
            Self::from_lookup(|key| key.env_var(), |name| std::env::var(name).ok())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            move |name| map.get(name).cloned()
        }

        #[test]
        fn defaults_without_overrides() {
            let config = ControllerConfig::from_lookup(|k| k.env_var(), lookup(&[]))
                .expect("empty lookup is valid");
            assert_eq!(config, ControllerConfig::default());
            assert_eq!(config.seed_delay_ms, 100);
            assert_eq!(config.rescan_delay_ms, 0);
        }

        #[test]
        fn reads_overrides_by_attribute_name() {
            let config = ControllerConfig::from_lookup(
                |k| k.attribute(),
                lookup(&[("data-seed-delay-ms", " 250 "), ("data-rescan-delay-ms", "5")]),
            )
            .expect("valid overrides");
            assert_eq!(config.seed_delay_ms, 250);
            assert_eq!(config.rescan_delay_ms, 5);
        }

        #[test]
        fn rejects_malformed_values() {
            let err = ControllerConfig::from_lookup(
                |k| k.env_var(),
                lookup(&[("CHARSHEET_SEED_DELAY_MS", "soon")]),
            )
            .expect_err("malformed delay");
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    key: "CHARSHEET_SEED_DELAY_MS",
                    value: "soon".to_string(),
                }
            );
        }

        #[test]
        fn serde_fills_missing_fields() {
            let config: ControllerConfig =
                serde_json::from_str(r#"{"rescanDelayMs": 10}"#).expect("valid config");
            assert_eq!(config.seed_delay_ms, 100);
            assert_eq!(config.rescan_delay_ms, 10);
        }
    }
}

use config::ControllerConfig;

/// What a skill row shows once the controller has settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub label: Option<String>,
    pub ability: Option<String>,
    pub ability_modifier: Option<String>,
    pub ranks: Option<String>,
    pub misc: Option<String>,
    pub class_skill: bool,
    pub total: Option<String>,
}

/// Result of rendering a sheet without a browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlessReport {
    pub fields: BTreeMap<String, String>,
    pub skill_rows: Vec<RowSnapshot>,
    pub derived: DerivedSheet,
}

/// Lay `sheet` out on an in-memory page, attach the form controller, let
/// every deferred pass run, and report what the page shows.
pub fn run_headless(sheet: &CharacterSheet, config: ControllerConfig) -> HeadlessReport {
    let document = MemoryDocument::from_sheet(sheet);
    let scheduler = ManualScheduler::new();
    let controller = FormController::attach(document.clone(), scheduler.clone(), config);
    let ran = scheduler.run_until_idle();
    tracing::debug!(deferred_tasks = ran, "Headless page settled");

    let skill_rows = controller
        .document()
        .skill_rows()
        .iter()
        .map(|row| RowSnapshot {
            label: row.label(),
            ability: row.ability_code(),
            ability_modifier: row.part_value(RowPart::AbilityModifier),
            ranks: row.part_value(RowPart::Ranks),
            misc: row.part_value(RowPart::Misc),
            class_skill: row.is_checked(RowPart::ClassSkill),
            total: row.part_value(RowPart::Total),
        })
        .collect();

    HeadlessReport {
        fields: document.fields(),
        skill_rows,
        derived: sheet.derive(&Pathfinder1eSystem::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charsheet_domain::Ability;

    #[test]
    fn headless_page_matches_derived_sheet() {
        let mut sheet = CharacterSheet::new("Lem");
        sheet.abilities.set(Ability::Cha, 17);
        sheet.abilities.set(Ability::Dex, 7);
        if let Some(perform) = sheet.skills.iter_mut().find(|s| s.name == "Perform") {
            perform.ranks = 3;
            perform.misc = 1;
            perform.class_skill = true;
        }

        let report = run_headless(&sheet, ControllerConfig::default());

        assert_eq!(report.fields.get("cha_mod").map(String::as_str), Some("+3"));
        assert_eq!(report.fields.get("dex_mod").map(String::as_str), Some("-2"));

        for (row, skill) in report.skill_rows.iter().zip(&report.derived.skills) {
            assert_eq!(row.label.as_deref(), Some(skill.name.as_str()));
            assert_eq!(row.total, Some(skill.total.to_string()));
            assert_eq!(row.ability_modifier, Some(skill.modifier.to_string()));
        }

        let perform = report
            .skill_rows
            .iter()
            .find(|r| r.label.as_deref() == Some("Perform"))
            .expect("perform row");
        assert_eq!(perform.total.as_deref(), Some("10"));
    }
}
