use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Static data table from game_data.yaml
///
/// Loaded once at startup and shared read-only (behind `Arc`) by the parser,
/// the report builder and item helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    /// Item-set id → tier label (e.g. 1308 → "T21")
    #[serde(rename = "TierBonusIDs", default)]
    pub tier_bonus_ids: IndexMap<u32, String>,

    /// Stat id → stat name
    #[serde(rename = "StatIDs", default)]
    pub stat_ids: IndexMap<u32, String>,

    #[serde(rename = "Primary", default)]
    pub primary: Vec<String>,

    #[serde(rename = "Secondary", default)]
    pub secondary: Vec<String>,

    #[serde(rename = "Tertiary", default)]
    pub tertiary: Vec<String>,

    /// Locale → (label key → localized string)
    #[serde(rename = "I18N", default)]
    pub i18n: IndexMap<String, IndexMap<String, String>>,

    /// Class tokens accepted on `<class>=<name>` lines
    #[serde(rename = "Classes")]
    pub classes: Vec<String>,
}

/// Problems with a loaded [`GameData`] table
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DataError {
    #[error("Game data defines no classes")]
    NoClasses,

    #[error("Game data table {0} is missing or empty")]
    EmptyTable(&'static str),

    #[error("Invalid class token in game data: {0:?}")]
    InvalidClassToken(String),
}

impl GameData {
    /// Check the invariants the parser and report builder rely on
    pub fn validate(&self) -> Result<(), DataError> {
        if self.classes.is_empty() {
            return Err(DataError::NoClasses);
        }
        if self.stat_ids.is_empty() {
            return Err(DataError::EmptyTable("StatIDs"));
        }
        if self.i18n.is_empty() {
            return Err(DataError::EmptyTable("I18N"));
        }

        for class in &self.classes {
            let valid = !class.is_empty()
                && class
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
            if !valid {
                return Err(DataError::InvalidClassToken(class.clone()));
            }
        }

        Ok(())
    }

    /// Localized label, or `[key]` when the locale or key is unknown
    pub fn localize(&self, key: &str, locale: &str) -> String {
        self.i18n
            .get(locale)
            .and_then(|labels| labels.get(key))
            .cloned()
            .unwrap_or_else(|| format!("[{}]", key))
    }

    /// Tier label for an item set: `""` for no set, `"T??"` for an unknown set
    pub fn tier_bonus(&self, item_set_id: u32) -> &str {
        if item_set_id == 0 {
            return "";
        }
        self.tier_bonus_ids
            .get(&item_set_id)
            .map(String::as_str)
            .unwrap_or("T??")
    }

    pub fn stat_label(&self, stat_id: u32) -> Option<&str> {
        self.stat_ids.get(&stat_id).map(String::as_str)
    }
}

/// Empty tables with the standard class tokens; does not pass [`GameData::validate`]
impl Default for GameData {
    fn default() -> Self {
        Self {
            tier_bonus_ids: IndexMap::new(),
            stat_ids: IndexMap::new(),
            primary: Vec::new(),
            secondary: Vec::new(),
            tertiary: Vec::new(),
            i18n: IndexMap::new(),
            classes: default_classes(),
        }
    }
}

fn default_classes() -> Vec<String> {
    [
        "warrior",
        "paladin",
        "hunter",
        "rogue",
        "priest",
        "deathknight",
        "shaman",
        "mage",
        "warlock",
        "monk",
        "druid",
        "demonhunter",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

/// Runtime settings from settings.yaml, overridable by `GEARSHEET_*` env vars
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub api_key: String,
    pub locale: String,

    /// Per-lookup timeout; 0 disables it
    pub request_timeout_secs: u64,

    pub debug_mode: bool,
    pub log_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://us.api.battle.net".to_string(),
            api_key: String::new(),
            locale: "en_US".to_string(),
            request_timeout_secs: 30,
            debug_mode: false,
            log_dir: "logs".to_string(),
        }
    }
}
