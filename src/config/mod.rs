use crate::models::{GameData, Settings};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use ::config::{Config, Environment, File, FileFormat};
use std::fs;

/// Prefix for environment overrides of [`Settings`] (e.g. `GEARSHEET_API_KEY`)
pub const ENV_PREFIX: &str = "GEARSHEET";

/// Configuration manager for the static data table and runtime settings.
///
/// Manages two files in one directory:
/// - `game_data.yaml`: Tier bonus, stat and localization tables plus class tokens (required)
/// - `settings.yaml`: Item API endpoint, key, locale and logging options (optional)
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    game_data_path: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager for the specified configuration directory.
    ///
    /// Unlike the settings file, the data table cannot be defaulted, so the
    /// directory is not created here.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Self {
        let config_dir = config_dir.as_ref().to_path_buf();

        Self {
            game_data_path: config_dir.join("game_data.yaml"),
            settings_path: config_dir.join("settings.yaml"),
            config_dir,
        }
    }

    /// Load and validate the static data table.
    ///
    /// A missing or malformed table is an error; callers treat it as fatal.
    pub fn load_game_data(&self) -> Result<GameData> {
        let file_contents = fs::read_to_string(&self.game_data_path)
            .with_context(|| format!("Failed to read game data: {}", self.game_data_path))?;

        let data: GameData = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse game data: {}", self.game_data_path))?;

        data.validate()
            .with_context(|| format!("Invalid game data: {}", self.game_data_path))?;

        tracing::info!(
            "Loaded game data from {} - {} stats, {} tier sets, {} locales, {} classes",
            self.game_data_path,
            data.stat_ids.len(),
            data.tier_bonus_ids.len(),
            data.i18n.len(),
            data.classes.len()
        );
        Ok(data)
    }

    /// Load runtime settings.
    ///
    /// Layers, lowest first: built-in defaults, `settings.yaml` if present,
    /// then `GEARSHEET_*` environment variables. Logs nothing, since the
    /// settings decide where logging goes; see [`ConfigManager::log_settings`].
    pub fn load_settings(&self) -> Result<Settings> {
        let settings: Settings = Config::builder()
            .add_source(
                File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to load settings: {}", self.settings_path))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        Ok(settings)
    }

    /// Report where `settings` came from, once a subscriber is installed
    pub fn log_settings(&self, settings: &Settings) {
        if !self.has_settings_file() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        tracing::info!(
            "Loaded settings - api: {}, locale: {}, timeout: {}s",
            settings.api_base_url,
            settings.locale,
            settings.request_timeout_secs
        );
    }

    pub fn has_settings_file(&self) -> bool {
        self.settings_path.exists()
    }

    /// Save runtime settings to `settings.yaml`, creating the directory if needed.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)
                .with_context(|| format!("Failed to create config directory: {}", self.config_dir))?;
        }

        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn game_data_path(&self) -> &Utf8Path {
        &self.game_data_path
    }
}
