// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::PokerPalError;
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub integrations: IntegrationsConfig,

    #[serde(default)]
    pub sheets: SheetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix that marks a poker command, e.g. `!po start 500 A, B`
    pub command_prefix: String,
    /// Seconds between history polls per channel
    pub poll_interval_secs: u64,
    /// Messages fetched per poll
    pub history_limit: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: "!po".into(),
            poll_interval_secs: 5,
            history_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Also write a daily log file (chat transcript) under the data directory
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    pub discord: Option<IntegrationEntry>,
    pub rocketchat: Option<IntegrationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationEntry {
    pub enabled: bool,
    /// Channel / room IDs to watch
    #[serde(default)]
    pub channels: Vec<String>,
}

impl IntegrationEntry {
    pub fn is_active(&self) -> bool {
        self.enabled && !self.channels.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub enabled: bool,
    pub spreadsheet_id: Option<String>,
    #[serde(default = "default_sheet_rows")]
    pub sheet_rows: u32,
    #[serde(default = "default_sheet_columns")]
    pub sheet_columns: u32,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            spreadsheet_id: None,
            sheet_rows: default_sheet_rows(),
            sheet_columns: default_sheet_columns(),
        }
    }
}

fn default_sheet_rows() -> u32 {
    200
}

fn default_sheet_columns() -> u32 {
    26
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            return Self::load_from(&path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Write the config as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// `GOOGLE_SHEETS_ID` overrides the configured spreadsheet.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("GOOGLE_SHEETS_ID") {
            if !id.trim().is_empty() {
                self.sheets.spreadsheet_id = Some(id.trim().to_string());
            }
        }
    }

    pub fn validate(&self) -> Result<(), PokerPalError> {
        let prefix = self.bot.command_prefix.trim();
        if prefix.is_empty() || prefix.contains(char::is_whitespace) {
            return Err(PokerPalError::Config(format!(
                "bot.command_prefix must be a single word, got '{}'",
                self.bot.command_prefix
            )));
        }
        if self.bot.poll_interval_secs == 0 {
            return Err(PokerPalError::Config(
                "bot.poll_interval_secs must be at least 1".into(),
            ));
        }
        if self.sheets.enabled && self.sheets.spreadsheet_id.is_none() {
            return Err(PokerPalError::Config(
                "sheets.enabled is set but no spreadsheet_id (or GOOGLE_SHEETS_ID) is given".into(),
            ));
        }
        Ok(())
    }

    /// Spreadsheet ID when mirroring is switched on.
    pub fn active_spreadsheet(&self) -> Option<&str> {
        if self.sheets.enabled {
            self.sheets.spreadsheet_id.as_deref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.bot.command_prefix, "!po");
        assert_eq!(c.bot.poll_interval_secs, 5);
        assert_eq!(c.bot.history_limit, 20);
        assert_eq!(c.logging.level, "info");
        assert!(c.logging.file);
        assert!(!c.sheets.enabled);
        assert_eq!(c.sheets.sheet_rows, 200);
        assert_eq!(c.sheets.sheet_columns, 26);
        assert!(c.integrations.discord.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bot.command_prefix, "!po");
        assert!(config.active_spreadsheet().is_none());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[bot]
command_prefix = "!poker"
poll_interval_secs = 3
history_limit = 50

[logging]
level = "debug"
file = false

[integrations.discord]
enabled = true
channels = ["1234567890"]

[integrations.rocketchat]
enabled = false

[sheets]
enabled = true
spreadsheet_id = "sheet-abc"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot.command_prefix, "!poker");
        assert_eq!(config.bot.history_limit, 50);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.file);
        let discord = config.integrations.discord.as_ref().unwrap();
        assert!(discord.is_active());
        let rocket = config.integrations.rocketchat.as_ref().unwrap();
        assert!(!rocket.is_active());
        assert!(rocket.channels.is_empty());
        assert_eq!(config.active_spreadsheet(), Some("sheet-abc"));
        assert_eq!(config.sheets.sheet_rows, 200);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: Config = toml::from_str("[bot]\ncommand_prefix = \"!pp\"\n").unwrap();
        assert_eq!(config.bot.command_prefix, "!pp");
        assert_eq!(config.bot.poll_interval_secs, 5);
        assert_eq!(config.bot.history_limit, 20);
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        let mut c = Config::default();
        c.bot.command_prefix = "!po x".into();
        assert!(matches!(c.validate(), Err(PokerPalError::Config(_))));
        c.bot.command_prefix = "  ".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_requires_spreadsheet_id() {
        let mut c = Config::default();
        c.sheets.enabled = true;
        assert!(c.validate().is_err());
        c.sheets.spreadsheet_id = Some("abc".into());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.bot.command_prefix, config.bot.command_prefix);
        assert_eq!(deserialized.sheets.sheet_columns, config.sheets.sheet_columns);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.bot.history_limit = 7;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.bot.history_limit, 7);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
