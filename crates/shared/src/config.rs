//! Configuration types for Kwoon
//!
//! Configuration is read from a YAML or JSON file. Every field has a default,
//! so an empty document (or no document at all) is a valid configuration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{InvalidConfigError, Result, UnsupportedFormatError};

/// Serialized document formats understood by Kwoon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            _ => Err(UnsupportedFormatError {
                path: path.display().to_string(),
                extension,
                supported: vec!["json".to_string(), "yaml".to_string(), "yml".to_string()],
            }
            .into()),
        }
    }

    /// Parse a document in this format
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_str(content)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }

    /// Read and parse a file, choosing the format from its extension
    pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let format = Self::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        format.parse(&content)
    }
}

/// Stamina regeneration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaminaConfig {
    /// Upper bound of the stamina pool
    #[serde(default = "default_max_stamina")]
    pub max: u32,

    /// Minutes that must elapse for one regeneration step
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,

    /// Units credited per completed step
    #[serde(default = "default_units_per_interval")]
    pub units_per_interval: u32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            max: default_max_stamina(),
            interval_minutes: default_interval_minutes(),
            units_per_interval: default_units_per_interval(),
        }
    }
}

fn default_max_stamina() -> u32 {
    100
}

fn default_interval_minutes() -> u32 {
    5
}

fn default_units_per_interval() -> u32 {
    1
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Calendar settings used to turn timestamps into training days
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConfig {
    /// Offset from UTC in minutes. `None` uses the system's local offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Top-level Kwoon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KwoonConfig {
    /// Where the profile document is stored
    #[serde(default = "default_profile_path")]
    pub profile_path: PathBuf,

    /// Optional catalog document replacing the built-in catalog
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub stamina: StaminaConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl Default for KwoonConfig {
    fn default() -> Self {
        Self {
            profile_path: default_profile_path(),
            catalog_path: None,
            stamina: StaminaConfig::default(),
            logging: LoggingConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

fn default_profile_path() -> PathBuf {
    KwoonConfig::data_dir().join("profile.json")
}

impl KwoonConfig {
    /// Load configuration from a JSON or YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = DocumentFormat::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, the default location, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = Self::default_config_path();
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// `$XDG_DATA_HOME/kwoon` or the platform equivalent
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kwoon")
    }

    /// `$XDG_CONFIG_HOME/kwoon/config.yaml` or the platform equivalent
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kwoon")
            .join("config.yaml")
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.stamina.max == 0 {
            return Err(invalid("stamina.max", "must be greater than zero"));
        }
        if self.stamina.interval_minutes == 0 {
            return Err(invalid("stamina.intervalMinutes", "must be greater than zero"));
        }
        if let Some(offset) = self.calendar.utc_offset_minutes {
            if offset.abs() >= 24 * 60 {
                return Err(invalid(
                    "calendar.utcOffsetMinutes",
                    "must be within one day of UTC",
                ));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> crate::KwoonError {
    InvalidConfigError {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KwoonError;

    #[test]
    fn test_yaml_config_parse() {
        let yaml = r#"
profilePath: /tmp/kwoon/profile.json
stamina:
  max: 120
  intervalMinutes: 3
logging:
  level: debug
calendar:
  utcOffsetMinutes: 60
"#;

        let config: KwoonConfig = DocumentFormat::Yaml.parse(yaml).unwrap();
        assert_eq!(config.profile_path, PathBuf::from("/tmp/kwoon/profile.json"));
        assert_eq!(config.stamina.max, 120);
        assert_eq!(config.stamina.interval_minutes, 3);
        assert_eq!(config.stamina.units_per_interval, 1);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.calendar.utc_offset_minutes, Some(60));
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: KwoonConfig = DocumentFormat::Json.parse("{}").unwrap();
        assert_eq!(config.stamina, StaminaConfig::default());
        assert_eq!(config.stamina.max, 100);
        assert_eq!(config.stamina.interval_minutes, 5);
        assert!(config.profile_path.ends_with("profile.json"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/b.YML")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("catalog.json")).unwrap(),
            DocumentFormat::Json
        );
        assert!(matches!(
            DocumentFormat::from_path(Path::new("catalog.toml")),
            Err(KwoonError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = KwoonConfig::default();
        config.stamina.interval_minutes = 0;

        assert!(matches!(
            config.validate(),
            Err(KwoonError::InvalidConfig(e)) if e.field == "stamina.intervalMinutes"
        ));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "stamina": { "max": 80 } }"#).unwrap();

        let config = KwoonConfig::from_file(&path).unwrap();
        assert_eq!(config.stamina.max, 80);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        assert!(matches!(
            KwoonConfig::load(Some(&path)),
            Err(KwoonError::Io(_))
        ));
    }
}
