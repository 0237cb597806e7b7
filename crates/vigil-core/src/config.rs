//! Logging configuration for check binaries.
//!
//! Older check scripts spelled the options in camelCase (`enableScreenDebug`,
//! `logFile`, ...). Those spellings are accepted here, at deserialisation,
//! and nowhere else.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::ConfigError;

pub const DEFAULT_LOG_FILE: &str = "/var/log/icinga2/check_monitoring.log";
pub const DEFAULT_LOG_LEVEL: &str = "WARNING";

/// Level names accepted by `--log-level`.
pub const LOG_LEVELS: [&str; 7] = [
    "TRACE", "DEBUG", "INFO", "SUCCESS", "WARNING", "ERROR", "CRITICAL",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Force the file sink to DEBUG.
    pub debug: bool,
    /// Mirror DEBUG and above to stderr.
    #[serde(alias = "enableScreenDebug")]
    pub screen_debug: bool,
    #[serde(alias = "enableLogFile")]
    pub log_file_enabled: bool,
    #[serde(alias = "logFile")]
    pub log_file: PathBuf,
    #[serde(alias = "logLevel")]
    pub level: String,
    /// Write the file sink as JSON lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            screen_debug: false,
            log_file_enabled: true,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            level: DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Load a JSON configuration file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Level the file sink runs at.
    ///
    /// `debug` wins over `level`; unrecognised names fall back to INFO.
    pub fn effective_level(&self) -> Level {
        if self.debug {
            return Level::DEBUG;
        }
        match self.level.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Level::TRACE,
            "DEBUG" => Level::DEBUG,
            "INFO" | "SUCCESS" => Level::INFO,
            "WARNING" | "WARN" => Level::WARN,
            "ERROR" | "CRITICAL" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LoggingConfig::default();
        assert!(config.log_file_enabled);
        assert!(!config.screen_debug);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(config.effective_level(), Level::WARN);
    }

    #[test]
    fn test_level_mapping() {
        let level = |name: &str| {
            LoggingConfig {
                level: name.to_string(),
                ..LoggingConfig::default()
            }
            .effective_level()
        };
        assert_eq!(level("trace"), Level::TRACE);
        assert_eq!(level("SUCCESS"), Level::INFO);
        assert_eq!(level("CRITICAL"), Level::ERROR);
        assert_eq!(level("verbose"), Level::INFO);
    }

    #[test]
    fn test_debug_overrides_level() {
        let config = LoggingConfig {
            debug: true,
            level: "ERROR".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(config.effective_level(), Level::DEBUG);
    }

    #[test]
    fn test_legacy_aliases_deserialize() {
        let config: LoggingConfig = serde_json::from_str(
            r#"{"enableScreenDebug": true, "enableLogFile": false, "logFile": "/tmp/x.log", "logLevel": "debug"}"#,
        )
        .unwrap();
        assert!(config.screen_debug);
        assert!(!config.log_file_enabled);
        assert_eq!(config.log_file, PathBuf::from("/tmp/x.log"));
        assert_eq!(config.effective_level(), Level::DEBUG);
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"json": true}}"#).unwrap();
        let config = LoggingConfig::from_json_file(file.path()).unwrap();
        assert!(config.json);
        assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            LoggingConfig::from_json_file(file.path()),
            Err(ConfigError::Json(_))
        ));
    }
}
