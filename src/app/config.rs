//! Configuration for the legacy console renderer

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Console adapter settings
    pub term: TermConfig,
    /// Screen size used when rendering without a real console
    pub headless: HeadlessConfig,
    /// Log filter used when `RUST_LOG` is unset (e.g. "warn", "mochi_wincon=debug")
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            term: TermConfig::default(),
            headless: HeadlessConfig::default(),
            log_filter: "warn".to_string(),
        }
    }
}

/// Console adapter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Cursor height in percent of the cell, used when toggling visibility
    pub cursor_size: u32,
    /// Reset cell attributes to the console default when erasing
    pub erase_attributes: bool,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            cursor_size: 100,
            erase_attributes: true,
        }
    }
}

/// Headless screen dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    /// Width in columns
    pub columns: u16,
    /// Height in rows
    pub rows: u16,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(
                        path = %config_path.display(),
                        "Ignoring unreadable config: {}",
                        e
                    ),
                }
            }
        }
        Self::default()
    }
}

/// `~/.config/mochi/wincon.json`, with `USERPROFILE` standing in for `HOME`
/// on Windows
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("mochi")
                .join("wincon.json")
        })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.term.cursor_size, 100);
        assert!(config.term.erase_attributes);
        assert_eq!(config.headless.columns, 80);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"term":{"cursor_size":25}}"#).unwrap();
        assert_eq!(config.term.cursor_size, 25);
        assert!(config.term.erase_attributes);
        assert_eq!(config.headless.rows, 24);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wincon.json");

        let mut config = Config::default();
        config.term.erase_attributes = false;
        config.headless.columns = 132;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wincon.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(Config::load(&path), Err(ConfigError::Io(_))));
    }
}
