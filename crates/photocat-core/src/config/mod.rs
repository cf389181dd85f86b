//! Configuration management for photocat.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every section, so a missing file yields a usable configuration.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::tagging::CategoryMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for photocat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo library settings
    pub library: LibraryConfig,

    /// Catalog backend settings
    pub catalog: CatalogConfig,

    /// Tagging vocabulary and label mode
    pub tagging: TaggingConfig,

    /// Display fitting
    pub display: DisplayConfig,

    /// Export settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.photocat.photocat/config.toml
    /// - Linux: ~/.config/photocat/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\photocat\config\config.toml
    ///
    /// Falls back to ~/.photocat/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "photocat", "photocat")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".photocat").join("config.toml")
            })
    }

    /// Get the resolved library root (with ~ expansion).
    pub fn library_root(&self) -> PathBuf {
        expand(&self.library.root)
    }

    /// Get the resolved catalog database path (with ~ expansion).
    pub fn catalog_path(&self) -> PathBuf {
        expand(&self.catalog.path)
    }

    /// Build the validated trigger/category lookup.
    pub fn category_map(&self) -> Result<CategoryMap, ConfigError> {
        CategoryMap::new(self.tagging.categories.clone())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelMode;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.library.supported_formats.len(), 9);
        assert_eq!(config.library.sidecar_prefix, "._");
        assert_eq!(config.display.max_width, 1400);
        assert_eq!(config.display.max_height, 1000);
        assert_eq!(config.tagging.mode, LabelMode::Multi);
        assert_eq!(config.tagging.categories.len(), 13);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[library]"));
        assert!(toml.contains("[catalog]"));
        assert!(toml.contains("[[tagging.categories]]"));
    }

    #[test]
    fn test_config_toml_roundtrip_keeps_vocabulary() {
        let config = Config::default();
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.tagging.categories, config.tagging.categories);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [tagging]
            mode = "single"
            categories = [
                { trigger = "b", category = "birds" },
                { trigger = "m", category = "macro" },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(config.tagging.mode, LabelMode::Single);
        assert_eq!(config.tagging.categories[0].category, "birds");
        assert_eq!(config.display.max_width, 1400);
    }

    #[test]
    fn test_absolute_paths_are_not_rewritten() {
        let mut config = Config::default();
        config.catalog.path = PathBuf::from("/var/lib/photocat/catalog.db");
        assert_eq!(
            config.catalog_path(),
            PathBuf::from("/var/lib/photocat/catalog.db")
        );
    }

    #[test]
    fn test_category_map_from_default_config() {
        let map = Config::default().category_map().unwrap();
        assert_eq!(map.resolve_trigger('x'), Some("abstract"));
        assert_eq!(map.trigger_for("portfolio"), Some('['));
    }
}
