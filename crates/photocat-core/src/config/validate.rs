//! Configuration validation with range and vocabulary checks.

use crate::error::ConfigError;
use crate::tagging::CategoryMap;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.library.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "library.supported_formats must not be empty".into(),
            ));
        }
        if self
            .library
            .supported_formats
            .iter()
            .any(|f| f.trim().is_empty() || f.starts_with('.'))
        {
            return Err(ConfigError::ValidationError(
                "library.supported_formats entries must be bare extensions like \"jpg\"".into(),
            ));
        }
        if self.display.max_width == 0 || self.display.max_height == 0 {
            return Err(ConfigError::ValidationError(
                "display.max_width and display.max_height must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        CategoryMap::new(self.tagging.categories.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryBinding;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.library.supported_formats.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("supported_formats"));
    }

    #[test]
    fn test_validate_rejects_dotted_format() {
        let mut config = Config::default();
        config.library.supported_formats.push(".heic".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bare extensions"));
    }

    #[test]
    fn test_validate_rejects_zero_display_size() {
        let mut config = Config::default();
        config.display.max_height = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("display.max_width"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_validate_rejects_duplicate_trigger() {
        let mut config = Config::default();
        config
            .tagging
            .categories
            .push(CategoryBinding::new('p', "pets"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'p'"));
    }
}
