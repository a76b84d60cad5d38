//! Harness configuration.
//!
//! Defaults reproduce the stock behavior; a TOML file can override them.
//! Configuration is validated at load time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TestError};

/// Test harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Scratch directory for files created by tests.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Defaults for generated images.
    #[serde(default)]
    pub image: ImageDefaults,

    /// Default date format (`time` format description).
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Callback-mode expectations fail when the work raises nothing.
    #[serde(default = "default_true")]
    pub require_raised_exception: bool,

    /// How registered exception messages are matched.
    #[serde(default)]
    pub message_match: MessageMatch,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./storage/")
}

fn default_date_format() -> String {
    "[year]-[month]-[day]".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            image: ImageDefaults::default(),
            date_format: default_date_format(),
            require_raised_exception: true,
            message_match: MessageMatch::default(),
        }
    }
}

impl HarnessConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(TestError::config("storage_dir cannot be empty"));
        }
        if self.date_format.trim().is_empty() {
            return Err(TestError::config("date_format cannot be empty"));
        }
        self.image.validate()
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns an error if the document cannot be parsed or is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| TestError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TestError::config(format!("failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }
}

/// Defaults for generated images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDefaults {
    /// Width in pixels.
    #[serde(default = "default_image_side")]
    pub width: u32,

    /// Height in pixels.
    #[serde(default = "default_image_side")]
    pub height: u32,

    /// File name inside the storage directory.
    #[serde(default = "default_image_file_name")]
    pub file_name: String,
}

fn default_image_side() -> u32 {
    100
}

fn default_image_file_name() -> String {
    "image.png".to_string()
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            width: default_image_side(),
            height: default_image_side(),
            file_name: default_image_file_name(),
        }
    }
}

impl ImageDefaults {
    /// Validates image defaults.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or the file name is empty.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TestError::config("image width and height must be greater than 0"));
        }
        if self.file_name.is_empty() {
            return Err(TestError::config("image file_name cannot be empty"));
        }
        Ok(())
    }
}

/// Matching rule for registered exception messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageMatch {
    /// The raised message must contain the expected text.
    #[default]
    Contains,
    /// The raised message must equal the expected text.
    Exact,
}

impl MessageMatch {
    /// Applies the rule.
    #[must_use]
    pub fn matches(self, expected: &str, actual: &str) -> bool {
        match self {
            Self::Contains => actual.contains(expected),
            Self::Exact => actual == expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.storage_dir, PathBuf::from("./storage/"));
        assert_eq!(config.image.width, 100);
        assert_eq!(config.image.height, 100);
        assert_eq!(config.image.file_name, "image.png");
        assert_eq!(config.date_format, "[year]-[month]-[day]");
        assert!(config.require_raised_exception);
        assert_eq!(config.message_match, MessageMatch::Contains);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = HarnessConfig::from_toml_str("").unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn test_parse_overrides() {
        let config = HarnessConfig::from_toml_str(
            r#"
            storage_dir = "/tmp/lion"
            require_raised_exception = false
            message_match = "exact"

            [image]
            width = 200
            "#,
        )
        .unwrap();
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/lion"));
        assert!(!config.require_raised_exception);
        assert_eq!(config.message_match, MessageMatch::Exact);
        assert_eq!(config.image.width, 200);
        assert_eq!(config.image.height, 100);
    }

    #[test]
    fn test_validation_rejects_zero_image() {
        let err = HarnessConfig::from_toml_str("[image]\nwidth = 0\n").unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_validation_rejects_empty_date_format() {
        let err = HarnessConfig::from_toml_str("date_format = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("date_format"));
    }

    #[test]
    fn test_parse_error() {
        let err = HarnessConfig::from_toml_str("storage_dir = [").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lion-test.toml");
        std::fs::write(&path, "date_format = \"[day]/[month]/[year]\"\n").unwrap();
        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.date_format, "[day]/[month]/[year]");
    }

    #[test]
    fn test_load_missing_file() {
        let err = HarnessConfig::load("/nonexistent/lion-test.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn test_message_match() {
        assert!(MessageMatch::Contains.matches("ERR", "ERR: session"));
        assert!(!MessageMatch::Exact.matches("ERR", "ERR: session"));
        assert!(MessageMatch::Exact.matches("ERR", "ERR"));
    }
}
