//! Configuration management for lnlist.
//!
//! Handles loading, saving, and validating configuration from
//! platform-specific config directories.

use crate::error::ConfigError;
use crate::models::{EXPORT_FILE_NAME, NEW_PUBLISHER_COLOR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application name used for config and data directories.
const APP_NAME: &str = "LnList";

/// Default config filename.
const CONFIG_FILENAME: &str = "config.toml";

/// Default working catalog filename inside the data directory.
const CATALOG_FILENAME: &str = "catalog.json";

/// Extensions an export may use.
const EXPORT_EXTENSIONS: &[&str] = &["html", "htm", "json"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File locations.
    pub paths: PathsConfig,

    /// HTML export settings.
    pub export: ExportConfig,

    /// Values used when creating new records.
    pub defaults: DefaultsConfig,
}

/// File path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Working catalog file. The format follows the extension.
    /// Defaults to `catalog.json` in the platform data directory.
    pub catalog_file: Option<PathBuf>,

    /// Directory exports are written to.
    pub export_directory: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog_file: None,
            export_directory: PathBuf::from("."),
        }
    }
}

/// HTML export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the exported file.
    pub file_name: String,

    /// Contents of the page `<title>`.
    pub page_title: String,

    /// Visible heading at the top of the page.
    pub heading: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            page_title: "輕小說進度追蹤".to_string(),
            heading: "📚 輕小說進度表".to_string(),
        }
    }
}

/// Defaults for new records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Header color for new publishers.
    pub publisher_color: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            publisher_color: NEW_PUBLISHER_COLOR.to_string(),
        }
    }
}

impl Config {
    /// Returns the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join(CONFIG_FILENAME))
    }

    /// Loads configuration from the default location.
    ///
    /// If the config file doesn't exist, creates a default one.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let file_name = self.export.file_name.trim();
        if file_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "export.file_name".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        if !extension.is_some_and(|ext| EXPORT_EXTENSIONS.contains(&ext.as_str())) {
            return Err(ConfigError::InvalidValue {
                key: "export.file_name".to_string(),
                message: format!("must end in one of: {}", EXPORT_EXTENSIONS.join(", ")),
            });
        }

        if self.defaults.publisher_color.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "defaults.publisher_color".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the effective working catalog path, using config or default.
    pub fn catalog_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref file) = self.paths.catalog_file {
            return Ok(file.clone());
        }

        dirs::data_dir()
            .map(|p| p.join(APP_NAME).join(CATALOG_FILENAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Returns the default export target.
    pub fn export_path(&self) -> PathBuf {
        self.paths.export_directory.join(&self.export.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.export.file_name, "My_Light_Novel_List.html");
        assert_eq!(config.defaults.publisher_color, "#e0e7ff");
        assert!(config.paths.catalog_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.export.heading = "我的書單".to_string();
        config.paths.catalog_file = Some(PathBuf::from("/tmp/books.html"));
        let file = NamedTempFile::new().unwrap();

        config.save_to(file.path()).unwrap();

        let loaded = Config::load_from(file.path()).unwrap();
        assert_eq!(loaded.export.heading, "我的書單");
        assert_eq!(
            loaded.paths.catalog_file,
            Some(PathBuf::from("/tmp/books.html"))
        );
    }

    #[test]
    fn test_missing_file_creates_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.export.file_name, EXPORT_FILE_NAME);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\nheading = \"Books\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.export.heading, "Books");
        assert_eq!(config.export.file_name, EXPORT_FILE_NAME);
        assert_eq!(config.paths.export_directory, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.export.file_name = "  ".to_string();
        assert!(config.validate().is_err());

        config.export.file_name = "list.pdf".to_string();
        assert!(config.validate().is_err());

        config.export.file_name = "list.JSON".to_string();
        assert!(config.validate().is_ok());

        config.defaults.publisher_color = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_catalog_and_export_paths() {
        let mut config = Config::default();
        config.paths.catalog_file = Some(PathBuf::from("mine.json"));
        assert_eq!(config.catalog_path().unwrap(), PathBuf::from("mine.json"));

        config.paths.export_directory = PathBuf::from("out");
        assert_eq!(
            config.export_path(),
            PathBuf::from("out").join("My_Light_Novel_List.html")
        );
    }
}
