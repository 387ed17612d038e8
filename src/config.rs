//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts for list requests before giving up (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay in milliseconds, doubled per attempt (default: 250).
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_ms: u64,
    /// Serve seeded records instead of calling the API.
    #[serde(default = "default_use_mock")]
    pub use_mock: bool,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_ms() -> u64 {
    250
}

fn default_use_mock() -> bool {
    true
}

/// Simulated data source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Artificial delay before seeded records are delivered.
    pub load_delay_ms: u64,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory used when no save dialog is available.
    pub output_dir: PathBuf,
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Character budget for truncated table cells.
    pub truncate_chars: usize,
    pub dark_mode: bool,
}

impl AppConfig {
    /// Get config file path in the platform config directory.
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("API base URL cannot be empty".to_string()));
        }
        if !self.api.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("API timeout must be at least 1 second".to_string()));
        }
        if self.api.max_retries == 0 {
            return Err(ConfigError::Validation("Max retries must be at least 1".to_string()));
        }
        if self.api.max_retries > 10 {
            return Err(ConfigError::Validation("Max retries cannot exceed 10".to_string()));
        }
        if self.mock.load_delay_ms > 60_000 {
            return Err(ConfigError::Validation(
                "Mock load delay cannot exceed 60000 ms".to_string(),
            ));
        }
        if self.ui.truncate_chars < 10 {
            return Err(ConfigError::Validation(
                "Truncation budget must be at least 10 characters".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "TourismAdmin", "tourism-admin")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_ms: default_retry_base_ms(),
            use_mock: default_use_mock(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self { load_delay_ms: 1000 }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        let output_dir = directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self { output_dir }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            truncate_chars: 50,
            dark_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_retry_bounds() {
        let mut config = AppConfig::default();

        config.api.max_retries = 0;
        assert!(config.validate().is_err());

        config.api.max_retries = 11;
        assert!(config.validate().is_err());

        config.api.max_retries = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str("[api]\nbase_url = \"https://api.example.com\"\n").unwrap();
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.api.use_mock);
        assert_eq!(config.mock.load_delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.api.use_mock = false;
        config.mock.load_delay_ms = 10;
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => {
                assert!(!loaded.api.use_mock);
                assert_eq!(loaded.mock.load_delay_ms, 10);
            }
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::try_load(&dir.path().join("absent.toml")),
            ConfigLoadResult::Missing
        ));
    }
}
