//! Configuration management for DropoutShield
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.dropoutshield/config.toml

use crate::errors::{Result, ShieldError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete configuration for DropoutShield
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub storage: StorageConfig,
    pub identities: IdentitiesConfig,
    pub logging: LoggingConfig,
}

/// Remote predictor connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// How long an "available" result is trusted before re-probing
    pub availability_ttl_secs: u64,
}

/// On-disk locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Bundled `{identity}.csv` snapshots
    pub snapshot_dir: String,
    pub cache_dir: String,
}

/// Owners merged into the aggregate view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitiesConfig {
    pub known: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9999".to_string(),
            timeout_secs: 10,
            availability_ttl_secs: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: "./db".to_string(),
            cache_dir: "~/.dropoutshield/cache".to_string(),
        }
    }
}

impl Default for IdentitiesConfig {
    fn default() -> Self {
        Self {
            known: vec![
                "teacher1".to_string(),
                "teacher2".to_string(),
                "teacher3".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// One day
const MAX_TTL_SECS: u64 = 86_400;

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ShieldError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ShieldError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from ~/.dropoutshield/config.toml if present, else built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }
        Ok(Config::default())
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".dropoutshield").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(ShieldError::Config("remote.base_url must not be empty".to_string()));
        }

        if self.remote.timeout_secs == 0 {
            return Err(ShieldError::Config(
                "remote.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.remote.availability_ttl_secs > MAX_TTL_SECS {
            return Err(ShieldError::Config(format!(
                "remote.availability_ttl_secs must be at most {}",
                MAX_TTL_SECS
            )));
        }

        if self.identities.known.iter().all(|id| id.trim().is_empty()) {
            return Err(ShieldError::Config(
                "identities.known must list at least one identity".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ShieldError::Config(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ShieldError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ShieldError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ShieldError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        Self::expand_path(&self.storage.snapshot_dir)
    }

    pub fn cache_dir(&self) -> PathBuf {
        Self::expand_path(&self.storage.cache_dir)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    pub fn availability_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.remote.availability_ttl_secs.min(MAX_TTL_SECS) as i64)
    }

    /// Known identities with blanks removed
    pub fn known_identities(&self) -> Vec<String> {
        self.identities
            .known
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.remote.base_url, "http://localhost:9999");
        assert_eq!(config.remote.timeout_secs, 10);
        assert_eq!(config.identities.known.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[remote]\nbase_url = \"http://predictor:8000\"\n").unwrap();
        assert_eq!(config.remote.base_url, "http://predictor:8000");
        assert_eq!(config.remote.availability_ttl_secs, 10);
        assert_eq!(config.storage.snapshot_dir, "./db");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation_empty_url() {
        let mut config = Config::default();
        config.remote.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.remote.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_identities() {
        let mut config = Config::default();
        config.identities.known = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf").join("config.toml");
        let mut config = Config::default();
        config.identities.known = vec!["ms_rao".to_string()];
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[remote]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(Config::load(Some(path.as_path())), Err(ShieldError::Config(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.dropoutshield");
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_expand_path_without_tilde() {
        assert_eq!(Config::expand_path("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_known_identities_trimmed() {
        let mut config = Config::default();
        config.identities.known = vec![" a ".to_string(), "".to_string(), "b".to_string()];
        assert_eq!(config.known_identities(), vec!["a", "b"]);
    }
}
