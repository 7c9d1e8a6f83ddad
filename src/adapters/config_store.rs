use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{AppConfig, DomainError};
use crate::ports::ConfigStore;

/// TOML-based configuration store with OS-specific paths.
pub struct TomlConfigStore {
    data_dir: PathBuf,
}

impl TomlConfigStore {
    /// Create a new TomlConfigStore rooted in the OS config directory
    /// (e.g. `~/.config/voxnote` on Linux).
    pub fn new() -> Result<Self, DomainError> {
        let data_dir = dirs::config_dir()
            .map(|p| p.join("voxnote"))
            .ok_or_else(|| {
                DomainError::Config("Could not find application data directory".to_string())
            })?;

        fs::create_dir_all(&data_dir)?;

        Ok(Self { data_dir })
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig, DomainError> {
        let config_path = self.config_path();

        if config_path.exists() {
            debug!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            info!(path = ?config_path, "Configuration file not found, creating default");
            let config = AppConfig::new();
            self.save(&config)?;
            Ok(config)
        }
    }

    fn save(&self, config: &AppConfig) -> Result<(), DomainError> {
        let config_path = self.config_path();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&config_path, content)?;

        info!(path = ?config_path, "Configuration saved");
        Ok(())
    }

    fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    fn logs_dir(&self) -> PathBuf {
        dirs::data_dir()
            .map(|p| p.join("voxnote").join("logs"))
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let store = TomlConfigStore {
            data_dir: dir.path().to_path_buf(),
        };

        let mut config = AppConfig::new();
        config.transcription.model = "small.en".to_string();
        config.logging.level = "debug".to_string();

        store.save(&config).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.transcription.model, "small.en");
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_load_creates_default_config() {
        let dir = tempdir().unwrap();
        let store = TomlConfigStore {
            data_dir: dir.path().to_path_buf(),
        };

        let config = store.load().unwrap();
        assert_eq!(config.transcription.model, "medium");
        assert!(store.config_path().exists());
    }
}
