//! Application configuration
//!
//! Settings are stored as RON in the platform config directory and loaded at
//! startup. A missing or unreadable file falls back to defaults.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::ProjectDirs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use msaa_renderer::RendererConfig;

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Whether the settings window is open
    pub show_settings: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { show_settings: true }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    /// Renderer settings
    #[serde(default)]
    pub renderer: RendererConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Read a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Write this configuration to a file, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "", "MsaaViewer").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Owns the live configuration and where it is persisted
#[derive(Debug)]
pub struct ConfigManager {
    config: AppConfig,
    path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load from the default location
    pub fn new() -> Self {
        match default_config_path() {
            Some(path) => Self::with_path(path),
            None => {
                tracing::warn!("No config directory available, settings will not be saved");
                Self {
                    config: AppConfig::default(),
                    path: None,
                }
            }
        }
    }

    /// Load from `path`, falling back to defaults
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = if path.exists() {
            match AppConfig::load(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    AppConfig::default()
                }
            }
        } else {
            AppConfig::default()
        };

        Self {
            config,
            path: Some(path),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Mutable configuration
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Where the configuration is saved
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist the configuration
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::NoConfigDir)?;
        self.config.save(path)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Restore default settings (not saved until [`ConfigManager::save`])
    pub fn reset_to_defaults(&mut self) {
        self.config = AppConfig::default();
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration shared between panels and the app
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Create a shared configuration loaded from the default location
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("No config directory available")]
    NoConfigDir,
}
