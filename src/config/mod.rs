use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_notifications() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Request file to load when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests_file: Option<PathBuf>,

    /// Raise a desktop notification when a request is accepted or declined
    #[serde(default = "default_notifications")]
    pub notifications: bool,

    /// Open the action sheet for the first request at startup
    #[serde(default)]
    pub auto_open: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            requests_file: None,
            notifications: true,
            auto_open: false,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("curbside");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // An empty requests_file entry means "not set"
        let mut clean_config = self.clone();
        if clean_config
            .requests_file
            .as_ref()
            .map(|p| p.as_os_str().is_empty())
            .unwrap_or(false)
        {
            clean_config.requests_file = None;
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
