//! Global configuration for stave
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/stave/config.yaml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend endpoints
    pub backend: BackendConfig,
    /// Playback and listener settings
    pub playback: PlaybackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the REST API
    pub api_url: String,
    /// WebSocket URL of the push channel
    pub ws_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: String::from("http://localhost:5001/api"),
            ws_url: String::from("ws://localhost:5001/ws"),
        }
    }
}

/// Playback and listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Instrument preselected in the input form (backend instrument id)
    pub default_instrument: String,
    /// Maximum note rows rendered in the listener timeline
    pub note_list_limit: usize,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_instrument: String::from("piano"),
            note_list_limit: 200,
        }
    }
}

impl PlaybackConfig {
    /// Clamp values to sane display ranges
    pub fn validate(&mut self) {
        self.note_list_limit = self.note_list_limit.clamp(10, 1000);
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/stave/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("stave")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> Config {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
            Ok(mut config) => {
                config.playback.validate();
                log::info!(
                    "load_config: Loaded config - backend: {}",
                    config.backend.api_url
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                Config::default()
            }
        },
        Err(e) => {
            log::warn!("load_config: Failed to read config file: {}, using defaults", e);
            Config::default()
        }
    }
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: Config saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.api_url, "http://localhost:5001/api");
        assert_eq!(config.playback.default_instrument, "piano");
        assert_eq!(config.playback.note_list_limit, 200);
    }

    #[test]
    fn test_validation_clamps_note_limit() {
        let mut playback = PlaybackConfig {
            default_instrument: String::from("piano"),
            note_list_limit: 5,
        };
        playback.validate();
        assert_eq!(playback.note_list_limit, 10);

        playback.note_list_limit = 100_000;
        playback.validate();
        assert_eq!(playback.note_list_limit, 1000);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = Config::default();
        config.backend.api_url = String::from("http://studio.local:8080/api");
        config.playback.default_instrument = String::from("violon");

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.backend.api_url, "http://studio.local:8080/api");
        assert_eq!(parsed.playback.default_instrument, "violon");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed: Config = serde_yaml::from_str("backend:\n  api_url: http://x/api\n").unwrap();
        assert_eq!(parsed.backend.api_url, "http://x/api");
        // Everything unspecified falls back to defaults
        assert_eq!(parsed.backend.ws_url, "ws://localhost:5001/ws");
        assert_eq!(parsed.playback.note_list_limit, 200);
    }
}
