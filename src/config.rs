//! Viewer configuration
//!
//! Stored as pretty-printed JSON. Every field has a default, so a config
//! file only needs the keys it wants to change.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::display::DEFAULT_SIZE;
use crate::error::ConfigError;
use crate::fractal::FractalVariant;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_PATH: &str = "explorer.json";

/// Largest accepted grid edge
pub const MAX_DISPLAY_SIZE: u32 = 8192;

const DEFAULT_MQTT_PORT: u16 = 1883;
const DEFAULT_MQTT_TOPIC: &str = "fractal-explorer";

/// MQTT remote control settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    #[serde(default = "default_mqtt_topic")]
    pub topic: String,
}

fn default_mqtt_port() -> u16 {
    DEFAULT_MQTT_PORT
}

fn default_mqtt_topic() -> String {
    DEFAULT_MQTT_TOPIC.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Edge length of the square window and render grid
    pub display_size: u32,
    /// Variant shown at startup
    pub variant: FractalVariant,
    /// Extent multiplier for a left click
    pub zoom_in_scale: f64,
    /// Extent multiplier for a right click
    pub zoom_out_scale: f64,
    /// Destination for exports that don't name a path
    pub export_path: PathBuf,
    /// Render worker count (None = one per core)
    pub render_threads: Option<usize>,
    /// Unix socket for remote commands (None = disabled)
    pub socket_path: Option<PathBuf>,
    /// MQTT remote commands (None = disabled)
    pub mqtt: Option<MqttConfig>,
    pub vsync: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            display_size: DEFAULT_SIZE,
            variant: FractalVariant::default(),
            zoom_in_scale: 0.5,
            zoom_out_scale: 2.0,
            export_path: PathBuf::from("fractal.png"),
            render_threads: None,
            socket_path: None,
            mqtt: None,
            vsync: true,
        }
    }
}

impl ExplorerConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the default config file, falling back to defaults if it is missing
    /// or unreadable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!("Config loaded from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            },
        }
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_size == 0 || self.display_size > MAX_DISPLAY_SIZE {
            return Err(ConfigError::Invalid(format!(
                "display_size must be between 1 and {} (got {})",
                MAX_DISPLAY_SIZE, self.display_size
            )));
        }
        for (name, scale) in [
            ("zoom_in_scale", self.zoom_in_scale),
            ("zoom_out_scale", self.zoom_out_scale),
        ] {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number (got {})",
                    name, scale
                )));
            }
        }
        if self.render_threads == Some(0) {
            return Err(ConfigError::Invalid("render_threads must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ExplorerConfig::default();
        assert_eq!(config.display_size, 800);
        assert_eq!(config.variant, FractalVariant::Mandelbrot);
        assert_eq!(config.zoom_in_scale, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{ "variant": "burning_ship", "display_size": 400 }"#).unwrap();
        assert_eq!(config.variant, FractalVariant::BurningShip);
        assert_eq!(config.display_size, 400);
        assert_eq!(config.zoom_out_scale, 2.0);
        assert!(config.mqtt.is_none());
    }

    #[test]
    fn test_mqtt_defaults() {
        let config: ExplorerConfig =
            serde_json::from_str(r#"{ "mqtt": { "host": "localhost" } }"#).unwrap();
        let mqtt = config.mqtt.unwrap();
        assert_eq!(mqtt.port, 1883);
        assert_eq!(mqtt.topic, "fractal-explorer");
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.json");
        let config = ExplorerConfig {
            display_size: 256,
            variant: FractalVariant::Tricorn,
            render_threads: Some(2),
            socket_path: Some(PathBuf::from("/tmp/x.sock")),
            ..ExplorerConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = ExplorerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ExplorerConfig {
            display_size: 0,
            ..ExplorerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.display_size = 100;
        config.zoom_in_scale = -1.0;
        assert!(config.validate().is_err());
        config.zoom_in_scale = 0.5;
        config.render_threads = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = ExplorerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempdir().unwrap();
        let config = ExplorerConfig::load_or_default(dir.path().join("does-not-exist.json"));
        assert_eq!(config, ExplorerConfig::default());
    }
}
