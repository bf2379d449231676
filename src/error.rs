//! Error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Writing the current view to an image file
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing has been rendered yet")]
    NoFrame,

    #[error("A render is still in progress")]
    Busy,

    #[error("Pixel buffer does not match its {width}x{height} dimensions")]
    BufferSize { width: u32, height: u32 },

    #[error("Failed to write {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Loading or validating the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Unix socket remote control
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Failed to bind socket {}: {source}", .path.display())]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} exists and is not a socket", .0.display())]
    NotSocket(PathBuf),

    #[error("Failed to set non-blocking: {0}")]
    NonBlocking(#[source] io::Error),
}

/// MQTT remote control
#[derive(Debug, Error)]
pub enum MqttError {
    #[error("Failed to subscribe to topic '{topic}': {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: rumqttc::ClientError,
    },

    #[error("Failed to connect to MQTT broker at {host}:{port} - {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },
}

/// Top-level application error
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start render workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Invalid argument: {0}")]
    Usage(String),
}

impl From<String> for ExplorerError {
    /// SDL reports failures as plain strings
    fn from(message: String) -> Self {
        Self::Display(message)
    }
}
