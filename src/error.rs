//! Error types that callers need to tell apart.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors. Always fatal, reported before any ray is traced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed document, missing key or wrong JSON type
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed document with an unusable value
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: String, reason: String },

    /// No exporter for the output file extension
    #[error("unsupported output format `{0}` (expected csv, dat, vtk or json)")]
    UnsupportedFormat(String),
}

impl ConfigError {
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Violations of a physical model's validity domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Collision frequency model queried outside its interpolation band
    #[error(
        "collision frequency model is only valid between {min} m and {max} m altitude, got {altitude} m"
    )]
    CollisionFrequencyOutOfRange { altitude: f64, min: f64, max: f64 },
}
