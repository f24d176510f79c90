//! Error types for utility configuration loading.

use std::io;
use std::path::PathBuf;

/// Errors raised while loading a [`UtilityConfig`](crate::UtilityConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// YAML content could not be parsed.
    #[error("Failed to parse YAML config{}: {message}", location(.path))]
    Yaml {
        path: Option<PathBuf>,
        message: String,
    },

    /// JSON content could not be parsed.
    #[error("Failed to parse JSON config{}: {message}", location(.path))]
    Json {
        path: Option<PathBuf>,
        message: String,
    },

    /// The prefix is empty or contains characters that cannot start a class.
    #[error("Invalid utility prefix '{0}'")]
    InvalidPrefix(String),

    /// The file extension does not name a supported format.
    #[error("Unsupported config format for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}
