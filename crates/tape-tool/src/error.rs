//! Error types for tool configuration.

use tape_scale::ScaleError;
use thiserror::Error;

/// Errors raised while loading or validating a [`ToolConfig`](crate::ToolConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for a tool config.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configured default scale does not parse.
    #[error("invalid default scale {spec:?}: {source}")]
    InvalidScale {
        /// The scale text as configured.
        spec: String,
        /// Why it was rejected.
        #[source]
        source: ScaleError,
    },

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
