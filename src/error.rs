//! Error types for clash-override.

use thiserror::Error;

/// Error type for configuration generation.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or rendering error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source document has no `proxies` list
    #[error("source config has no `proxies` list")]
    MissingProxies,

    /// Malformed generator option
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A group member or rule target that names nothing in the document
    #[error("{owner} references unknown group or provider `{reference}`")]
    DanglingReference { owner: String, reference: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for clash-override operations.
pub type Result<T> = std::result::Result<T, Error>;
