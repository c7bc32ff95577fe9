//! Error types for Vigil

use thiserror::Error;

/// Result type alias using Vigil Error
pub type Result<T> = std::result::Result<T, Error>;

/// Vigil error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
