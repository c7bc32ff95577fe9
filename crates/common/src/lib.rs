//! Vigil Common Library
//!
//! Shared types and infrastructure for the Vigil monitoring core.

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

/// Vigil version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
