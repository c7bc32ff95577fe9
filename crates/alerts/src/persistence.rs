//! Config document persistence
//!
//! The alert configuration is stored as a single JSON document. Writes go to a
//! temp file in the same directory followed by a rename, so a crashed save
//! never leaves a truncated document behind.

use crate::config::AlertConfig;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use vigil_common::Result;

/// Load the configuration document, normalizing legacy records. A missing
/// file yields the factory configuration.
pub fn load(path: &Path) -> Result<AlertConfig> {
    match fs::read(path) {
        Ok(bytes) => {
            let mut config: AlertConfig = serde_json::from_slice(&bytes)?;
            config.normalize();
            debug!(path = %path.display(), overrides = config.overrides.len(), "Loaded alert config");
            Ok(config)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No alert config found, using factory defaults");
            Ok(AlertConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Atomically replace the configuration document on disk
pub fn save(path: &Path, config: &AlertConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(config)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &json)?;
    fs::rename(&tmp, path)?;

    debug!(path = %path.display(), bytes = json.len(), "Saved alert config");
    Ok(())
}
