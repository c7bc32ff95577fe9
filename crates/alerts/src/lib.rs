//! Vigil Alerts
//!
//! Threshold defaults, override reconciliation, effective-threshold
//! resolution, config persistence, and hysteresis alert evaluation for the
//! Vigil monitoring core.

pub mod config;
pub mod defaults;
pub mod engine;
pub mod persistence;
pub mod reconciler;
pub mod resolve;
pub mod store;

// Re-export commonly used types
pub use config::{AlertConfig, HysteresisThreshold, Override, RawOverrideRecord, HYSTERESIS_MARGIN};
pub use defaults::{metrics_for, Defaults};
pub use engine::{Alert, AlertEngine, Severity};
pub use reconciler::{reconcile_save, SaveOutcome, StateEdit};
pub use resolve::{effective_threshold, effective_thresholds};
pub use store::OverrideStore;
