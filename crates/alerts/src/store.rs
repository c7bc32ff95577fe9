//! Override store
//!
//! Owns the alert configuration and applies reconciled saves. The override map
//! and the raw hysteresis map always change together inside one critical
//! section, so a re-render racing a save never observes partial state.

use crate::config::AlertConfig;
use crate::defaults::Defaults;
use crate::reconciler::{reconcile_save, SaveOutcome, StateEdit};
use parking_lot::RwLock;
use tracing::{debug, info};
use vigil_common::{OfflineSeverity, ResourceKind, ThresholdSet};

/// Store for the alert configuration
pub struct OverrideStore {
    config: RwLock<AlertConfig>,
}

impl OverrideStore {
    /// Create a store around a (normalized) configuration
    pub fn new(mut config: AlertConfig) -> Self {
        config.normalize();
        Self {
            config: RwLock::new(config),
        }
    }

    /// Cloned snapshot for rendering or persistence
    pub fn snapshot(&self) -> AlertConfig {
        self.config.read().clone()
    }

    /// Save a drafted threshold set for a resource. The resource's state
    /// flags are carried over verbatim; a draft that nets out to the defaults
    /// removes the override entirely.
    pub fn save_thresholds(&self, id: &str, kind: ResourceKind, draft: &ThresholdSet) {
        self.apply_edit(id, kind, Some(draft), StateEdit::none());
    }

    /// Toggle full alert suppression for a resource, keeping its threshold
    /// overrides intact
    pub fn set_disabled(&self, id: &str, kind: ResourceKind, disabled: bool) {
        self.apply_edit(id, kind, None, StateEdit::disabled(disabled));
    }

    /// Suppress or re-enable offline/connectivity alerts for a resource
    pub fn set_connectivity_disabled(&self, id: &str, kind: ResourceKind, disable: bool) {
        self.apply_edit(id, kind, None, StateEdit::connectivity_disabled(disable));
    }

    /// Choose the severity of the offline alert for a resource
    pub fn set_offline_severity(
        &self,
        id: &str,
        kind: ResourceKind,
        severity: Option<OfflineSeverity>,
    ) {
        self.apply_edit(id, kind, None, StateEdit::offline_severity(severity));
    }

    /// Explicitly remove a resource's override. Returns false if none existed.
    pub fn remove_override(&self, id: &str) -> bool {
        let mut config = self.config.write();
        let existed = config.overrides.remove(id).is_some();
        config.hysteresis.remove(id);
        if existed {
            info!(resource = %id, "Removed override");
        }
        existed
    }

    /// Replace the active defaults
    pub fn set_defaults(&self, mut defaults: Defaults) {
        defaults.sanitize();
        self.config.write().defaults = defaults;
        info!("Updated default thresholds");
    }

    /// Restore the factory baseline
    pub fn reset_defaults_to_factory(&self) {
        self.config.write().defaults = Defaults::factory();
        info!("Reset default thresholds to factory values");
    }

    /// Enable or disable alerting globally
    pub fn set_enabled(&self, enabled: bool) {
        self.config.write().enabled = enabled;
        info!(enabled, "Toggled alerting");
    }

    fn apply_edit(
        &self,
        id: &str,
        kind: ResourceKind,
        draft: Option<&ThresholdSet>,
        edit: StateEdit,
    ) {
        let mut config = self.config.write();

        let prior = config.overrides.get(id);
        let prior_state = prior.map(|ov| ov.state).unwrap_or_default();
        // State-only toggles keep the existing non-default thresholds; the
        // two concerns merge, they do not replace each other.
        let existing_thresholds = prior.map(|ov| ov.thresholds.clone()).unwrap_or_default();
        let edited = draft.unwrap_or(&existing_thresholds);

        let state = edit.apply(prior_state);
        let defaults = config.defaults.applicable(kind);

        match reconcile_save(kind, edited, &defaults, state) {
            SaveOutcome::Upsert { ov, record } => {
                debug!(
                    resource = %id,
                    kind = %kind,
                    kept = ov.thresholds.len(),
                    "Persisting override"
                );
                config.overrides.insert(id.to_string(), ov);
                config.hysteresis.insert(id.to_string(), record);
            }
            SaveOutcome::Delete => {
                if config.overrides.remove(id).is_some() {
                    info!(resource = %id, "Override nets out to defaults, removed");
                }
                config.hysteresis.remove(id);
            }
        }
    }
}

impl Default for OverrideStore {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}
