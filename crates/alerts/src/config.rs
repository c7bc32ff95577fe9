//! Persisted alert configuration shapes
//!
//! These structs serialize verbatim into the JSON config document owned by the
//! host application's persistence layer. Field names are wire-stable.

use crate::defaults::Defaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use vigil_common::{Metric, ResourceKind, ResourceState, ThresholdSet};

/// Fixed deadband between an alert's trigger and clear values.
///
/// An alert that fires at `trigger` does not clear until the metric falls back
/// below `trigger - HYSTERESIS_MARGIN`. Not user-configurable.
pub const HYSTERESIS_MARGIN: f64 = 5.0;

/// A threshold with hysteresis: fires at `trigger`, clears at `clear`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HysteresisThreshold {
    pub trigger: f64,
    pub clear: f64,
}

impl HysteresisThreshold {
    /// Derive the persisted pair from a plain trigger value
    pub fn from_trigger(trigger: f64) -> Self {
        Self {
            trigger,
            clear: (trigger - HYSTERESIS_MARGIN).max(0.0),
        }
    }

    /// Repair records written by older versions that stored only a trigger
    pub fn normalized(mut self) -> Self {
        if self.clear <= 0.0 && self.trigger > 0.0 {
            self.clear = (self.trigger - HYSTERESIS_MARGIN).max(0.0);
        }
        if self.clear > self.trigger {
            self.clear = self.trigger;
        }
        self
    }
}

/// Per-resource customization of thresholds and alert-state flags.
///
/// `thresholds` holds only entries that differ from the applicable defaults.
/// An override that carries neither a threshold nor a state flag must not be
/// persisted; the reconciler deletes it instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Override {
    /// Resource classification, echoed from the listing API
    pub kind: ResourceKind,

    #[serde(flatten)]
    pub state: ResourceState,

    #[serde(default, skip_serializing_if = "ThresholdSet::is_empty")]
    pub thresholds: ThresholdSet,
}

impl Override {
    /// True if this override contributes no information beyond defaults
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty() && !self.state.has_override()
    }
}

/// Persisted hysteresis representation of an override: trigger/clear pairs for
/// each retained metric plus the state flags verbatim. State flags never
/// produce hysteresis entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOverrideRecord {
    #[serde(flatten)]
    pub state: ResourceState,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<Metric, HysteresisThreshold>,
}

/// The complete alert configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertConfig {
    pub enabled: bool,

    pub defaults: Defaults,

    /// Keyed by resource id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, Override>,

    /// Raw hysteresis records, keyed by resource id, kept in lockstep with
    /// `overrides`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hysteresis: BTreeMap<String, RawOverrideRecord>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            defaults: Defaults::factory(),
            overrides: BTreeMap::new(),
            hysteresis: BTreeMap::new(),
        }
    }
}

impl AlertConfig {
    /// Normalize a loaded document: repair legacy hysteresis records and drop
    /// overrides that carry no information beyond defaults.
    pub fn normalize(&mut self) {
        self.defaults.sanitize();

        // A hand-edited or legacy document can carry both flags; the save
        // paths never produce that, and suppression wins.
        for (id, ov) in self.overrides.iter_mut() {
            if ov.state.disable_connectivity && ov.state.powered_off_severity.is_some() {
                warn!(
                    resource = %id,
                    "Dropping offline severity that contradicts disabled connectivity alerts"
                );
                ov.state = ov.state.with_connectivity_disabled(true);
            }
        }

        for record in self.hysteresis.values_mut() {
            if record.state.disable_connectivity && record.state.powered_off_severity.is_some() {
                record.state = record.state.with_connectivity_disabled(true);
            }
            for threshold in record.metrics.values_mut() {
                *threshold = threshold.normalized();
            }
        }

        let empty: Vec<String> = self
            .overrides
            .iter()
            .filter(|(_, o)| o.is_empty())
            .map(|(id, _)| id.clone())
            .collect();
        for id in empty {
            warn!(resource = %id, "Dropping empty override from loaded config");
            self.overrides.remove(&id);
            self.hysteresis.remove(&id);
        }
    }
}
