//! Override reconciliation
//!
//! Given a drafted threshold set, the applicable defaults, and the resource's
//! alert-state flags, compute the minimal override to persist, or decide that
//! the override must be deleted because it would carry no information beyond
//! the defaults.
//!
//! Everything here is pure: same inputs, same outputs, no hidden state. The
//! store applies the outcome to the config maps.

use crate::config::{HysteresisThreshold, Override, RawOverrideRecord};
use vigil_common::{OfflineSeverity, ResourceKind, ResourceState, ThresholdSet};

/// Result of reconciling a save against the applicable defaults
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Persist this override and its hysteresis record
    Upsert {
        ov: Override,
        record: RawOverrideRecord,
    },
    /// The save nets out to "no customization": any existing override and
    /// record for the resource must be removed
    Delete,
}

/// A partial edit of the alert-state flags.
///
/// Fields left `None` are untouched by this interaction and keep their
/// previously stored value, so a save of one concern (say, thresholds) never
/// silently erases another (say, an offline-severity choice) set elsewhere.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StateEdit {
    pub disabled: Option<bool>,
    pub disable_connectivity: Option<bool>,
    pub powered_off_severity: Option<Option<OfflineSeverity>>,
}

impl StateEdit {
    /// An edit that touches nothing
    pub fn none() -> Self {
        Self::default()
    }

    pub fn disabled(value: bool) -> Self {
        Self {
            disabled: Some(value),
            ..Self::default()
        }
    }

    pub fn connectivity_disabled(value: bool) -> Self {
        Self {
            disable_connectivity: Some(value),
            ..Self::default()
        }
    }

    pub fn offline_severity(value: Option<OfflineSeverity>) -> Self {
        Self {
            powered_off_severity: Some(value),
            ..Self::default()
        }
    }

    /// Merge this edit over the previously stored flags. Mutual exclusion of
    /// `disable_connectivity` and `powered_off_severity` is enforced by the
    /// `ResourceState` builders.
    pub fn apply(self, prior: ResourceState) -> ResourceState {
        let mut state = prior;
        if let Some(disabled) = self.disabled {
            state = state.with_disabled(disabled);
        }
        if let Some(disable) = self.disable_connectivity {
            state = state.with_connectivity_disabled(disable);
        }
        if let Some(severity) = self.powered_off_severity {
            state = state.with_offline_severity(severity);
        }
        state
    }
}

/// Reconcile a drafted threshold set against the applicable defaults.
///
/// `edited` is the draft as the user left it (defaults were pre-merged in when
/// editing began, so untouched fields arrive equal to their default). `state`
/// is the fully merged flag set for the resource, see [`StateEdit::apply`].
///
/// A metric is kept only if its edited value is defined and differs from the
/// default; `-1` (alerting disabled for this resource) is a legitimate
/// override whenever the default is not itself `-1`. The hysteresis record is
/// derived from kept metrics only.
pub fn reconcile_save(
    kind: ResourceKind,
    edited: &ThresholdSet,
    defaults: &ThresholdSet,
    state: ResourceState,
) -> SaveOutcome {
    let kept: ThresholdSet = edited
        .iter()
        .filter(|(metric, value)| defaults.get(*metric) != Some(*value))
        .collect();

    if kept.is_empty() && !state.has_override() {
        return SaveOutcome::Delete;
    }

    let record = RawOverrideRecord {
        state,
        metrics: kept
            .iter()
            .map(|(metric, value)| (metric, HysteresisThreshold::from_trigger(value)))
            .collect(),
    };

    SaveOutcome::Upsert {
        ov: Override {
            kind,
            state,
            thresholds: kept,
        },
        record,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_common::Metric;

    fn guest_defaults() -> ThresholdSet {
        [(Metric::Cpu, 80.0), (Metric::Memory, 85.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_equal_to_default_entries_are_dropped() {
        let edited: ThresholdSet = [(Metric::Cpu, 80.0), (Metric::Memory, 90.0)]
            .into_iter()
            .collect();

        match reconcile_save(
            ResourceKind::Guest,
            &edited,
            &guest_defaults(),
            ResourceState::default(),
        ) {
            SaveOutcome::Upsert { ov, record } => {
                assert_eq!(ov.thresholds.get(Metric::Cpu), None);
                assert_eq!(ov.thresholds.get(Metric::Memory), Some(90.0));
                let h = record.metrics[&Metric::Memory];
                assert_eq!(h.trigger, 90.0);
                assert_eq!(h.clear, 85.0);
                assert!(!record.metrics.contains_key(&Metric::Cpu));
            }
            SaveOutcome::Delete => panic!("expected upsert"),
        }
    }

    #[test]
    fn test_all_defaults_and_no_flags_deletes() {
        let edited: ThresholdSet = [(Metric::Cpu, 80.0)].into_iter().collect();
        let outcome = reconcile_save(
            ResourceKind::Guest,
            &edited,
            &guest_defaults(),
            ResourceState::default(),
        );
        assert_eq!(outcome, SaveOutcome::Delete);
    }

    #[test]
    fn test_minus_one_is_a_real_override() {
        let edited: ThresholdSet = [(Metric::Cpu, -1.0)].into_iter().collect();
        match reconcile_save(
            ResourceKind::Guest,
            &edited,
            &guest_defaults(),
            ResourceState::default(),
        ) {
            SaveOutcome::Upsert { ov, record } => {
                assert_eq!(ov.thresholds.get(Metric::Cpu), Some(-1.0));
                let h = record.metrics[&Metric::Cpu];
                assert_eq!(h.trigger, -1.0);
                assert_eq!(h.clear, 0.0); // clamped, never negative
            }
            SaveOutcome::Delete => panic!("expected upsert"),
        }
    }

    #[test]
    fn test_state_only_override_persists_without_hysteresis() {
        let edited = guest_defaults();
        let state = ResourceState::default().with_disabled(true);
        match reconcile_save(ResourceKind::Guest, &edited, &guest_defaults(), state) {
            SaveOutcome::Upsert { ov, record } => {
                assert!(ov.thresholds.is_empty());
                assert!(ov.state.disabled);
                assert!(record.metrics.is_empty());
                assert!(record.state.disabled);
            }
            SaveOutcome::Delete => panic!("expected upsert"),
        }
    }

    #[test]
    fn test_value_where_default_is_unset_is_kept() {
        let edited: ThresholdSet = [(Metric::DiskRead, 100.0)].into_iter().collect();
        match reconcile_save(
            ResourceKind::Guest,
            &edited,
            &guest_defaults(),
            ResourceState::default(),
        ) {
            SaveOutcome::Upsert { ov, .. } => {
                assert_eq!(ov.thresholds.get(Metric::DiskRead), Some(100.0));
            }
            SaveOutcome::Delete => panic!("expected upsert"),
        }
    }

    #[test]
    fn test_hysteresis_invariant_for_kept_metrics() {
        let edited: ThresholdSet = [
            (Metric::Cpu, 3.0),
            (Metric::Memory, 90.0),
            (Metric::DiskRead, 55.0),
        ]
        .into_iter()
        .collect();
        match reconcile_save(
            ResourceKind::Guest,
            &edited,
            &guest_defaults(),
            ResourceState::default(),
        ) {
            SaveOutcome::Upsert { record, .. } => {
                for h in record.metrics.values() {
                    assert_eq!(h.clear, (h.trigger - 5.0).max(0.0));
                    assert!(h.clear <= h.trigger || h.trigger < 0.0);
                }
            }
            SaveOutcome::Delete => panic!("expected upsert"),
        }
    }

    #[test]
    fn test_state_edit_merges_over_prior() {
        let prior = ResourceState::default().with_offline_severity(Some(OfflineSeverity::Warning));

        // Touching only `disabled` keeps the severity choice
        let merged = StateEdit::disabled(true).apply(prior);
        assert!(merged.disabled);
        assert_eq!(merged.powered_off_severity, Some(OfflineSeverity::Warning));

        // Disabling connectivity clears the severity (mutual exclusion)
        let merged = StateEdit::connectivity_disabled(true).apply(prior);
        assert!(merged.disable_connectivity);
        assert_eq!(merged.powered_off_severity, None);

        // An empty edit changes nothing
        assert_eq!(StateEdit::none().apply(prior), prior);
    }

    #[test]
    fn test_offline_severity_transition_clears_connectivity_flag() {
        let prior = ResourceState {
            disabled: false,
            disable_connectivity: false,
            powered_off_severity: Some(OfflineSeverity::Warning),
        };
        let state = StateEdit::offline_severity(Some(OfflineSeverity::Critical)).apply(prior);
        match reconcile_save(
            ResourceKind::Node,
            &ThresholdSet::new(),
            &ThresholdSet::new(),
            state,
        ) {
            SaveOutcome::Upsert { ov, .. } => {
                assert_eq!(ov.state.powered_off_severity, Some(OfflineSeverity::Critical));
                assert!(!ov.state.disable_connectivity);
            }
            SaveOutcome::Delete => panic!("expected upsert"),
        }
    }
}
