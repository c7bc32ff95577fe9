//! Effective-threshold resolution
//!
//! What the dashboard shows for a resource outside of editing: the override
//! value if one is present, else the applicable default, else 0. Pure
//! functions over config snapshots.

use crate::config::{AlertConfig, Override};
use crate::defaults::{metrics_for, Defaults};
use std::collections::BTreeMap;
use vigil_common::{Metric, ResourceKind, ThresholdSet};

/// Resolve one metric for one resource
pub fn effective_threshold(
    overrides: &BTreeMap<String, Override>,
    defaults: &Defaults,
    id: &str,
    kind: ResourceKind,
    metric: Metric,
) -> f64 {
    overrides
        .get(id)
        .and_then(|ov| ov.thresholds.get(metric))
        .unwrap_or_else(|| defaults.value_for(kind, metric))
}

/// Resolve the full threshold set a resource is evaluated against, with
/// overrides merged over the applicable defaults
pub fn effective_thresholds(
    overrides: &BTreeMap<String, Override>,
    defaults: &Defaults,
    id: &str,
    kind: ResourceKind,
) -> ThresholdSet {
    metrics_for(kind)
        .iter()
        .map(|&metric| (metric, effective_threshold(overrides, defaults, id, kind, metric)))
        .collect()
}

impl AlertConfig {
    /// Convenience accessor over a config snapshot
    pub fn effective_threshold(&self, id: &str, kind: ResourceKind, metric: Metric) -> f64 {
        effective_threshold(&self.overrides, &self.defaults, id, kind, metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_common::ResourceState;

    fn config_with_override() -> AlertConfig {
        let mut config = AlertConfig::default();
        config.overrides.insert(
            "vm-100".to_string(),
            Override {
                kind: ResourceKind::Guest,
                state: ResourceState::default(),
                thresholds: [(Metric::Memory, 95.0)].into_iter().collect(),
            },
        );
        config
    }

    #[test]
    fn test_override_wins_over_default() {
        let config = config_with_override();
        assert_eq!(
            config.effective_threshold("vm-100", ResourceKind::Guest, Metric::Memory),
            95.0
        );
        // metric without an override falls back to the default
        assert_eq!(
            config.effective_threshold("vm-100", ResourceKind::Guest, Metric::Cpu),
            80.0
        );
    }

    #[test]
    fn test_no_override_no_default_resolves_to_zero() {
        let config = AlertConfig::default();
        assert_eq!(
            config.effective_threshold("pbs-1", ResourceKind::Pbs, Metric::Disk),
            0.0
        );
    }

    #[test]
    fn test_resolution_is_pure() {
        let config = config_with_override();
        let a = config.effective_threshold("vm-100", ResourceKind::Guest, Metric::Memory);
        let b = config.effective_threshold("vm-100", ResourceKind::Guest, Metric::Memory);
        assert_eq!(a, b);
    }

    #[test]
    fn test_effective_set_covers_kind_universe() {
        let config = config_with_override();
        let set = effective_thresholds(
            &config.overrides,
            &config.defaults,
            "vm-100",
            ResourceKind::Guest,
        );
        assert_eq!(set.get(Metric::Memory), Some(95.0));
        assert_eq!(set.get(Metric::Cpu), Some(80.0));
        assert_eq!(set.get(Metric::NetworkIn), Some(0.0));
        assert_eq!(set.get(Metric::Usage), None);
    }
}
