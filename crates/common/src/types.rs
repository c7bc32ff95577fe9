//! Core types for Vigil

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Threshold value meaning "alerting disabled for this metric on this resource".
///
/// Distinct from an absent entry, which means "inherit the applicable default".
pub const DISABLED_THRESHOLD: f64 = -1.0;

/// Resource classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    Guest,
    Node,
    Storage,
    Pbs,
    DockerHost,
    DockerContainer,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Guest => write!(f, "guest"),
            ResourceKind::Node => write!(f, "node"),
            ResourceKind::Storage => write!(f, "storage"),
            ResourceKind::Pbs => write!(f, "pbs"),
            ResourceKind::DockerHost => write!(f, "dockerHost"),
            ResourceKind::DockerContainer => write!(f, "dockerContainer"),
        }
    }
}

/// Metric name, scoped by resource kind (not every metric applies to every kind)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "cpu")]
    Cpu,
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "disk")]
    Disk,
    #[serde(rename = "diskRead")]
    DiskRead,
    #[serde(rename = "diskWrite")]
    DiskWrite,
    #[serde(rename = "networkIn")]
    NetworkIn,
    #[serde(rename = "networkOut")]
    NetworkOut,
    #[serde(rename = "usage")]
    Usage,
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "restartCount")]
    RestartCount,
}

impl Metric {
    /// Wire name as persisted in the config document
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Disk => "disk",
            Metric::DiskRead => "diskRead",
            Metric::DiskWrite => "diskWrite",
            Metric::NetworkIn => "networkIn",
            Metric::NetworkOut => "networkOut",
            Metric::Usage => "usage",
            Metric::Temperature => "temperature",
            Metric::RestartCount => "restartCount",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sparse mapping from metric to threshold value.
///
/// Absent entries mean "unset"; [`DISABLED_THRESHOLD`] means alerting is off for
/// that metric specifically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdSet(BTreeMap<Metric, f64>);

impl ThresholdSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.0.get(&metric).copied()
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.0.insert(metric, value);
    }

    /// Set from raw user input. Malformed or non-finite values degrade to
    /// "unset" for this one field rather than failing the whole edit.
    pub fn set_raw(&mut self, metric: Metric, raw: &str) {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => {
                self.0.insert(metric, v);
            }
            _ => {
                self.0.remove(&metric);
            }
        }
    }

    pub fn unset(&mut self, metric: Metric) {
        self.0.remove(&metric);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains_key(&metric)
    }
}

impl FromIterator<(Metric, f64)> for ThresholdSet {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Severity of the offline/powered-off alert for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfflineSeverity {
    Warning,
    Critical,
}

impl std::fmt::Display for OfflineSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfflineSeverity::Warning => write!(f, "warning"),
            OfflineSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Alert-state flags attached to a resource, persisted alongside threshold
/// overrides but editable through separate interaction paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState {
    /// Completely suppress alerts for this resource
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,

    /// Suppress offline/connectivity/powered-off alerts
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_connectivity: bool,

    /// Severity override for the offline alert.
    /// Mutually exclusive with `disable_connectivity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powered_off_severity: Option<OfflineSeverity>,
}

impl ResourceState {
    /// True if any flag carries information beyond the defaults
    pub fn has_override(&self) -> bool {
        self.disabled || self.disable_connectivity || self.powered_off_severity.is_some()
    }

    /// Toggle full alert suppression, leaving the offline-alert state untouched
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Enable or disable connectivity alerts. Disabling them clears any
    /// severity override, since the two are mutually exclusive.
    pub fn with_connectivity_disabled(mut self, disable: bool) -> Self {
        self.disable_connectivity = disable;
        if disable {
            self.powered_off_severity = None;
        }
        self
    }

    /// Choose an offline-alert severity. Setting one re-enables connectivity
    /// alerts (clears `disable_connectivity`).
    pub fn with_offline_severity(mut self, severity: Option<OfflineSeverity>) -> Self {
        self.powered_off_severity = severity;
        if severity.is_some() {
            self.disable_connectivity = false;
        }
        self
    }
}
