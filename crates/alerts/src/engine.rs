//! Hysteresis alert evaluation
//!
//! Consumes the persisted hysteresis records: an alert fires when a metric
//! reaches its trigger and clears only once the value falls back to the clear
//! threshold, so values hovering around the trigger do not flap.

use crate::config::{AlertConfig, HysteresisThreshold, HYSTERESIS_MARGIN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use vigil_common::{Metric, OfflineSeverity, ResourceKind};

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

/// An active alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub resource_id: String,
    pub resource_name: String,
    pub kind: ResourceKind,
    /// `None` for offline/connectivity alerts
    pub metric: Option<Metric>,
    pub value: f64,
    pub threshold: f64,
    pub severity: Severity,
    pub started_at: DateTime<Utc>,
}

/// Tracks active alerts and applies the trigger/clear deadband
#[derive(Debug, Default)]
pub struct AlertEngine {
    active: BTreeMap<String, Alert>,
}

fn metric_alert_id(resource_id: &str, metric: Metric) -> String {
    format!("{}-{}", resource_id, metric)
}

fn offline_alert_id(resource_id: &str) -> String {
    format!("{}-offline", resource_id)
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_alerts(&self) -> Vec<Alert> {
        self.active.values().cloned().collect()
    }

    pub fn is_active(&self, alert_id: &str) -> bool {
        self.active.contains_key(alert_id)
    }

    /// Evaluate one metric sample against the configuration.
    ///
    /// The persisted hysteresis record wins when present; otherwise the pair
    /// is derived from the effective threshold. A trigger of zero or below
    /// means the metric is not alerting (covers both "off" defaults and the
    /// per-resource `-1` override) and clears any active alert.
    pub fn evaluate_metric(
        &mut self,
        config: &AlertConfig,
        resource_id: &str,
        kind: ResourceKind,
        resource_name: &str,
        metric: Metric,
        value: f64,
    ) {
        let alert_id = metric_alert_id(resource_id, metric);

        if !config.enabled || self.resource_suppressed(config, resource_id) {
            self.clear(&alert_id, "alerting suppressed");
            return;
        }

        let pair = self.threshold_pair(config, resource_id, kind, metric);
        if pair.trigger <= 0.0 {
            self.clear(&alert_id, "threshold disabled");
            return;
        }

        match self.active.get_mut(&alert_id) {
            Some(alert) => {
                alert.value = value;
                // Severity follows the current value in both directions
                alert.severity = if value >= pair.trigger + HYSTERESIS_MARGIN {
                    Severity::Critical
                } else {
                    Severity::Warning
                };
                if value <= pair.clear {
                    self.clear(&alert_id, "value back below clear threshold");
                }
            }
            None => {
                if value >= pair.trigger {
                    let severity = if value >= pair.trigger + HYSTERESIS_MARGIN {
                        Severity::Critical
                    } else {
                        Severity::Warning
                    };
                    info!(
                        resource = %resource_id,
                        metric = %metric,
                        value,
                        trigger = pair.trigger,
                        "Alert raised"
                    );
                    self.active.insert(
                        alert_id.clone(),
                        Alert {
                            id: alert_id,
                            resource_id: resource_id.to_string(),
                            resource_name: resource_name.to_string(),
                            kind,
                            metric: Some(metric),
                            value,
                            threshold: pair.trigger,
                            severity,
                            started_at: Utc::now(),
                        },
                    );
                }
            }
        }
    }

    /// Report a resource as unreachable/powered off
    pub fn resource_offline(
        &mut self,
        config: &AlertConfig,
        resource_id: &str,
        kind: ResourceKind,
        resource_name: &str,
    ) {
        let alert_id = offline_alert_id(resource_id);
        let state = config
            .overrides
            .get(resource_id)
            .map(|ov| ov.state)
            .unwrap_or_default();

        if !config.enabled || state.disabled || state.disable_connectivity {
            self.clear(&alert_id, "connectivity alerts suppressed");
            return;
        }

        let severity = match state.powered_off_severity {
            Some(OfflineSeverity::Critical) => Severity::Critical,
            Some(OfflineSeverity::Warning) | None => Severity::Warning,
        };

        match self.active.get_mut(&alert_id) {
            Some(alert) => alert.severity = severity,
            None => {
                info!(resource = %resource_id, severity = ?severity, "Resource offline");
                self.active.insert(
                    alert_id.clone(),
                    Alert {
                        id: alert_id,
                        resource_id: resource_id.to_string(),
                        resource_name: resource_name.to_string(),
                        kind,
                        metric: None,
                        value: 0.0,
                        threshold: 0.0,
                        severity,
                        started_at: Utc::now(),
                    },
                );
            }
        }
    }

    /// Report a resource as reachable again
    pub fn resource_online(&mut self, resource_id: &str) {
        self.clear(&offline_alert_id(resource_id), "resource back online");
    }

    /// Re-check active alerts after a configuration change and clear those
    /// that are no longer valid under the new thresholds.
    ///
    /// Unlike live evaluation, a config change also resolves an alert whose
    /// value now sits inside the new deadband (`clear < value < trigger`):
    /// the alert never fired under the new trigger, so keeping it up would be
    /// misleading. It re-raises only if the value reaches the new trigger.
    pub fn sync_config(&mut self, config: &AlertConfig) {
        let stale: Vec<String> = self
            .active
            .values()
            .filter_map(|alert| {
                let metric = alert.metric?;
                let pair =
                    self.threshold_pair(config, &alert.resource_id, alert.kind, metric);
                let suppressed = !config.enabled
                    || self.resource_suppressed(config, &alert.resource_id)
                    || pair.trigger <= 0.0;
                if suppressed || alert.value <= pair.clear || alert.value < pair.trigger {
                    Some(alert.id.clone())
                } else {
                    None
                }
            })
            .collect();

        for id in stale {
            self.clear(&id, "config change invalidated alert");
        }
    }

    fn resource_suppressed(&self, config: &AlertConfig, resource_id: &str) -> bool {
        config
            .overrides
            .get(resource_id)
            .map(|ov| ov.state.disabled)
            .unwrap_or(false)
    }

    fn threshold_pair(
        &self,
        config: &AlertConfig,
        resource_id: &str,
        kind: ResourceKind,
        metric: Metric,
    ) -> HysteresisThreshold {
        if let Some(pair) = config
            .hysteresis
            .get(resource_id)
            .and_then(|record| record.metrics.get(&metric))
        {
            return *pair;
        }
        HysteresisThreshold::from_trigger(config.effective_threshold(resource_id, kind, metric))
    }

    fn clear(&mut self, alert_id: &str, reason: &str) {
        if self.active.remove(alert_id).is_some() {
            debug!(alert = %alert_id, reason, "Alert cleared");
        }
    }
}
