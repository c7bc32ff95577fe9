//! Per-kind threshold defaults
//!
//! Every resource kind resolves to a default threshold set when no override
//! exists. The factory baseline is what a fresh install ships and what
//! "reset to defaults" restores; the active defaults are user-editable.

use serde::{Deserialize, Serialize};
use vigil_common::{Metric, ResourceKind, ThresholdSet};

/// Default thresholds per resource kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    /// VMs and LXC containers
    pub guest: ThresholdSet,
    /// Cluster nodes. PBS servers reuse the CPU and memory entries.
    pub node: ThresholdSet,
    /// Storage resources carry a single usage threshold
    pub storage_usage: f64,
    pub docker_host: ThresholdSet,
    pub docker_container: ThresholdSet,
}

impl Default for Defaults {
    fn default() -> Self {
        Self::factory()
    }
}

impl Defaults {
    /// Hard-coded factory baseline
    pub fn factory() -> Self {
        Self {
            guest: [
                (Metric::Cpu, 80.0),
                (Metric::Memory, 85.0),
                (Metric::Disk, 90.0),
                // I/O metrics are off unless a user opts in
                (Metric::DiskRead, 0.0),
                (Metric::DiskWrite, 0.0),
                (Metric::NetworkIn, 0.0),
                (Metric::NetworkOut, 0.0),
            ]
            .into_iter()
            .collect(),
            node: [
                (Metric::Cpu, 80.0),
                (Metric::Memory, 85.0),
                (Metric::Disk, 90.0),
                (Metric::Temperature, 80.0),
            ]
            .into_iter()
            .collect(),
            storage_usage: 85.0,
            docker_host: [
                (Metric::Cpu, 80.0),
                (Metric::Memory, 85.0),
                (Metric::Disk, 90.0),
            ]
            .into_iter()
            .collect(),
            docker_container: [
                (Metric::Cpu, 80.0),
                (Metric::Memory, 85.0),
                (Metric::RestartCount, 3.0),
            ]
            .into_iter()
            .collect(),
        }
    }

    /// The threshold set that applies to a resource of the given kind when no
    /// override exists
    pub fn applicable(&self, kind: ResourceKind) -> ThresholdSet {
        match kind {
            ResourceKind::Guest => self.guest.clone(),
            ResourceKind::Node => self.node.clone(),
            ResourceKind::Pbs => [Metric::Cpu, Metric::Memory]
                .into_iter()
                .filter_map(|m| self.node.get(m).map(|v| (m, v)))
                .collect(),
            ResourceKind::Storage => [(Metric::Usage, self.storage_usage)].into_iter().collect(),
            ResourceKind::DockerHost => self.docker_host.clone(),
            ResourceKind::DockerContainer => self.docker_container.clone(),
        }
    }

    /// Default value for one metric; a missing default is 0, never an error
    pub fn value_for(&self, kind: ResourceKind, metric: Metric) -> f64 {
        self.applicable(kind).get(metric).unwrap_or(0.0)
    }

    /// Repair values that cannot have come from a valid edit (e.g. a config
    /// blob written by an older version with a zeroed storage threshold)
    pub fn sanitize(&mut self) {
        if self.storage_usage <= 0.0 {
            self.storage_usage = Self::factory().storage_usage;
        }
    }
}

/// The metric universe for a resource kind
pub fn metrics_for(kind: ResourceKind) -> &'static [Metric] {
    match kind {
        ResourceKind::Guest => &[
            Metric::Cpu,
            Metric::Memory,
            Metric::Disk,
            Metric::DiskRead,
            Metric::DiskWrite,
            Metric::NetworkIn,
            Metric::NetworkOut,
        ],
        ResourceKind::Node => &[
            Metric::Cpu,
            Metric::Memory,
            Metric::Disk,
            Metric::Temperature,
        ],
        ResourceKind::Pbs => &[Metric::Cpu, Metric::Memory],
        ResourceKind::Storage => &[Metric::Usage],
        ResourceKind::DockerHost => &[Metric::Cpu, Metric::Memory, Metric::Disk],
        ResourceKind::DockerContainer => &[Metric::Cpu, Metric::Memory, Metric::RestartCount],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pbs_reuses_node_cpu_memory() {
        let defaults = Defaults::factory();
        let pbs = defaults.applicable(ResourceKind::Pbs);
        assert_eq!(pbs.get(Metric::Cpu), defaults.node.get(Metric::Cpu));
        assert_eq!(pbs.get(Metric::Memory), defaults.node.get(Metric::Memory));
        assert_eq!(pbs.get(Metric::Disk), None);
    }

    #[test]
    fn test_storage_is_scalar_usage() {
        let defaults = Defaults::factory();
        let storage = defaults.applicable(ResourceKind::Storage);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(Metric::Usage), Some(85.0));
    }

    #[test]
    fn test_missing_default_resolves_to_zero() {
        let defaults = Defaults::factory();
        assert_eq!(defaults.value_for(ResourceKind::Storage, Metric::Cpu), 0.0);
        assert_eq!(defaults.value_for(ResourceKind::Pbs, Metric::Disk), 0.0);
    }

    #[test]
    fn test_sanitize_restores_zeroed_storage_default() {
        let mut defaults = Defaults::factory();
        defaults.storage_usage = 0.0;
        defaults.sanitize();
        assert_eq!(defaults.storage_usage, 85.0);
    }
}
