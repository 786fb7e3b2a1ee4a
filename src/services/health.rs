//! Component health monitoring.
//!
//! Each component registers a cheap liveness probe. `check` converts
//! every probe failure into a `false` entry instead of propagating it;
//! the monitor itself never fails.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

type Probe = Box<dyn Fn() -> Result<()> + Send + Sync>;

/// Point-in-time component health, derived on demand.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub healthy: bool,
    pub components: BTreeMap<String, bool>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Default)]
pub struct HealthMonitor {
    probes: Vec<(String, Probe)>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Register a liveness probe under a component name.
    pub fn register<F>(&mut self, name: impl Into<String>, probe: F)
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.probes.push((name.into(), Box::new(probe)));
    }

    /// Probe every component. Overall health is the conjunction of all
    /// component states.
    pub fn check(&self) -> HealthSnapshot {
        let mut components = BTreeMap::new();

        for (name, probe) in &self.probes {
            let ok = match probe() {
                Ok(()) => true,
                Err(e) => {
                    warn!(component = %name, error = %e, "health probe failed");
                    false
                }
            };
            components.insert(name.clone(), ok);
        }

        HealthSnapshot {
            healthy: !components.is_empty() && components.values().all(|ok| *ok),
            components,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_all_probes_passing() {
        let mut monitor = HealthMonitor::new();
        monitor.register("store", || Ok(()));
        monitor.register("scorer", || Ok(()));

        let snapshot = monitor.check();
        assert!(snapshot.healthy);
        assert_eq!(snapshot.components["store"], true);
        assert_eq!(snapshot.components["scorer"], true);
    }

    #[test]
    fn test_failing_probe_marks_component_false() {
        let mut monitor = HealthMonitor::new();
        monitor.register("store", || {
            Err(EngineError::ExternalUnavailable("query failed".to_string()))
        });
        monitor.register("scorer", || Ok(()));

        // The failure is reported, never propagated.
        let snapshot = monitor.check();
        assert!(!snapshot.healthy);
        assert_eq!(snapshot.components["store"], false);
        assert_eq!(snapshot.components["scorer"], true);
    }

    #[test]
    fn test_empty_monitor_is_unhealthy() {
        let snapshot = HealthMonitor::new().check();
        assert!(!snapshot.healthy);
        assert!(snapshot.components.is_empty());
    }
}
