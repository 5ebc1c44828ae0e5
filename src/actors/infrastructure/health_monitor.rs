use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::actors::core::{ComponentHealth, HealthStatus};

// ============================================================================
// Health Monitor - Aggregates actor health
// ============================================================================
//
// Responsibilities:
// - Track health status of every supervised actor
// - Aggregate system-wide health for the coordinator's periodic check
//
// Cloning is cheap; all clones share the same component table.
//
// ============================================================================

pub struct UpdateHealth {
    pub component: String,
    pub status: HealthStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub overall_status: HealthStatus,
    pub components: HashMap<String, ComponentHealth>,
    pub check_time: chrono::DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct HealthMonitor {
    components: Arc<Mutex<HashMap<String, ComponentHealth>>>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn update(&self, msg: UpdateHealth) {
        let health = ComponentHealth {
            name: msg.component.clone(),
            status: msg.status.clone(),
            last_check: Utc::now(),
            details: msg.details,
        };

        tracing::debug!(
            component = %msg.component,
            status = ?msg.status,
            "Updated component health"
        );

        self.components.lock().await.insert(msg.component, health);
    }

    pub async fn system_health(&self) -> SystemHealth {
        let components = self.components.lock().await.clone();

        SystemHealth {
            overall_status: compute_overall_status(&components),
            components,
            check_time: Utc::now(),
        }
    }
}

fn compute_overall_status(components: &HashMap<String, ComponentHealth>) -> HealthStatus {
    let mut has_degraded = false;
    let mut unhealthy_components = Vec::new();

    for (name, health) in components {
        match &health.status {
            HealthStatus::Unhealthy(msg) => {
                unhealthy_components.push(format!("{}: {}", name, msg));
            }
            HealthStatus::Degraded(_) => {
                has_degraded = true;
            }
            HealthStatus::Healthy => {}
        }
    }

    if !unhealthy_components.is_empty() {
        unhealthy_components.sort();
        HealthStatus::Unhealthy(unhealthy_components.join(", "))
    } else if has_degraded {
        HealthStatus::Degraded("Some components degraded".to_string())
    } else {
        HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn set(monitor: &HealthMonitor, component: &str, status: HealthStatus) {
        monitor
            .update(UpdateHealth {
                component: component.to_string(),
                status,
                details: None,
            })
            .await;
    }

    #[tokio::test]
    async fn test_empty_monitor_is_healthy() {
        let monitor = HealthMonitor::new();
        let health = monitor.system_health().await;
        assert!(health.overall_status.is_healthy());
        assert!(health.components.is_empty());
    }

    #[tokio::test]
    async fn test_degraded_component_degrades_system() {
        let monitor = HealthMonitor::new();
        set(&monitor, "deposit", HealthStatus::Healthy).await;
        set(&monitor, "withdraw", HealthStatus::Degraded("waiting for funds".into())).await;

        let health = monitor.system_health().await;
        assert!(health.overall_status.is_degraded());
        assert_eq!(health.components.len(), 2);
    }

    #[tokio::test]
    async fn test_unhealthy_wins_and_lists_components() {
        let monitor = HealthMonitor::new();
        set(&monitor, "withdraw", HealthStatus::Degraded("waiting".into())).await;
        set(&monitor, "sampler", HealthStatus::Unhealthy("panicked".into())).await;
        set(&monitor, "deposit", HealthStatus::Unhealthy("overflow".into())).await;

        let health = monitor.system_health().await;
        assert_eq!(
            health.overall_status,
            HealthStatus::Unhealthy("deposit: overflow, sampler: panicked".to_string())
        );
    }

    #[tokio::test]
    async fn test_latest_update_replaces_previous() {
        let monitor = HealthMonitor::new();
        let clone = monitor.clone();
        set(&monitor, "withdraw", HealthStatus::Degraded("waiting".into())).await;
        set(&clone, "withdraw", HealthStatus::Healthy).await;

        let health = monitor.system_health().await;
        assert!(health.overall_status.is_healthy());
    }
}
