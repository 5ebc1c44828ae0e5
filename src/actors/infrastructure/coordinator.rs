use futures_util::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

use crate::actors::core::{
    run_periodic, ActorContext, ActorError, ActorMetadata, HealthStatus, PeriodicActor, Shutdown,
    SupervisionStrategy,
};
use crate::config::SimulationConfig;
use crate::domain::account::SharedAccount;
use crate::metrics::Metrics;

use super::{BalanceHistory, DepositActor, HealthMonitor, HistoryHandle, HistorySampler, WithdrawActor};

// ============================================================================
// Coordinator - Orchestrates all system actors
// ============================================================================
//
// Responsibilities:
// - Owns the shared account and hands it to each actor explicitly
// - Spawns actors and applies their supervision strategy on faults
// - Logs system health periodically
// - Coordinates graceful shutdown: stops the timers, closes the account to
//   release blocked withdrawals, then drains the actor tasks
//
// Actor Hierarchy:
//   Coordinator (Supervisor)
//   ├── DepositActor   (escalate)
//   ├── WithdrawActor  (escalate)
//   └── HistorySampler (restart)
//
// ============================================================================

pub const DEPOSIT_ACTOR: &str = "deposit";
pub const WITHDRAW_ACTOR: &str = "withdraw";
pub const SAMPLER_ACTOR: &str = "sampler";

type ActorFactory = Arc<dyn Fn() -> Box<dyn PeriodicActor> + Send + Sync>;
type ActorExit = (String, Result<(), ActorError>);

struct SupervisedEntry {
    metadata: ActorMetadata,
    factory: ActorFactory,
    restarts: u32,
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct CoordinatorReport {
    pub final_balance: i64,
    pub deposits: u64,
    pub withdrawals: u64,
    pub restarts: u32,
    pub history: BalanceHistory,
}

pub struct Coordinator {
    config: SimulationConfig,
    account: Arc<SharedAccount>,
    history: HistoryHandle,
    metrics: Arc<Metrics>,
    health: HealthMonitor,
    shutdown: Shutdown,
    actors: HashMap<String, SupervisedEntry>,
    tasks: JoinSet<ActorExit>,
}

impl Coordinator {
    pub fn new(config: SimulationConfig, metrics: Arc<Metrics>) -> anyhow::Result<Self> {
        config.validate()?;

        let account = Arc::new(SharedAccount::with_balance(
            config.account.initial_balance,
            config.account.withdraw_threshold,
        ));
        let history = HistoryHandle::new(
            config.sampler.history_capacity,
            config.account.initial_balance,
        );

        Ok(Self {
            config,
            account,
            history,
            metrics,
            health: HealthMonitor::new(),
            shutdown: Shutdown::new(),
            actors: HashMap::new(),
            tasks: JoinSet::new(),
        })
    }

    pub fn account(&self) -> Arc<SharedAccount> {
        self.account.clone()
    }

    pub fn history(&self) -> HistoryHandle {
        self.history.clone()
    }

    pub fn health(&self) -> HealthMonitor {
        self.health.clone()
    }

    /// Spawn the deposit actor, the withdraw actor and the history sampler
    pub fn start(&mut self) {
        tracing::info!("Starting supervised actors");

        let account = self.account.clone();
        let deposit = self.config.deposit.clone();
        self.supervise(move || DepositActor::new(DEPOSIT_ACTOR, account.clone(), &deposit));

        let account = self.account.clone();
        let withdraw = self.config.withdraw.clone();
        self.supervise(move || WithdrawActor::new(WITHDRAW_ACTOR, account.clone(), &withdraw));

        let account = self.account.clone();
        let history = self.history.clone();
        let sampler = self.config.sampler.clone();
        self.supervise(move || {
            HistorySampler::new(SAMPLER_ACTOR, account.clone(), history.clone(), &sampler)
        });

        tracing::info!("✅ All supervised actors started successfully");
    }

    /// Spawn an actor under supervision. `factory` is called again on restart.
    pub fn supervise<F, A>(&mut self, factory: F)
    where
        F: Fn() -> A + Send + Sync + 'static,
        A: PeriodicActor + 'static,
    {
        let factory: ActorFactory = Arc::new(move || Box::new(factory()) as Box<dyn PeriodicActor>);
        let actor = factory();
        let metadata = actor.metadata();

        self.spawn(actor);
        self.actors.insert(
            metadata.name.clone(),
            SupervisedEntry {
                metadata,
                factory,
                restarts: 0,
            },
        );
    }

    fn spawn(&mut self, actor: Box<dyn PeriodicActor>) {
        let name = actor.metadata().name;
        let ctx = ActorContext::new(name.clone(), self.health.clone(), self.metrics.clone());
        let listener = self.shutdown.listener();

        self.tasks.spawn(async move {
            let result = AssertUnwindSafe(run_periodic(actor, ctx, listener))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(ActorError::Panicked(panic_message(panic.as_ref()))));
            (name, result)
        });
    }

    /// Supervise until `signal` resolves or a fault is escalated, then shut
    /// down gracefully. An escalated fault is returned after shutdown.
    pub async fn run_until<F>(mut self, signal: F) -> anyhow::Result<CoordinatorReport>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(signal);

        let mut health_check = tokio::time::interval(self.config.supervision.health_check_interval);
        health_check.tick().await;

        let outcome = loop {
            tokio::select! {
                _ = &mut signal => {
                    tracing::info!("Received shutdown signal");
                    break Ok(());
                }
                Some(joined) = self.tasks.join_next() => {
                    if let Err(error) = self.handle_exit(joined).await {
                        break Err(error);
                    }
                }
                _ = health_check.tick() => self.log_system_health().await,
            }
        };

        self.shutdown_gracefully().await;
        outcome?;

        Ok(self.report())
    }

    async fn handle_exit(&mut self, joined: Result<ActorExit, JoinError>) -> anyhow::Result<()> {
        let (name, result) = joined.map_err(|e| anyhow::anyhow!("Supervised task failed: {}", e))?;

        let error = match result {
            Ok(()) => {
                tracing::info!(actor = %name, "Actor finished");
                return Ok(());
            }
            Err(error) => error,
        };

        self.metrics.record_actor_fault(&name);
        let status = HealthStatus::Unhealthy(error.to_string());
        self.metrics.update_actor_health(&name, &status);
        self.health
            .update(super::UpdateHealth {
                component: name.clone(),
                status,
                details: None,
            })
            .await;

        let max_restarts = self.config.supervision.max_restarts;
        let Some(entry) = self.actors.get_mut(&name) else {
            anyhow::bail!("Unknown actor '{}' failed: {}", name, error);
        };

        let strategy = entry.metadata.strategy;
        match strategy {
            SupervisionStrategy::Restart if entry.restarts < max_restarts => {
                entry.restarts += 1;
                tracing::warn!(
                    actor = %name,
                    error = %error,
                    restart = entry.restarts,
                    max_restarts,
                    "🔄 Restarting failed actor"
                );
                let actor = (entry.factory)();
                self.metrics.record_actor_restart(&name);
                self.spawn(actor);
                Ok(())
            }
            SupervisionStrategy::Restart => Err(anyhow::Error::new(error).context(format!(
                "Actor '{}' failed after {} restarts",
                name, max_restarts
            ))),
            SupervisionStrategy::Stop => {
                tracing::error!(actor = %name, error = %error, "Actor stopped after failure");
                Ok(())
            }
            SupervisionStrategy::Escalate => {
                tracing::error!(actor = %name, error = %error, "Escalating actor failure");
                Err(anyhow::Error::new(error).context(format!("Actor '{}' failed", name)))
            }
        }
    }

    async fn log_system_health(&self) {
        let health = self.health.system_health().await;
        match health.overall_status {
            HealthStatus::Healthy => {
                tracing::debug!(balance = self.account.current_value(), "System health check: Healthy");
            }
            HealthStatus::Degraded(ref msg) => {
                tracing::warn!(balance = self.account.current_value(), "System health check: Degraded - {}", msg);
            }
            HealthStatus::Unhealthy(ref msg) => {
                tracing::error!("System health check: Unhealthy - {}", msg);
            }
        }
    }

    async fn shutdown_gracefully(&mut self) {
        tracing::info!("🛑 Coordinator stopping - initiating graceful shutdown");

        self.shutdown.trigger();
        self.account.shutdown();

        let grace = self.config.supervision.shutdown_grace;
        let tasks = &mut self.tasks;
        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((name, Ok(()))) => tracing::debug!(actor = %name, "Actor drained"),
                    Ok((name, Err(error))) => {
                        tracing::warn!(actor = %name, error = %error, "Actor failed during shutdown")
                    }
                    Err(error) => tracing::warn!(error = %error, "Actor task failed during shutdown"),
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "Actors still running after grace period, aborting");
            self.tasks.shutdown().await;
        }

        tracing::info!("🛑 Coordinator stopped");
    }

    fn report(&self) -> CoordinatorReport {
        CoordinatorReport {
            final_balance: self.account.current_value(),
            deposits: self.metrics.deposits_total.get(),
            withdrawals: self.metrics.withdrawals_total.get(),
            restarts: self.actors.values().map(|entry| entry.restarts).sum(),
            history: self.history.snapshot(),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct FaultyActor {
        name: &'static str,
        strategy: SupervisionStrategy,
        panic: bool,
    }

    #[async_trait]
    impl PeriodicActor for FaultyActor {
        fn metadata(&self) -> ActorMetadata {
            ActorMetadata::new(self.name, "Fails on every tick", self.strategy)
        }

        fn interval(&self) -> Duration {
            Duration::from_millis(1)
        }

        async fn tick(&mut self, _ctx: &ActorContext) -> Result<(), ActorError> {
            if self.panic {
                panic!("boom");
            }
            Err(ActorError::Fault("injected fault".to_string()))
        }
    }

    fn coordinator() -> Coordinator {
        Coordinator::new(SimulationConfig::fast(), Arc::new(Metrics::new().unwrap())).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = SimulationConfig::default();
        config.deposit.amount = -1;
        assert!(Coordinator::new(config, Arc::new(Metrics::new().unwrap())).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_balances_deposits_and_withdrawals() {
        let mut coordinator = coordinator();
        let account = coordinator.account();
        coordinator.start();

        let report = coordinator
            .run_until(tokio::time::sleep(Duration::from_millis(300)))
            .await
            .unwrap();

        assert!(report.deposits > 0);
        assert!(report.withdrawals > 0);
        assert!(report.final_balance >= 0);
        assert_eq!(
            report.final_balance,
            10_000 + report.deposits as i64 * 5_000 - report.withdrawals as i64 * 3_000
        );
        assert_eq!(report.final_balance, account.current_value());
        assert_eq!(report.history.len(), 50);
        assert!(report.history.to_vec().iter().all(|balance| *balance >= 0));
        assert!(account.is_closed());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shutdown_releases_blocked_withdrawal() {
        let mut config = SimulationConfig::fast();
        config.account.initial_balance = 0;
        config.deposit.interval = Duration::from_secs(60);

        let mut coordinator = Coordinator::new(config, Arc::new(Metrics::new().unwrap())).unwrap();
        let account = coordinator.account();
        coordinator.start();

        let report = tokio::time::timeout(
            Duration::from_secs(2),
            coordinator.run_until(async {
                while account.waiting_withdrawals() == 0 {
                    tokio::time::sleep(Duration::from_millis(1)).await;
                }
            }),
        )
        .await
        .expect("shutdown hung on a blocked withdrawal")
        .unwrap();

        assert_eq!(report.final_balance, 0);
        assert_eq!(report.withdrawals, 0);
        assert_eq!(account.waiting_withdrawals(), 0);
    }

    #[tokio::test]
    async fn test_escalated_fault_is_returned() {
        let mut coordinator = coordinator();
        coordinator.supervise(|| FaultyActor {
            name: "faulty",
            strategy: SupervisionStrategy::Escalate,
            panic: false,
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            coordinator.run_until(std::future::pending()),
        )
        .await
        .expect("escalation did not stop the coordinator");

        let error = result.unwrap_err();
        assert!(format!("{:#}", error).contains("faulty"));
        assert!(format!("{:#}", error).contains("injected fault"));
    }

    #[tokio::test]
    async fn test_restart_until_limit_then_escalate() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let mut coordinator = Coordinator::new(SimulationConfig::fast(), metrics.clone()).unwrap();
        let created = Arc::new(AtomicU32::new(0));

        let counter = created.clone();
        coordinator.supervise(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            FaultyActor {
                name: "flaky",
                strategy: SupervisionStrategy::Restart,
                panic: false,
            }
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            coordinator.run_until(std::future::pending()),
        )
        .await
        .unwrap();

        assert!(format!("{:#}", result.unwrap_err()).contains("after 3 restarts"));
        assert_eq!(created.load(Ordering::SeqCst), 4);
        assert_eq!(metrics.actor_restarts.with_label_values(&["flaky"]).get(), 3);
        assert_eq!(metrics.actor_faults.with_label_values(&["flaky"]).get(), 4);
    }

    #[tokio::test]
    async fn test_stopped_actor_does_not_end_run() {
        let mut coordinator = coordinator();
        let health = coordinator.health();
        coordinator.supervise(|| FaultyActor {
            name: "stoppable",
            strategy: SupervisionStrategy::Stop,
            panic: true,
        });

        let report = coordinator
            .run_until(tokio::time::sleep(Duration::from_millis(100)))
            .await
            .unwrap();
        assert_eq!(report.restarts, 0);

        let system = health.system_health().await;
        assert_eq!(
            system.components["stoppable"].status,
            HealthStatus::Unhealthy("Actor panicked: boom".to_string())
        );
        assert!(system.overall_status.is_unhealthy());
    }

    #[test]
    fn test_panic_message_extraction() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");

        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }
}
