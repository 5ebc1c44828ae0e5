use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::actors::infrastructure::{HealthMonitor, UpdateHealth};
use crate::domain::account::AccountError;
use crate::metrics::Metrics;

use super::health::HealthStatus;
use super::shutdown::ShutdownListener;
use super::supervised::ActorMetadata;

// ============================================================================
// Periodic Actor - Cancellable timer-driven loop
// ============================================================================
//
// Every actor in this system does the same thing at its core: sleep for a
// fixed interval, then perform one unit of work. `run_periodic` owns that
// loop so the actors only implement `tick`.
//
// Loop exits:
// - shutdown signalled while sleeping        -> Ok(())
// - tick returns `ActorError::Cancelled`     -> Ok(())
// - tick returns any other error             -> Err(..) for the supervisor
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    #[error("Account operation failed: {0}")]
    Account(#[from] AccountError),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Actor panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Fault(String),

    #[error("Actor cancelled")]
    Cancelled,
}

impl ActorError {
    /// Map account errors, treating a closed account as cancellation
    pub fn from_account(error: AccountError) -> Self {
        if error.is_shutdown() {
            ActorError::Cancelled
        } else {
            ActorError::Account(error)
        }
    }
}

/// Per-actor handles passed to every tick
#[derive(Clone)]
pub struct ActorContext {
    pub name: String,
    pub health: HealthMonitor,
    pub metrics: Arc<Metrics>,
}

impl ActorContext {
    pub fn new(name: impl Into<String>, health: HealthMonitor, metrics: Arc<Metrics>) -> Self {
        Self {
            name: name.into(),
            health,
            metrics,
        }
    }

    pub async fn report(&self, status: HealthStatus, details: Option<String>) {
        self.metrics.update_actor_health(&self.name, &status);
        self.health
            .update(UpdateHealth {
                component: self.name.clone(),
                status,
                details,
            })
            .await;
    }
}

#[async_trait]
pub trait PeriodicActor: Send {
    fn metadata(&self) -> ActorMetadata;

    /// Pause before each tick
    fn interval(&self) -> Duration;

    async fn tick(&mut self, ctx: &ActorContext) -> Result<(), ActorError>;
}

pub async fn run_periodic(
    mut actor: Box<dyn PeriodicActor>,
    ctx: ActorContext,
    mut shutdown: ShutdownListener,
) -> Result<(), ActorError> {
    let metadata = actor.metadata();
    let interval = actor.interval();

    tracing::info!(
        actor = %metadata.name,
        interval_ms = interval.as_millis() as u64,
        strategy = ?metadata.strategy,
        "▶️  {}",
        metadata.description
    );
    ctx.report(HealthStatus::Healthy, Some("started".to_string())).await;

    let result = loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break Ok(()),
            _ = tokio::time::sleep(interval) => {}
        }

        match actor.tick(&ctx).await {
            Ok(()) => {}
            Err(ActorError::Cancelled) => break Ok(()),
            Err(error) => break Err(error),
        }
    };

    match &result {
        Ok(()) => tracing::info!(actor = %metadata.name, "🛑 Actor stopped"),
        Err(error) => tracing::error!(actor = %metadata.name, error = %error, "❌ Actor failed"),
    }

    result
}
