use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::actors::core::{
    ActorContext, ActorError, ActorMetadata, HealthStatus, PeriodicActor, SupervisionStrategy,
};
use crate::config::ActorConfig;
use crate::domain::account::SharedAccount;

// ============================================================================
// Withdraw Actor - Periodic consumer
// ============================================================================
//
// Every `interval`, withdraws a fixed `amount`. The withdrawal blocks inside
// the account until the balance reaches the threshold, so it runs on a
// blocking thread rather than a runtime worker. Waiting is expected
// backpressure: the actor reports itself Degraded, not failed.
//
// A closed account wakes the blocked call with `AccountError::Closed`,
// which ends the loop cleanly.
//
// ============================================================================

pub struct WithdrawActor {
    name: String,
    account: Arc<SharedAccount>,
    amount: i64,
    interval: Duration,
    degraded: bool,
}

impl WithdrawActor {
    pub fn new(name: impl Into<String>, account: Arc<SharedAccount>, config: &ActorConfig) -> Self {
        Self {
            name: name.into(),
            account,
            amount: config.amount,
            interval: config.interval,
            degraded: false,
        }
    }
}

#[async_trait]
impl PeriodicActor for WithdrawActor {
    fn metadata(&self) -> ActorMetadata {
        ActorMetadata::new(
            self.name.clone(),
            format!("Withdrawing {} every {:?}", self.amount, self.interval),
            SupervisionStrategy::Escalate,
        )
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn tick(&mut self, ctx: &ActorContext) -> Result<(), ActorError> {
        let balance = self.account.current_value();
        if balance < self.account.threshold() && !self.degraded {
            self.degraded = true;
            ctx.report(
                HealthStatus::Degraded("waiting for sufficient funds".to_string()),
                Some(format!("balance {} below threshold {}", balance, self.account.threshold())),
            )
            .await;
        }

        let account = self.account.clone();
        let amount = self.amount;
        let receipt = tokio::task::spawn_blocking(move || account.withdraw(amount))
            .await?
            .map_err(ActorError::from_account)?;

        ctx.metrics
            .record_withdrawal(amount, receipt.waited.as_secs_f64(), receipt.was_blocked());

        if self.degraded {
            self.degraded = false;
            ctx.report(HealthStatus::Healthy, Some("funds available".to_string()))
                .await;
        }

        tracing::info!(
            actor = %self.name,
            amount,
            balance = receipt.balance,
            waited_ms = receipt.waited.as_millis() as u64,
            wait_rounds = receipt.wait_rounds,
            "🏧 Withdrawal completed"
        );

        Ok(())
    }
}
