use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::actors::core::{ActorContext, ActorError, ActorMetadata, PeriodicActor, SupervisionStrategy};
use crate::config::ActorConfig;
use crate::domain::account::SharedAccount;

// ============================================================================
// Deposit Actor - Periodic producer
// ============================================================================
//
// Every `interval`, deposits a fixed `amount`. Deposits never block, so each
// tick is a short critical section on the account; it may release a
// withdrawal that is waiting for funds.
//
// ============================================================================

pub struct DepositActor {
    name: String,
    account: Arc<SharedAccount>,
    amount: i64,
    interval: Duration,
}

impl DepositActor {
    pub fn new(name: impl Into<String>, account: Arc<SharedAccount>, config: &ActorConfig) -> Self {
        Self {
            name: name.into(),
            account,
            amount: config.amount,
            interval: config.interval,
        }
    }
}

#[async_trait]
impl PeriodicActor for DepositActor {
    fn metadata(&self) -> ActorMetadata {
        ActorMetadata::new(
            self.name.clone(),
            format!("Depositing {} every {:?}", self.amount, self.interval),
            SupervisionStrategy::Escalate,
        )
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn tick(&mut self, ctx: &ActorContext) -> Result<(), ActorError> {
        let balance = self
            .account
            .deposit(self.amount)
            .map_err(ActorError::from_account)?;

        ctx.metrics.record_deposit(self.amount);

        tracing::info!(
            actor = %self.name,
            amount = self.amount,
            balance,
            "💰 Deposit completed"
        );

        Ok(())
    }
}
