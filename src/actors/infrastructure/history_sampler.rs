use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::actors::core::{ActorContext, ActorError, ActorMetadata, PeriodicActor, SupervisionStrategy};
use crate::config::SamplerConfig;
use crate::domain::account::SharedAccount;

// ============================================================================
// History Sampler - Headless balance history
// ============================================================================
//
// Periodically reads the account through its snapshot accessor and keeps
// the most recent balances in a fixed-size window. Never takes part in the
// deposit/withdraw protocol.
//
// The window starts full of the initial balance so it always holds exactly
// `capacity` points.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct BalanceHistory {
    values: VecDeque<i64>,
    capacity: usize,
}

impl BalanceHistory {
    pub fn new(capacity: usize, initial: i64) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: std::iter::repeat(initial).take(capacity).collect(),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest one
    pub fn push(&mut self, value: i64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn latest(&self) -> Option<i64> {
        self.values.back().copied()
    }

    pub fn min(&self) -> Option<i64> {
        self.values.iter().copied().min()
    }

    pub fn max(&self) -> Option<i64> {
        self.values.iter().copied().max()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }
}

/// Shared handle to the history; survives sampler restarts
#[derive(Debug, Clone)]
pub struct HistoryHandle {
    inner: Arc<RwLock<BalanceHistory>>,
}

impl HistoryHandle {
    pub fn new(capacity: usize, initial: i64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(BalanceHistory::new(capacity, initial))),
        }
    }

    pub fn push(&self, value: i64) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }

    pub fn snapshot(&self) -> BalanceHistory {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub struct HistorySampler {
    name: String,
    account: Arc<SharedAccount>,
    history: HistoryHandle,
    interval: Duration,
}

impl HistorySampler {
    pub fn new(
        name: impl Into<String>,
        account: Arc<SharedAccount>,
        history: HistoryHandle,
        config: &SamplerConfig,
    ) -> Self {
        Self {
            name: name.into(),
            account,
            history,
            interval: config.interval,
        }
    }
}

#[async_trait]
impl PeriodicActor for HistorySampler {
    fn metadata(&self) -> ActorMetadata {
        ActorMetadata::new(
            self.name.clone(),
            format!("Sampling balance every {:?}", self.interval),
            SupervisionStrategy::Restart,
        )
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn tick(&mut self, ctx: &ActorContext) -> Result<(), ActorError> {
        let snapshot = self.account.snapshot();

        self.history.push(snapshot.balance);
        ctx.metrics
            .record_sample(snapshot.balance, snapshot.waiting_withdrawals);

        tracing::trace!(
            actor = %self.name,
            balance = snapshot.balance,
            waiting = snapshot.waiting_withdrawals,
            "Sampled balance"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::infrastructure::HealthMonitor;
    use crate::metrics::Metrics;

    #[test]
    fn test_history_starts_full_of_initial_value() {
        let history = BalanceHistory::new(4, 10_000);
        assert_eq!(history.len(), 4);
        assert_eq!(history.to_vec(), vec![10_000; 4]);
        assert_eq!(history.latest(), Some(10_000));
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = BalanceHistory::new(3, 10_000);
        history.push(7_000);
        history.push(4_000);
        history.push(1_000);
        history.push(6_000);

        assert_eq!(history.to_vec(), vec![4_000, 1_000, 6_000]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.min(), Some(1_000));
        assert_eq!(history.max(), Some(6_000));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut history = BalanceHistory::new(0, 5);
        history.push(6);
        assert_eq!(history.to_vec(), vec![6]);
    }

    #[tokio::test]
    async fn test_tick_records_snapshot() {
        let account = Arc::new(SharedAccount::new());
        let history = HistoryHandle::new(3, account.current_value());
        let metrics = Arc::new(Metrics::new().unwrap());
        let ctx = ActorContext::new("sampler", HealthMonitor::new(), metrics.clone());

        let config = SamplerConfig {
            interval: Duration::from_millis(1),
            history_capacity: 3,
        };
        let mut sampler = HistorySampler::new("sampler", account.clone(), history.clone(), &config);

        account.withdraw(3_000).unwrap();
        sampler.tick(&ctx).await.unwrap();
        account.deposit(5_000).unwrap();
        sampler.tick(&ctx).await.unwrap();

        assert_eq!(history.snapshot().to_vec(), vec![10_000, 7_000, 12_000]);
        assert_eq!(metrics.balance.get(), 12_000);
        assert_eq!(metrics.waiting_withdrawals.get(), 0);
    }
}
