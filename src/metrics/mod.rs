use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

use crate::actors::HealthStatus;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Account operations (deposits, withdrawals, time spent waiting for funds)
// - Account state (balance, blocked withdrawals) as seen by the sampler
// - Actor supervision (faults, restarts, health)
//
// The registry stays in-process; `render()` produces the text exposition
// format for logging.
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Account Metrics
    pub deposits_total: IntCounter,
    pub deposited_amount_total: IntCounter,
    pub withdrawals_total: IntCounter,
    pub withdrawn_amount_total: IntCounter,
    pub blocked_withdrawals_total: IntCounter,
    pub withdraw_wait_duration: Histogram,

    // Account State Gauges
    pub balance: IntGauge,
    pub waiting_withdrawals: IntGauge,

    // Actor Metrics
    pub actor_faults: IntCounterVec,
    pub actor_restarts: IntCounterVec,
    pub actor_health_status: IntGaugeVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Account Metrics
        let deposits_total = IntCounter::new("account_deposits_total", "Total deposits applied")?;
        registry.register(Box::new(deposits_total.clone()))?;

        let deposited_amount_total = IntCounter::new(
            "account_deposited_amount_total",
            "Sum of all deposited amounts",
        )?;
        registry.register(Box::new(deposited_amount_total.clone()))?;

        let withdrawals_total =
            IntCounter::new("account_withdrawals_total", "Total withdrawals applied")?;
        registry.register(Box::new(withdrawals_total.clone()))?;

        let withdrawn_amount_total = IntCounter::new(
            "account_withdrawn_amount_total",
            "Sum of all withdrawn amounts",
        )?;
        registry.register(Box::new(withdrawn_amount_total.clone()))?;

        let blocked_withdrawals_total = IntCounter::new(
            "account_blocked_withdrawals_total",
            "Withdrawals that had to wait for sufficient funds",
        )?;
        registry.register(Box::new(blocked_withdrawals_total.clone()))?;

        let withdraw_wait_duration = Histogram::with_opts(
            HistogramOpts::new(
                "account_withdraw_wait_seconds",
                "Time withdrawals spent waiting for sufficient funds",
            )
            .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0]),
        )?;
        registry.register(Box::new(withdraw_wait_duration.clone()))?;

        // Account State Gauges
        let balance = IntGauge::new("account_balance", "Most recently sampled balance")?;
        registry.register(Box::new(balance.clone()))?;

        let waiting_withdrawals = IntGauge::new(
            "account_waiting_withdrawals",
            "Withdrawals currently suspended on the funds condition",
        )?;
        registry.register(Box::new(waiting_withdrawals.clone()))?;

        // Actor Metrics
        let actor_faults = IntCounterVec::new(
            Opts::new("actor_faults_total", "Faults surfaced by supervised actors"),
            &["actor"],
        )?;
        registry.register(Box::new(actor_faults.clone()))?;

        let actor_restarts = IntCounterVec::new(
            Opts::new("actor_restarts_total", "Actor restarts performed by the coordinator"),
            &["actor"],
        )?;
        registry.register(Box::new(actor_restarts.clone()))?;

        let actor_health_status = IntGaugeVec::new(
            Opts::new(
                "actor_health_status",
                "Actor health status (0=Unhealthy, 1=Degraded, 2=Healthy)",
            ),
            &["actor"],
        )?;
        registry.register(Box::new(actor_health_status.clone()))?;

        Ok(Self {
            registry,
            deposits_total,
            deposited_amount_total,
            withdrawals_total,
            withdrawn_amount_total,
            blocked_withdrawals_total,
            withdraw_wait_duration,
            balance,
            waiting_withdrawals,
            actor_faults,
            actor_restarts,
            actor_health_status,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_deposit(&self, amount: i64) {
        self.deposits_total.inc();
        self.deposited_amount_total.inc_by(amount.unsigned_abs());
    }

    pub fn record_withdrawal(&self, amount: i64, waited_secs: f64, blocked: bool) {
        self.withdrawals_total.inc();
        self.withdrawn_amount_total.inc_by(amount.unsigned_abs());
        if blocked {
            self.blocked_withdrawals_total.inc();
        }
        self.withdraw_wait_duration.observe(waited_secs);
    }

    pub fn record_sample(&self, balance: i64, waiting_withdrawals: usize) {
        self.balance.set(balance);
        self.waiting_withdrawals.set(waiting_withdrawals as i64);
    }

    pub fn record_actor_fault(&self, actor: &str) {
        self.actor_faults.with_label_values(&[actor]).inc();
    }

    pub fn record_actor_restart(&self, actor: &str) {
        self.actor_restarts.with_label_values(&[actor]).inc();
    }

    pub fn update_actor_health(&self, actor: &str, status: &HealthStatus) {
        let value = match status {
            HealthStatus::Unhealthy(_) => 0,
            HealthStatus::Degraded(_) => 1,
            HealthStatus::Healthy => 2,
        };
        self.actor_health_status.with_label_values(&[actor]).set(value);
    }

    /// Encode every registered metric in the Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
