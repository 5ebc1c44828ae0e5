use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::account::{DEFAULT_INITIAL_BALANCE, DEFAULT_WITHDRAW_THRESHOLD};

// ============================================================================
// Simulation Configuration
// ============================================================================
//
// Everything that shapes a run: account parameters, actor cadences and
// amounts, sampler buffer, supervision limits.
//
// There is no config file; `Default` reproduces the reference cadence
// (deposit 5000 every 10s, withdraw 3000 every 3s) and `fast()` compresses
// it for tests and demos.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub account: AccountConfig,
    pub deposit: ActorConfig,
    pub withdraw: ActorConfig,
    pub sampler: SamplerConfig,
    pub supervision: SupervisionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub initial_balance: i64,
    /// Minimum balance before a withdrawal may proceed
    pub withdraw_threshold: i64,
}

/// Cadence and amount for a periodic deposit/withdraw actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorConfig {
    pub amount: i64,
    pub interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub interval: Duration,
    /// Number of recent balances kept in the history buffer
    pub history_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionConfig {
    /// Restarts allowed per actor before the fault is escalated
    pub max_restarts: u32,
    pub health_check_interval: Duration,
    /// How long shutdown waits for actors to finish before aborting them
    pub shutdown_grace: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            account: AccountConfig {
                initial_balance: DEFAULT_INITIAL_BALANCE,
                withdraw_threshold: DEFAULT_WITHDRAW_THRESHOLD,
            },
            deposit: ActorConfig {
                amount: 5_000,
                interval: Duration::from_millis(10_000),
            },
            withdraw: ActorConfig {
                amount: 3_000,
                interval: Duration::from_millis(3_000),
            },
            sampler: SamplerConfig {
                interval: Duration::from_millis(15),
                history_capacity: 500,
            },
            supervision: SupervisionConfig {
                max_restarts: 3,
                health_check_interval: Duration::from_secs(30),
                shutdown_grace: Duration::from_secs(5),
            },
        }
    }
}

impl SimulationConfig {
    /// Same amounts, intervals scaled down a thousandfold
    pub fn fast() -> Self {
        let default = Self::default();
        Self {
            deposit: ActorConfig {
                interval: Duration::from_millis(10),
                ..default.deposit
            },
            withdraw: ActorConfig {
                interval: Duration::from_millis(3),
                ..default.withdraw
            },
            sampler: SamplerConfig {
                interval: Duration::from_millis(1),
                history_capacity: 50,
            },
            supervision: SupervisionConfig {
                max_restarts: 3,
                health_check_interval: Duration::from_millis(50),
                shutdown_grace: Duration::from_secs(2),
            },
            ..default
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (actor, cfg) in [("deposit", &self.deposit), ("withdraw", &self.withdraw)] {
            if cfg.amount <= 0 {
                return Err(ConfigError::NonPositiveAmount {
                    actor,
                    amount: cfg.amount,
                });
            }
            if cfg.interval.is_zero() {
                return Err(ConfigError::ZeroInterval(actor));
            }
        }

        if self.sampler.interval.is_zero() {
            return Err(ConfigError::ZeroInterval("sampler"));
        }
        if self.sampler.history_capacity == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        if self.supervision.health_check_interval.is_zero() {
            return Err(ConfigError::ZeroInterval("health_check"));
        }

        Ok(())
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{actor} amount must be positive, got {amount}")]
    NonPositiveAmount { actor: &'static str, amount: i64 },

    #[error("{0} interval must be non-zero")]
    ZeroInterval(&'static str),

    #[error("History capacity must be at least 1")]
    EmptyHistory,
}
