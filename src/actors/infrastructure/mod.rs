// ============================================================================
// Infrastructure Actors
// ============================================================================
//
// Concrete actors and their supervisor:
// - Deposit actor (periodic producer)
// - Withdraw actor (periodic consumer, blocks on insufficient funds)
// - History sampler (headless balance history)
// - Health monitoring
// - Coordination and supervision
//
// ============================================================================

// Private module declarations
mod coordinator;
mod deposit_actor;
mod health_monitor;
mod history_sampler;
mod withdraw_actor;

// Re-export for public API
pub use coordinator::{Coordinator, CoordinatorReport, DEPOSIT_ACTOR, SAMPLER_ACTOR, WITHDRAW_ACTOR};
pub use deposit_actor::DepositActor;
pub use health_monitor::{HealthMonitor, SystemHealth, UpdateHealth};
pub use history_sampler::{BalanceHistory, HistoryHandle, HistorySampler};
pub use withdraw_actor::WithdrawActor;
