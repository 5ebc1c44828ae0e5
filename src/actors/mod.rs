// ============================================================================
// Actors Module
// ============================================================================
//
// Independently scheduled units that drive the shared account.
//
// Structure:
// - core/           - Abstract traits and types (PeriodicActor, health,
//                     supervision metadata, shutdown signal)
// - infrastructure/ - Concrete actors (deposit, withdraw, sampler) and the
//                     Coordinator that supervises them
//
// Note: The balance protocol itself lives in `domain::account`. Actors only
//       pace calls into it.
//
// ============================================================================

// Private module declarations
mod core;
mod infrastructure;

// Re-export the public API
pub use self::core::{
    run_periodic, ActorContext, ActorError, ActorMetadata, ComponentHealth, HealthStatus,
    PeriodicActor, Shutdown, ShutdownListener, SupervisionStrategy,
};
pub use self::infrastructure::{
    BalanceHistory, Coordinator, CoordinatorReport, DepositActor, HealthMonitor, HistoryHandle,
    HistorySampler, SystemHealth, UpdateHealth, WithdrawActor, DEPOSIT_ACTOR, SAMPLER_ACTOR,
    WITHDRAW_ACTOR,
};
