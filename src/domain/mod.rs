// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// The shared account monitor: a single balance guarded by a lock, with a
// "sufficient funds" condition that withdrawals wait on.
//
// This layer knows nothing about actors, scheduling or metrics. Callers
// share it through an `Arc` and drive it from whatever threads they own.
//
// ============================================================================

pub mod account;
