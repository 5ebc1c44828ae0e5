// ============================================================================
// account_monitor
// ============================================================================
//
// A shared account guarded by a monitor (mutex + condition variable), driven
// by independently scheduled deposit and withdraw actors under supervision.
//
// Layers:
// - domain/  - SharedAccount and its guarded-wait withdrawal protocol
// - actors/  - periodic actors, health, supervision, coordinator
// - config   - simulation parameters
// - metrics  - Prometheus registry
//
// ============================================================================

pub mod actors;
pub mod config;
pub mod domain;
pub mod metrics;
