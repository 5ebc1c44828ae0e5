// ============================================================================
// Account Domain - Monitor-guarded balance
// ============================================================================
//
// This module contains ALL account-specific code:
// - Value objects (Withdrawal receipt, AccountSnapshot)
// - Errors (AccountError enum)
// - SharedAccount (lock + condition variable around the balance)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod shared_account;

// Re-export for convenience
pub use value_objects::*;
pub use errors::*;
pub use shared_account::*;
