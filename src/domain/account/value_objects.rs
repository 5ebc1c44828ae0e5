use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Account Value Objects
// ============================================================================

/// Balance a fresh account starts with
pub const DEFAULT_INITIAL_BALANCE: i64 = 10_000;

/// Minimum balance required before a withdrawal may proceed
pub const DEFAULT_WITHDRAW_THRESHOLD: i64 = 3_000;

/// Receipt for a completed withdrawal
#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    /// Balance right after the withdrawal was applied
    pub balance: i64,
    /// Time spent suspended on the "sufficient funds" condition
    pub waited: Duration,
    /// Number of times the guard was re-evaluated after a wakeup
    pub wait_rounds: u32,
}

impl Withdrawal {
    pub fn was_blocked(&self) -> bool {
        self.wait_rounds > 0
    }
}

/// Consistent view of the account taken under a single lock acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: i64,
    pub waiting_withdrawals: usize,
    pub closed: bool,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdrawal_blocked_flag() {
        let immediate = Withdrawal {
            balance: 7_000,
            waited: Duration::ZERO,
            wait_rounds: 0,
        };
        assert!(!immediate.was_blocked());

        let blocked = Withdrawal {
            balance: 3_000,
            waited: Duration::from_millis(60),
            wait_rounds: 2,
        };
        assert!(blocked.was_blocked());
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = AccountSnapshot {
            balance: 4_000,
            waiting_withdrawals: 1,
            closed: false,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let deserialized: AccountSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, deserialized);
    }
}
