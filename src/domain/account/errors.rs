// ============================================================================
// Account Rule Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Deposit of {amount} would overflow balance {balance}")]
    Overflow { balance: i64, amount: i64 },

    #[error("Account is shut down")]
    Closed,
}

impl AccountError {
    /// Shutdown is a cooperative signal, not a fault
    pub fn is_shutdown(&self) -> bool {
        matches!(self, AccountError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_closed_counts_as_shutdown() {
        assert!(AccountError::Closed.is_shutdown());
        assert!(!AccountError::InvalidAmount(0).is_shutdown());
        assert!(!AccountError::Overflow { balance: i64::MAX, amount: 1 }.is_shutdown());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AccountError::InvalidAmount(-5).to_string(),
            "Amount must be positive, got -5"
        );
        assert_eq!(AccountError::Closed.to_string(), "Account is shut down");
    }
}
