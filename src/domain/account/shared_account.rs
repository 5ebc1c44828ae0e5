use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use super::errors::AccountError;
use super::value_objects::{
    AccountSnapshot, Withdrawal, DEFAULT_INITIAL_BALANCE, DEFAULT_WITHDRAW_THRESHOLD,
};

// ============================================================================
// Shared Account - Monitor around a single balance
// ============================================================================
//
// Protocol:
// - Every read and write of the balance happens under `state`
// - Deposits never block; once the balance reaches the threshold they
//   broadcast on `sufficient_funds`
// - Withdrawals run a guarded wait: while the balance is below the
//   threshold they suspend on `sufficient_funds` and re-check on every
//   wakeup, so spurious and early wakeups are harmless
// - A successful withdrawal broadcasts as well, letting every other waiter
//   re-check before the decrement is visible
// - `shutdown()` closes the account and wakes every waiter, which then
//   returns `AccountError::Closed` without touching the balance
//
// Withdrawal state machine:
//   Entering -> Waiting <-> (recheck) -> Withdrawing -> Done
//                  \-> Cancelled (on shutdown)
//
// ============================================================================

#[derive(Debug)]
struct AccountState {
    balance: i64,
    waiting: usize,
    closed: bool,
}

#[derive(Debug)]
pub struct SharedAccount {
    state: Mutex<AccountState>,
    sufficient_funds: Condvar,
    threshold: i64,
}

impl Default for SharedAccount {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedAccount {
    pub fn new() -> Self {
        Self::with_balance(DEFAULT_INITIAL_BALANCE, DEFAULT_WITHDRAW_THRESHOLD)
    }

    pub fn with_balance(balance: i64, threshold: i64) -> Self {
        Self {
            state: Mutex::new(AccountState {
                balance,
                waiting: 0,
                closed: false,
            }),
            sufficient_funds: Condvar::new(),
            threshold,
        }
    }

    // Every critical section leaves the state consistent, so a panic while
    // holding the lock cannot corrupt it.
    fn lock(&self) -> MutexGuard<'_, AccountState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `amount` to the balance. Never blocks beyond lock contention.
    ///
    /// Returns the balance after the deposit.
    pub fn deposit(&self, amount: i64) -> Result<i64, AccountError> {
        ensure_positive(amount)?;

        let mut state = self.lock();
        if state.closed {
            return Err(AccountError::Closed);
        }

        let balance = state
            .balance
            .checked_add(amount)
            .ok_or(AccountError::Overflow {
                balance: state.balance,
                amount,
            })?;
        state.balance = balance;

        tracing::debug!(amount, balance, "💰 Deposit applied");

        if balance >= self.threshold {
            self.sufficient_funds.notify_all();
        }

        Ok(balance)
    }

    /// Subtract `amount` once the balance has reached the threshold.
    ///
    /// Blocks the calling thread while funds are insufficient. There is no
    /// timeout: the only way out of the wait, besides a deposit, is
    /// [`SharedAccount::shutdown`].
    pub fn withdraw(&self, amount: i64) -> Result<Withdrawal, AccountError> {
        ensure_positive(amount)?;

        let mut state = self.lock();
        let mut wait_rounds = 0u32;
        let mut waiting_since: Option<Instant> = None;

        while state.balance < self.threshold && !state.closed {
            if waiting_since.is_none() {
                tracing::debug!(
                    amount,
                    balance = state.balance,
                    threshold = self.threshold,
                    "⏳ Withdrawal waiting for sufficient funds"
                );
                waiting_since = Some(Instant::now());
            }

            state.waiting += 1;
            state = self
                .sufficient_funds
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
            state.waiting -= 1;
            wait_rounds += 1;
        }

        if state.closed {
            tracing::debug!(amount, wait_rounds, "Withdrawal cancelled by shutdown");
            return Err(AccountError::Closed);
        }

        let balance = state
            .balance
            .checked_sub(amount)
            .ok_or(AccountError::Overflow {
                balance: state.balance,
                amount,
            })?;

        self.sufficient_funds.notify_all();
        state.balance = balance;

        tracing::debug!(amount, balance, wait_rounds, "🏧 Withdrawal applied");

        Ok(Withdrawal {
            balance,
            waited: waiting_since.map(|t| t.elapsed()).unwrap_or_default(),
            wait_rounds,
        })
    }

    pub fn current_value(&self) -> i64 {
        self.lock().balance
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        let state = self.lock();
        AccountSnapshot {
            balance: state.balance,
            waiting_withdrawals: state.waiting,
            closed: state.closed,
        }
    }

    /// Number of withdrawals currently suspended on the funds condition
    pub fn waiting_withdrawals(&self) -> usize {
        self.lock().waiting
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Close the account and abort every in-flight wait. Idempotent.
    ///
    /// Reads keep working afterwards; deposits and withdrawals fail with
    /// `AccountError::Closed`.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.closed = true;

        tracing::info!(
            balance = state.balance,
            waiting = state.waiting,
            "🛑 Account shut down"
        );

        self.sufficient_funds.notify_all();
    }
}

fn ensure_positive(amount: i64) -> Result<(), AccountError> {
    if amount <= 0 {
        return Err(AccountError::InvalidAmount(amount));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
