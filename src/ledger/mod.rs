//! External currency ledger ("bank") contract.
//!
//! The core never owns player money; it asks the ledger. An unreachable
//! ledger means "cannot complete this economic action", never a zero balance
//! when spending is on the line.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger unavailable")]
    Unavailable,
}

/// The host's currency ledger. Mutating calls are expected to be
/// idempotent-safe for the caller to retry.
pub trait Ledger: Send + Sync {
    fn balance(&self, user_id: u64) -> Result<i64, LedgerError>;
    fn deposit(&self, user_id: u64, amount: i64) -> Result<(), LedgerError>;
    fn withdraw(&self, user_id: u64, amount: i64) -> Result<(), LedgerError>;

    /// Applies a signed net change as one transaction. Zero is a no-op.
    fn apply_net(&self, user_id: u64, amount: i64) -> Result<(), LedgerError> {
        if amount > 0 {
            self.deposit(user_id, amount)
        } else if amount < 0 {
            self.withdraw(user_id, -amount)
        } else {
            Ok(())
        }
    }
}

impl<T: Ledger + ?Sized> Ledger for std::sync::Arc<T> {
    fn balance(&self, user_id: u64) -> Result<i64, LedgerError> {
        (**self).balance(user_id)
    }

    fn deposit(&self, user_id: u64, amount: i64) -> Result<(), LedgerError> {
        (**self).deposit(user_id, amount)
    }

    fn withdraw(&self, user_id: u64, amount: i64) -> Result<(), LedgerError> {
        (**self).withdraw(user_id, amount)
    }
}

/// In-memory ledger for tests and the demo binary. Accounts may run
/// negative; overdraft policy belongs to the real bank, not the simulation.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    balances: Mutex<BTreeMap<u64, i64>>,
    offline: AtomicBool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(user_id: u64, amount: i64) -> Self {
        let ledger = Self::default();
        ledger.balances.lock().unwrap().insert(user_id, amount);
        ledger
    }

    /// Simulates the collaborator going down; every call fails until restored.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), LedgerError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(LedgerError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl Ledger for MemoryLedger {
    fn balance(&self, user_id: u64) -> Result<i64, LedgerError> {
        self.check_online()?;
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .unwrap_or(0))
    }

    fn deposit(&self, user_id: u64, amount: i64) -> Result<(), LedgerError> {
        self.check_online()?;
        let mut balances = self.balances.lock().unwrap();
        *balances.entry(user_id).or_insert(0) += amount;
        Ok(())
    }

    fn withdraw(&self, user_id: u64, amount: i64) -> Result<(), LedgerError> {
        self.check_online()?;
        let mut balances = self.balances.lock().unwrap();
        *balances.entry(user_id).or_insert(0) -= amount;
        Ok(())
    }
}
