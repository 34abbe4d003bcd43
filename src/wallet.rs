//! Player balance and crash history
//!
//! The round never owns money: every command receives a `Wallet` and calls
//! out to it. `LocalWallet` is the default implementation, optionally backed
//! by the local cache.

use crate::consts::{DEFAULT_BALANCE, DEFAULT_HISTORY_CAPACITY, MAX_BALANCE};
use crate::error::CrashError;
use crate::persistence::LocalStore;

const BALANCE_KEY: &str = "balance";
const HISTORY_KEY: &str = "history";

/// Balance and history capability injected into round commands
pub trait Wallet {
    /// Spendable balance
    fn balance(&self) -> f64;

    /// Take `amount` out of the balance; fails without side effects when
    /// the balance cannot cover it
    fn debit(&mut self, amount: f64) -> Result<(), CrashError>;

    /// Add `amount` to the balance
    fn credit(&mut self, amount: f64);

    /// Remember a finished round's crash point
    fn append_history(&mut self, multiplier: f64);
}

/// In-process wallet with best-effort caching
#[derive(Debug, Clone)]
pub struct LocalWallet {
    balance: f64,
    /// Crash points, newest first
    history: Vec<f64>,
    history_capacity: usize,
    store: Option<LocalStore>,
}

impl LocalWallet {
    /// Uncached wallet (tests, simulations)
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            history: Vec::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            store: None,
        }
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self.history.truncate(capacity);
        self
    }

    /// Restore balance and history from the cache, falling back to defaults
    pub fn load(store: LocalStore, history_capacity: usize) -> Self {
        let balance = match store.get::<f64>(BALANCE_KEY) {
            Ok(Some(v)) if v.is_finite() => v.clamp(0.0, MAX_BALANCE),
            Ok(_) => DEFAULT_BALANCE,
            Err(e) => {
                log::warn!("Ignoring cached balance: {}", e);
                DEFAULT_BALANCE
            }
        };

        let mut history = match store.get::<Vec<f64>>(HISTORY_KEY) {
            Ok(Some(h)) => h.into_iter().filter(|x| x.is_finite() && *x >= 1.0).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Ignoring cached history: {}", e);
                Vec::new()
            }
        };
        history.truncate(history_capacity);

        log::info!("Wallet loaded: balance {:.2}, {} history entries", balance, history.len());
        Self {
            balance,
            history,
            history_capacity,
            store: Some(store),
        }
    }

    /// Crash points, newest first
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Restore the starting balance
    pub fn reset_balance(&mut self) {
        self.balance = DEFAULT_BALANCE;
        self.save_balance();
        log::info!("Balance reset to {:.2}", DEFAULT_BALANCE);
    }

    fn save_balance(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.set(BALANCE_KEY, &self.balance) {
                log::warn!("Balance not cached: {}", e);
            }
        }
    }

    fn save_history(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.set(HISTORY_KEY, &self.history) {
                log::warn!("History not cached: {}", e);
            }
        }
    }
}

impl Default for LocalWallet {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE)
    }
}

impl Wallet for LocalWallet {
    fn balance(&self) -> f64 {
        self.balance
    }

    fn debit(&mut self, amount: f64) -> Result<(), CrashError> {
        if amount > self.balance {
            return Err(CrashError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.save_balance();
        Ok(())
    }

    fn credit(&mut self, amount: f64) {
        self.balance += amount;
        self.save_balance();
    }

    fn append_history(&mut self, multiplier: f64) {
        self.history.insert(0, multiplier);
        self.history.truncate(self.history_capacity);
        self.save_history();
    }
}
