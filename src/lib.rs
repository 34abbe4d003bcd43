//! Jet Crash - A crash-style betting round simulation
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (phases, multiplier, positions)
//! - `ledger`: Settlement records
//! - `wallet`: Injected balance/history capability
//! - `persistence`: Best-effort local cache
//! - `config`: Data-driven round tuning
//! - `crowd`: Cosmetic other-player filler

pub mod config;
pub mod crowd;
pub mod error;
pub mod ledger;
pub mod persistence;
pub mod sim;
pub mod wallet;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::RoundConfig;
pub use error::{CrashError, StoreError};
pub use ledger::{Ledger, Outcome, Settlement};
pub use sim::{Round, RoundEvent, RoundPhase, SlotId, tick};
pub use wallet::{LocalWallet, Wallet};

/// Game configuration constants
pub mod consts {
    /// Multiplier growth per second (`m = e^(rate * t)`)
    pub const DEFAULT_GROWTH_RATE: f64 = 0.23;
    /// House edge of the default crash sampler
    pub const DEFAULT_HOUSE_EDGE: f64 = 0.01;

    /// Crash threshold bounds
    pub const MIN_CRASH: f64 = 1.01;
    pub const MAX_CRASH: f64 = 250.0;

    /// Auto cash-out bounds (targets above the max are clamped)
    pub const MIN_AUTO_TARGET: f64 = 1.01;
    pub const MAX_AUTO_TARGET: f64 = 999.0;

    /// Largest single stake
    pub const MAX_STAKE: f64 = 1e9;
    /// Starting balance and cache clamp
    pub const DEFAULT_BALANCE: f64 = 10_000.0;
    pub const MAX_BALANCE: f64 = 1e12;

    /// Crash points remembered for the history strip
    pub const DEFAULT_HISTORY_CAPACITY: usize = 20;
}
