//! Error types for round commands and the local cache
//!
//! Every `CrashError` is returned to the caller of a command and leaves the
//! round untouched. `StoreError` stays inside `persistence`: cache failures
//! are logged and dropped.

use thiserror::Error;

use crate::sim::SlotId;

/// Rejected command or invalid round configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrashError {
    /// Stake is non-finite or outside the configured bounds
    #[error("Invalid stake amount: {0}")]
    InvalidAmount(f64),

    /// Balance cannot cover the stake
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    /// Bets are only accepted while the round is waiting
    #[error("Round is not accepting bets")]
    RoundNotAcceptingBets,

    /// Cash-out requested on a position that is not in flight
    #[error("Position {0} is not active")]
    NotActive(SlotId),

    /// Cancel requested on a position that is not queued
    #[error("Position {0} has nothing to cancel")]
    NothingToCancel(SlotId),

    /// Stake can only change while the position is idle
    #[error("Position {0} stake is locked until it returns to idle")]
    StakeLocked(SlotId),

    /// Auto cash-out target below the minimum or non-finite
    #[error("Invalid auto cash-out target: {0}")]
    InvalidAutoTarget(f64),

    /// Command addressed a slot that does not exist
    #[error("Unknown slot: {0}")]
    UnknownSlot(SlotId),

    /// Growth rate, wait range or sampler output is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Local cache failures (never surfaced to round commands)
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem read/write failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Cached document could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Browser storage is unavailable or rejected the write
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
