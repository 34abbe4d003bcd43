//! Settlement ledger
//!
//! Append-only record of finished positions, newest first, trimmed to a
//! fixed retention window.

use serde::{Deserialize, Serialize};

use crate::sim::SlotId;

/// Default number of settlements to keep
pub const DEFAULT_LEDGER_CAPACITY: usize = 30;

/// Final result of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// A single settled position. Fields are private: entries never change once
/// recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    round_id: u64,
    slot: SlotId,
    stake: f64,
    /// Cash-out multiplier for wins, crash threshold for losses
    outcome_multiplier: f64,
    pub(crate) payout: f64,
    result: Outcome,
}

impl Settlement {
    pub(crate) fn new(
        round_id: u64,
        slot: SlotId,
        stake: f64,
        outcome_multiplier: f64,
        result: Outcome,
    ) -> Self {
        let payout = match result {
            Outcome::Won => stake * outcome_multiplier,
            Outcome::Lost => 0.0,
        };
        Self {
            round_id,
            slot,
            stake,
            outcome_multiplier,
            payout,
            result,
        }
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn stake(&self) -> f64 {
        self.stake
    }

    pub fn outcome_multiplier(&self) -> f64 {
        self.outcome_multiplier
    }

    pub fn payout(&self) -> f64 {
        self.payout
    }

    pub fn result(&self) -> Outcome {
        self.result
    }

    pub fn is_win(&self) -> bool {
        self.result == Outcome::Won
    }
}

/// Bounded, newest-first settlement log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    capacity: usize,
    entries: Vec<Settlement>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_CAPACITY)
    }
}

impl Ledger {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Record a settlement at the front, dropping the oldest past capacity
    pub fn record(&mut self, settlement: Settlement) {
        self.entries.insert(0, settlement);
        self.entries.truncate(self.capacity);
    }

    /// All retained entries, newest first
    pub fn entries(&self) -> &[Settlement] {
        &self.entries
    }

    /// Most recent settlement
    pub fn latest(&self) -> Option<&Settlement> {
        self.entries.first()
    }

    /// Settlements for one of the local player's slots, newest first
    pub fn mine(&self, slot: SlotId) -> impl Iterator<Item = &Settlement> {
        self.entries.iter().filter(move |s| s.slot == slot)
    }

    /// Winning settlements by payout, largest first
    pub fn best(&self) -> Vec<&Settlement> {
        let mut winners: Vec<&Settlement> = self.entries.iter().filter(|s| s.is_win()).collect();
        winners.sort_by(|a, b| b.payout.total_cmp(&a.payout));
        winners
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
