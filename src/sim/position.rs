//! Betting positions ("slots")
//!
//! A position keeps its configured stake and auto target across rounds and
//! walks `Idle -> Queued -> Active -> CashedOut | Lost -> Idle`. Money moves
//! only in the round commands; the methods here only change slot state and
//! build settlement records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_AUTO_TARGET, MIN_AUTO_TARGET};
use crate::error::CrashError;
use crate::ledger::{Outcome, Settlement};

/// Index of a position within the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub usize);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Slots read as A, B, C... like the betting cards
        match u8::try_from(self.0) {
            Ok(i) if i < 26 => write!(f, "{}", (b'A' + i) as char),
            _ => write!(f, "#{}", self.0),
        }
    }
}

/// Lifecycle state of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionState {
    /// Not committed; stake and auto target are editable
    #[default]
    Idle,
    /// Stake debited, waiting for the next launch
    Queued,
    /// In flight
    Active,
    /// Settled as a win
    CashedOut,
    /// Settled as a loss at the crash
    Lost,
}

impl PositionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionState::Idle => "idle",
            PositionState::Queued => "queued",
            PositionState::Active => "active",
            PositionState::CashedOut => "cashed",
            PositionState::Lost => "lost",
        }
    }

    /// True once the position has a final outcome for this round
    pub fn is_settled(&self) -> bool {
        matches!(self, PositionState::CashedOut | PositionState::Lost)
    }
}

/// Validate and normalize an auto cash-out target
pub fn normalize_auto_target(target: Option<f64>) -> Result<Option<f64>, CrashError> {
    match target {
        None => Ok(None),
        Some(t) if !t.is_finite() || t < MIN_AUTO_TARGET => Err(CrashError::InvalidAutoTarget(t)),
        Some(t) => Ok(Some(t.min(MAX_AUTO_TARGET))),
    }
}

/// One betting slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: SlotId,
    /// Configured stake, committed on placement
    pub stake: f64,
    /// Automatic cash-out multiplier
    pub auto_target: Option<f64>,
    pub state: PositionState,
    /// Realized multiplier; only set while `CashedOut`
    pub cash_multiplier: Option<f64>,
}

impl Position {
    pub fn new(id: SlotId, stake: f64) -> Self {
        Self {
            id,
            stake,
            auto_target: None,
            state: PositionState::Idle,
            cash_multiplier: None,
        }
    }

    /// Commit `stake` (balance already debited by the caller)
    pub(crate) fn queue(&mut self, stake: f64) {
        debug_assert_eq!(self.state, PositionState::Idle);
        self.stake = stake;
        self.state = PositionState::Queued;
    }

    /// Withdraw a queued stake (refund handled by the caller)
    pub(crate) fn unqueue(&mut self) -> Result<f64, CrashError> {
        if self.state != PositionState::Queued {
            return Err(CrashError::NothingToCancel(self.id));
        }
        self.state = PositionState::Idle;
        Ok(self.stake)
    }

    /// Queued positions join the flight at launch
    pub(crate) fn activate(&mut self) -> bool {
        if self.state == PositionState::Queued {
            self.state = PositionState::Active;
            true
        } else {
            false
        }
    }

    /// Auto target reached at `multiplier`?
    pub fn auto_triggered(&self, multiplier: f64) -> bool {
        self.state == PositionState::Active
            && self.auto_target.is_some_and(|target| multiplier >= target)
    }

    /// Settle as a win at `multiplier`
    pub(crate) fn cash_out(
        &mut self,
        round_id: u64,
        multiplier: f64,
    ) -> Result<Settlement, CrashError> {
        if self.state != PositionState::Active {
            return Err(CrashError::NotActive(self.id));
        }
        self.state = PositionState::CashedOut;
        self.cash_multiplier = Some(multiplier);
        Ok(Settlement::new(round_id, self.id, self.stake, multiplier, Outcome::Won))
    }

    /// Settle as a loss at the crash threshold
    pub(crate) fn lose(&mut self, round_id: u64, threshold: f64) -> Option<Settlement> {
        if self.state != PositionState::Active {
            return None;
        }
        self.state = PositionState::Lost;
        Some(Settlement::new(round_id, self.id, self.stake, threshold, Outcome::Lost))
    }

    /// Return a settled position to `Idle`, keeping stake and auto target
    pub(crate) fn reset_for_next_round(&mut self) {
        if self.state.is_settled() {
            self.state = PositionState::Idle;
            self.cash_multiplier = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_display() {
        assert_eq!(SlotId(0).to_string(), "A");
        assert_eq!(SlotId(1).to_string(), "B");
        assert_eq!(SlotId(30).to_string(), "#30");
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(PositionState::Idle.as_str(), "idle");
        assert_eq!(PositionState::Queued.as_str(), "queued");
        assert_eq!(PositionState::CashedOut.as_str(), "cashed");
        assert_eq!(PositionState::Lost.as_str(), "lost");
    }

    #[test]
    fn test_full_lifecycle() {
        let mut pos = Position::new(SlotId(0), 100.0);
        pos.queue(100.0);
        assert_eq!(pos.state, PositionState::Queued);
        assert!(pos.activate());
        assert!(!pos.activate());

        let settlement = pos.cash_out(1, 2.0).unwrap();
        assert_eq!(settlement.payout, 200.0);
        assert_eq!(pos.state, PositionState::CashedOut);
        assert_eq!(pos.cash_multiplier, Some(2.0));

        // No second payout
        assert_eq!(pos.cash_out(1, 3.0), Err(CrashError::NotActive(SlotId(0))));
        assert!(pos.lose(1, 3.0).is_none());

        pos.reset_for_next_round();
        assert_eq!(pos.state, PositionState::Idle);
        assert_eq!(pos.cash_multiplier, None);
        assert_eq!(pos.stake, 100.0);
    }

    #[test]
    fn test_unqueue_requires_queued() {
        let mut pos = Position::new(SlotId(1), 50.0);
        assert_eq!(pos.unqueue(), Err(CrashError::NothingToCancel(SlotId(1))));
        pos.queue(50.0);
        assert_eq!(pos.unqueue(), Ok(50.0));
        assert_eq!(pos.state, PositionState::Idle);
    }

    #[test]
    fn test_auto_trigger() {
        let mut pos = Position::new(SlotId(0), 10.0);
        pos.auto_target = Some(2.0);
        assert!(!pos.auto_triggered(5.0)); // not active yet
        pos.queue(10.0);
        pos.activate();
        assert!(!pos.auto_triggered(1.99));
        assert!(pos.auto_triggered(2.0));
    }

    #[test]
    fn test_normalize_auto_target() {
        assert_eq!(normalize_auto_target(None), Ok(None));
        assert_eq!(normalize_auto_target(Some(1.5)), Ok(Some(1.5)));
        assert_eq!(normalize_auto_target(Some(5000.0)), Ok(Some(MAX_AUTO_TARGET)));
        assert_eq!(
            normalize_auto_target(Some(1.0)),
            Err(CrashError::InvalidAutoTarget(1.0))
        );
        assert!(normalize_auto_target(Some(f64::NAN)).is_err());
    }
}
