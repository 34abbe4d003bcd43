//! Player commands
//!
//! Each command either completes fully or returns an error with the wallet
//! and every position unchanged. Commands run between ticks, so a manual
//! cash-out always lands before the next tick's auto sweep.

use super::position::{PositionState, SlotId, normalize_auto_target};
use super::state::{Round, RoundEvent, RoundPhase};
use crate::error::CrashError;
use crate::ledger::Settlement;
use crate::wallet::Wallet;

impl Round {
    /// Commit `stake` on an idle slot for the upcoming flight
    pub fn place(
        &mut self,
        slot: SlotId,
        stake: f64,
        wallet: &mut dyn Wallet,
    ) -> Result<(), CrashError> {
        if self.phase != RoundPhase::Waiting {
            return Err(CrashError::RoundNotAcceptingBets);
        }
        let (min, max) = (self.config.min_stake, self.config.max_stake);
        let position = self.slot_mut(slot)?;
        if position.state != PositionState::Idle {
            // Already committed this round; only idle slots take new bets
            return Err(CrashError::RoundNotAcceptingBets);
        }
        if !stake.is_finite() {
            return Err(CrashError::InvalidAmount(stake));
        }
        // Whole units only, so a refund restores the balance bit for bit
        let whole = stake.floor();
        if whole < min || whole > max {
            return Err(CrashError::InvalidAmount(stake));
        }
        let stake = whole;
        let available = wallet.balance();
        if stake > available {
            return Err(CrashError::InsufficientFunds {
                needed: stake,
                available,
            });
        }

        wallet.debit(stake)?;
        position.queue(stake);
        log::debug!("Slot {} queued {:.2}", slot, stake);
        Ok(())
    }

    /// Withdraw a queued bet and refund it in full
    pub fn cancel(&mut self, slot: SlotId, wallet: &mut dyn Wallet) -> Result<(), CrashError> {
        let refund = self.slot_mut(slot)?.unqueue()?;
        wallet.credit(refund);
        log::debug!("Slot {} cancelled, refunded {:.2}", slot, refund);
        Ok(())
    }

    /// Cash out an active position at the current multiplier
    pub fn cash_out(
        &mut self,
        slot: SlotId,
        wallet: &mut dyn Wallet,
    ) -> Result<Settlement, CrashError> {
        let multiplier = self.current_multiplier;
        self.settle_win(slot, multiplier, wallet)
    }

    /// Set or clear the automatic cash-out multiplier
    pub fn set_auto_target(&mut self, slot: SlotId, target: Option<f64>) -> Result<(), CrashError> {
        let target = normalize_auto_target(target)?;
        self.slot_mut(slot)?.auto_target = target;
        Ok(())
    }

    /// Change the stake an idle slot will commit next
    pub fn set_stake(&mut self, slot: SlotId, amount: f64) -> Result<(), CrashError> {
        if !amount.is_finite() {
            return Err(CrashError::InvalidAmount(amount));
        }
        let max = self.config.max_stake;
        let position = self.slot_mut(slot)?;
        if position.state != PositionState::Idle {
            return Err(CrashError::StakeLocked(slot));
        }
        position.stake = amount.clamp(0.0, max);
        Ok(())
    }

    /// Halve the configured stake (rounded down)
    pub fn halve_stake(&mut self, slot: SlotId) -> Result<(), CrashError> {
        let stake = self.position(slot).ok_or(CrashError::UnknownSlot(slot))?.stake;
        self.set_stake(slot, (stake / 2.0).floor())
    }

    /// Double the configured stake (rounded down, capped at the maximum)
    pub fn double_stake(&mut self, slot: SlotId) -> Result<(), CrashError> {
        let stake = self.position(slot).ok_or(CrashError::UnknownSlot(slot))?.stake;
        self.set_stake(slot, (stake * 2.0).floor())
    }

    /// Shared win path for manual and automatic cash-outs
    pub(crate) fn settle_win(
        &mut self,
        slot: SlotId,
        multiplier: f64,
        wallet: &mut dyn Wallet,
    ) -> Result<Settlement, CrashError> {
        let round_id = self.round_id;
        let settlement = self.slot_mut(slot)?.cash_out(round_id, multiplier)?;
        wallet.credit(settlement.payout());
        log::debug!(
            "Slot {} cashed out at {:.2}x for {:.2}",
            slot,
            multiplier,
            settlement.payout()
        );
        self.ledger.record(settlement.clone());
        self.emit(RoundEvent::PositionSettled {
            slot,
            settlement: settlement.clone(),
        });
        Ok(settlement)
    }
}
