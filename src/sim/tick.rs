//! Clock-driven round step
//!
//! One call per frame advances the phase machine:
//! `Waiting -> Running -> Crashed -> Waiting`, forever.

use super::multiplier::{format_multiplier, multiplier_at};
use super::state::{Round, RoundEvent, RoundPhase};
use crate::error::CrashError;
use crate::wallet::Wallet;

/// Advance the round to clock reading `now_ms` (milliseconds, monotonic)
///
/// Only fails when the sampler hands back an unusable threshold while
/// preparing the next round; the round then stays crashed and never starts.
pub fn tick(round: &mut Round, now_ms: f64, wallet: &mut dyn Wallet) -> Result<(), CrashError> {
    round.now_ms = now_ms;
    let Some(started_at) = round.phase_started_at else {
        // First reading starts the initial wait
        round.phase_started_at = Some(now_ms);
        return Ok(());
    };
    let elapsed_ms = (now_ms - started_at).max(0.0);

    match round.phase {
        RoundPhase::Waiting => {
            if elapsed_ms >= round.wait_ms {
                launch(round, now_ms);
            }
        }

        RoundPhase::Running => {
            let raw = multiplier_at(elapsed_ms / 1000.0, round.config.growth_rate);
            let crashed = raw >= round.crash_threshold;
            let multiplier = if crashed { round.crash_threshold } else { raw };
            // Never step backwards, even if the clock does
            round.current_multiplier = round.current_multiplier.max(multiplier);

            // Auto cash-outs run before the crash check, so a target equal
            // to the threshold still wins
            sweep_auto_cash_outs(round, wallet);

            if crashed {
                crash(round, now_ms, wallet);
            }
        }

        RoundPhase::Crashed => {
            if !round.slots_reset && elapsed_ms >= round.config.settle_reset_ms as f64 {
                reset_settled_slots(round);
            }
            if elapsed_ms >= round.config.crash_display_ms as f64 {
                reset_settled_slots(round);
                round.prepare_next_round()?;
                round.phase = RoundPhase::Waiting;
                round.phase_started_at = Some(now_ms);
                log::debug!(
                    "Round {} {}, next launch in {:.0} ms",
                    round.round_id,
                    round.phase.as_str(),
                    round.wait_ms
                );
            }
        }
    }

    Ok(())
}

/// `Waiting -> Running`: queued slots join the flight
fn launch(round: &mut Round, now_ms: f64) {
    round.round_id += 1;
    round.phase = RoundPhase::Running;
    round.phase_started_at = Some(now_ms);
    round.current_multiplier = 1.0;
    round.slots_reset = false;

    let mut joined = 0;
    for position in &mut round.positions {
        if position.activate() {
            joined += 1;
        }
    }
    log::info!("Round {} started with {} active positions", round.round_id, joined);
    round.emit(RoundEvent::RoundStarted {
        round_id: round.round_id,
    });
}

/// Settle every active slot whose auto target has been reached, at its target
fn sweep_auto_cash_outs(round: &mut Round, wallet: &mut dyn Wallet) {
    let multiplier = round.current_multiplier;
    let due: Vec<_> = round
        .positions
        .iter()
        .filter(|p| p.auto_triggered(multiplier))
        .filter_map(|p| p.auto_target.map(|target| (p.id, target)))
        .collect();

    for (slot, target) in due {
        // Slot was active a moment ago; a failure here would mean it already settled
        if let Err(e) = round.settle_win(slot, target, wallet) {
            log::warn!("Auto cash-out for slot {} skipped: {}", slot, e);
        }
    }
}

/// `Running -> Crashed`: remaining active slots lose their stake
fn crash(round: &mut Round, now_ms: f64, wallet: &mut dyn Wallet) {
    let threshold = round.crash_threshold;
    let round_id = round.round_id;
    round.current_multiplier = threshold;
    round.phase = RoundPhase::Crashed;
    round.phase_started_at = Some(now_ms);

    let losses: Vec<_> = round
        .positions
        .iter_mut()
        .filter_map(|p| p.lose(round_id, threshold))
        .collect();
    for settlement in losses {
        log::debug!("Slot {} lost {:.2}", settlement.slot(), settlement.stake());
        round.ledger.record(settlement.clone());
        round.emit(RoundEvent::PositionSettled {
            slot: settlement.slot(),
            settlement,
        });
    }

    wallet.append_history(threshold);
    log::info!("Round {} crashed at {}", round_id, format_multiplier(threshold));
    round.emit(RoundEvent::RoundCrashed { round_id, threshold });
}

/// Settled slots go back to idle, keeping stake and auto target
fn reset_settled_slots(round: &mut Round) {
    for position in &mut round.positions {
        position.reset_for_next_round();
    }
    round.slots_reset = true;
}
