//! Round state and core simulation types
//!
//! A single `Round` is created at startup and re-initialized in place for
//! every new round. Positions live inside it and persist across rounds.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::multiplier::time_for_multiplier;
use super::position::{Position, PositionState, SlotId};
use super::sampler::{CrashSampler, ParetoSampler};
use crate::config::RoundConfig;
use crate::consts::MIN_CRASH;
use crate::error::CrashError;
use crate::ledger::{Ledger, Settlement};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Accepting bets, counting down to launch
    Waiting,
    /// Multiplier rising
    Running,
    /// Threshold reached, showing the result
    Crashed,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Waiting => "waiting",
            RoundPhase::Running => "running",
            RoundPhase::Crashed => "crashed",
        }
    }
}

/// One-way notifications for rendering, audio and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    RoundStarted { round_id: u64 },
    RoundCrashed { round_id: u64, threshold: f64 },
    PositionSettled { slot: SlotId, settlement: Settlement },
}

/// Read-only view of a position
#[derive(Debug, Clone, Serialize)]
pub struct PositionView {
    pub slot: SlotId,
    pub state: PositionState,
    pub stake: f64,
    pub auto_target: Option<f64>,
    pub cash_multiplier: Option<f64>,
}

/// Read-only snapshot handed to collaborators each frame
#[derive(Debug, Clone, Serialize)]
pub struct RoundView {
    pub round_id: u64,
    pub phase: RoundPhase,
    pub multiplier: f64,
    /// Only revealed once crashed
    pub crash_threshold: Option<f64>,
    /// Whole seconds until launch (waiting only)
    pub countdown_secs: Option<u64>,
    /// 0..1 pacing along the flight path
    pub progress: f64,
    pub positions: Vec<PositionView>,
}

/// The round state machine's data
pub struct Round {
    pub(crate) config: RoundConfig,
    pub(crate) sampler: Box<dyn CrashSampler>,
    /// Wait-duration RNG
    pub(crate) rng: Pcg32,
    /// Incremented at every launch
    pub(crate) round_id: u64,
    pub(crate) phase: RoundPhase,
    /// Start of the current phase (ms); `None` until the first tick
    pub(crate) phase_started_at: Option<f64>,
    /// Latest clock reading seen by `tick`
    pub(crate) now_ms: f64,
    pub(crate) wait_ms: f64,
    pub(crate) crash_threshold: f64,
    pub(crate) current_multiplier: f64,
    /// Settled slots already returned to idle for this crash
    pub(crate) slots_reset: bool,
    pub(crate) positions: Vec<Position>,
    pub(crate) ledger: Ledger,
    pub(crate) events: Vec<RoundEvent>,
}

impl std::fmt::Debug for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Round")
            .field("round_id", &self.round_id)
            .field("phase", &self.phase)
            .field("current_multiplier", &self.current_multiplier)
            .field("positions", &self.positions)
            .finish_non_exhaustive()
    }
}

impl Round {
    /// Create a round with the default heavy-tail sampler
    pub fn new(config: RoundConfig, seed: u64) -> Result<Self, CrashError> {
        // Sampler gets its own stream so wait durations don't shift crash points
        let sampler_seed = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let sampler = ParetoSampler::new(config.house_edge, sampler_seed);
        Self::with_sampler(config, Box::new(sampler), seed)
    }

    /// Create a round with a custom crash sampler
    pub fn with_sampler(
        config: RoundConfig,
        sampler: Box<dyn CrashSampler>,
        seed: u64,
    ) -> Result<Self, CrashError> {
        config.validate()?;

        let positions = (0..config.slots)
            .map(|i| Position::new(SlotId(i), DEFAULT_SLOT_STAKE.min(config.max_stake)))
            .collect();

        let mut round = Self {
            ledger: Ledger::new(config.ledger_capacity),
            config,
            sampler,
            rng: Pcg32::seed_from_u64(seed),
            round_id: 0,
            phase: RoundPhase::Waiting,
            phase_started_at: None,
            now_ms: 0.0,
            wait_ms: 0.0,
            crash_threshold: MIN_CRASH,
            current_multiplier: 1.0,
            slots_reset: true,
            positions,
            events: Vec::new(),
        };
        round.prepare_next_round()?;
        Ok(round)
    }

    /// Sample the next threshold and wait, without touching the phase.
    /// Fails on sampler output that is non-finite or below the minimum.
    pub(crate) fn prepare_next_round(&mut self) -> Result<(), CrashError> {
        let threshold = self.sampler.sample();
        if !threshold.is_finite() || threshold < MIN_CRASH {
            return Err(CrashError::Configuration(format!(
                "crash sampler produced an invalid threshold: {threshold}"
            )));
        }
        self.crash_threshold = threshold;
        self.wait_ms = self
            .rng
            .random_range(self.config.wait_min_ms..=self.config.wait_max_ms) as f64;
        self.current_multiplier = 1.0;
        Ok(())
    }

    pub(crate) fn emit(&mut self, event: RoundEvent) {
        self.events.push(event);
    }

    /// Look up a slot or fail with `UnknownSlot`
    pub(crate) fn slot_mut(&mut self, slot: SlotId) -> Result<&mut Position, CrashError> {
        self.positions
            .get_mut(slot.0)
            .ok_or(CrashError::UnknownSlot(slot))
    }

    // === Query surface ===

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    /// Multiplier published by the latest tick (1.0 outside a flight)
    pub fn current_multiplier(&self) -> f64 {
        self.current_multiplier
    }

    /// Crash point, hidden until the round has crashed
    pub fn crash_threshold(&self) -> Option<f64> {
        (self.phase == RoundPhase::Crashed).then_some(self.crash_threshold)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn position(&self, slot: SlotId) -> Option<&Position> {
        self.positions.get(slot.0)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Take the notifications emitted since the last call
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    fn phase_elapsed_ms(&self) -> f64 {
        self.phase_started_at
            .map(|start| (self.now_ms - start).max(0.0))
            .unwrap_or(0.0)
    }

    /// Whole seconds left before launch, while waiting
    pub fn countdown_secs(&self) -> Option<u64> {
        if self.phase != RoundPhase::Waiting {
            return None;
        }
        let left = (self.wait_ms - self.phase_elapsed_ms()).max(0.0);
        Some((left / 1000.0).ceil() as u64)
    }

    /// Fraction of the flight path covered, for renderer pacing
    pub fn flight_progress(&self) -> f64 {
        match self.phase {
            RoundPhase::Waiting => 0.0,
            RoundPhase::Crashed => 1.0,
            RoundPhase::Running => {
                let total = time_for_multiplier(self.crash_threshold, self.config.growth_rate)
                    .max(0.25);
                (self.phase_elapsed_ms() / 1000.0 / total).clamp(0.0, 1.0)
            }
        }
    }

    pub fn snapshot(&self) -> RoundView {
        RoundView {
            round_id: self.round_id,
            phase: self.phase,
            multiplier: self.current_multiplier,
            crash_threshold: self.crash_threshold(),
            countdown_secs: self.countdown_secs(),
            progress: self.flight_progress(),
            positions: self
                .positions
                .iter()
                .map(|p| PositionView {
                    slot: p.id,
                    state: p.state,
                    stake: p.stake,
                    auto_target: p.auto_target,
                    cash_multiplier: p.cash_multiplier,
                })
                .collect(),
        }
    }
}

/// Stake a fresh slot starts with
pub const DEFAULT_SLOT_STAKE: f64 = 100.0;
