//! Deterministic round simulation module
//!
//! All betting logic lives here. This module must be pure and deterministic:
//! - Clock readings come in through `tick`, never read internally
//! - Seeded RNG only
//! - Money moves only through the injected `Wallet`
//! - No rendering, audio or platform dependencies

pub mod commands;
pub mod multiplier;
pub mod position;
pub mod sampler;
pub mod state;
pub mod tick;

pub use multiplier::{format_multiplier, multiplier_at, time_for_multiplier};
pub use position::{Position, PositionState, SlotId, normalize_auto_target};
pub use sampler::{CrashSampler, ParetoSampler, ScriptedSampler, crash_point_from_uniform};
pub use state::{DEFAULT_SLOT_STAKE, PositionView, Round, RoundEvent, RoundPhase, RoundView};
pub use tick::tick;
