//! Round configuration
//!
//! Loaded from JSON (missing fields fall back to defaults) and validated
//! before a round may be built from it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CrashError;

/// Tunables for the round state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Exponential growth constant (per second)
    pub growth_rate: f64,

    // === Timing ===
    /// Shortest wait between rounds (ms)
    pub wait_min_ms: u64,
    /// Longest wait between rounds (ms)
    pub wait_max_ms: u64,
    /// How long the crash is shown before the next wait starts (ms)
    pub crash_display_ms: u64,
    /// Delay after a crash before settled slots return to idle (ms)
    pub settle_reset_ms: u64,

    // === Money ===
    /// House edge fed to the default sampler
    pub house_edge: f64,
    /// Smallest accepted stake
    pub min_stake: f64,
    /// Largest accepted stake
    pub max_stake: f64,

    // === Bookkeeping ===
    pub ledger_capacity: usize,
    pub history_capacity: usize,
    /// Independent positions per player
    pub slots: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            growth_rate: DEFAULT_GROWTH_RATE,

            wait_min_ms: 3800,
            wait_max_ms: 5600,
            crash_display_ms: 1600,
            settle_reset_ms: 900,

            house_edge: DEFAULT_HOUSE_EDGE,
            min_stake: 1.0,
            max_stake: MAX_STAKE,

            ledger_capacity: crate::ledger::DEFAULT_LEDGER_CAPACITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            slots: 2,
        }
    }
}

impl RoundConfig {
    /// Reject settings that would make the multiplier or timing meaningless
    pub fn validate(&self) -> Result<(), CrashError> {
        if !self.growth_rate.is_finite() || self.growth_rate <= 0.0 {
            return Err(CrashError::Configuration(format!(
                "growth_rate must be finite and positive, got {}",
                self.growth_rate
            )));
        }
        if self.wait_min_ms > self.wait_max_ms {
            return Err(CrashError::Configuration(format!(
                "wait range is inverted: {}..{} ms",
                self.wait_min_ms, self.wait_max_ms
            )));
        }
        if !self.house_edge.is_finite() || !(0.0..1.0).contains(&self.house_edge) {
            return Err(CrashError::Configuration(format!(
                "house_edge must be in [0, 1), got {}",
                self.house_edge
            )));
        }
        if !self.min_stake.is_finite()
            || !self.max_stake.is_finite()
            || self.min_stake <= 0.0
            || self.min_stake > self.max_stake
        {
            return Err(CrashError::Configuration(format!(
                "stake bounds are invalid: [{}, {}]",
                self.min_stake, self.max_stake
            )));
        }
        if self.slots == 0 {
            return Err(CrashError::Configuration("at least one slot is required".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, CrashError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CrashError::Configuration(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, CrashError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CrashError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded round config from {}", path.display());
        Ok(config)
    }
}
