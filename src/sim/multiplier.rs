//! Multiplier growth model
//!
//! The multiplier follows `exp(rate * t)`: exactly 1.0 at launch, strictly
//! increasing, continuous. The inverse gives the flight time needed to reach
//! a target, used for animation pacing.

/// Multiplier after `elapsed_secs` of flight
#[inline]
pub fn multiplier_at(elapsed_secs: f64, growth_rate: f64) -> f64 {
    debug_assert!(growth_rate > 0.0, "growth rate must be positive");
    (growth_rate * elapsed_secs.max(0.0)).exp()
}

/// Seconds of flight needed to reach `target`
#[inline]
pub fn time_for_multiplier(target: f64, growth_rate: f64) -> f64 {
    debug_assert!(growth_rate > 0.0, "growth rate must be positive");
    target.max(1.0).ln() / growth_rate
}

/// Display form used by logs and the HUD ("2.35x")
pub fn format_multiplier(multiplier: f64) -> String {
    format!("{:.2}x", multiplier)
}
