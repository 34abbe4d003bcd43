//! Crash threshold sampling
//!
//! The default sampler draws from a Pareto-like heavy tail: most rounds end
//! between 1.1x and 3x, a few run much longer. This is a presentational
//! heuristic, not a provably-fair scheme.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{MAX_CRASH, MIN_CRASH};

/// Source of crash thresholds, one call per round
pub trait CrashSampler {
    fn sample(&mut self) -> f64;
}

/// Any `FnMut() -> f64` closure can act as a sampler (handy for tests and
/// scripted demos).
impl<F: FnMut() -> f64> CrashSampler for F {
    fn sample(&mut self) -> f64 {
        self()
    }
}

/// Map a uniform draw `u` in [0, 1) to a crash threshold
///
/// `x = (1 - edge) / (1 - u)`, floored to two decimals and clamped into
/// `[MIN_CRASH, MAX_CRASH]`.
pub fn crash_point_from_uniform(u: f64, house_edge: f64) -> f64 {
    let x = (1.0 - house_edge) / (1.0 - u);
    if !x.is_finite() {
        return MAX_CRASH;
    }
    let floored = (x * 100.0).floor() / 100.0;
    floored.clamp(MIN_CRASH, MAX_CRASH)
}

/// Default heavy-tail sampler with its own seeded RNG
#[derive(Debug, Clone)]
pub struct ParetoSampler {
    house_edge: f64,
    rng: Pcg32,
}

impl ParetoSampler {
    pub fn new(house_edge: f64, seed: u64) -> Self {
        Self {
            house_edge,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn house_edge(&self) -> f64 {
        self.house_edge
    }
}

impl CrashSampler for ParetoSampler {
    fn sample(&mut self) -> f64 {
        // Open interval: a zero draw would floor to the clamp anyway, but
        // keep the draw strictly inside (0, 1).
        let mut u: f64 = self.rng.random();
        while u <= 0.0 {
            u = self.rng.random();
        }
        crash_point_from_uniform(u, self.house_edge)
    }
}

/// Replays a fixed list of thresholds, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSampler {
    points: Vec<f64>,
    next: usize,
}

impl ScriptedSampler {
    pub fn new(points: Vec<f64>) -> Self {
        Self { points, next: 0 }
    }
}

impl CrashSampler for ScriptedSampler {
    fn sample(&mut self) -> f64 {
        if self.points.is_empty() {
            // Surfaces as a configuration error when the round validates it
            return f64::NAN;
        }
        let point = self.points[self.next % self.points.len()];
        self.next += 1;
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn has_two_decimals(x: f64) -> bool {
        let scaled = x * 100.0;
        (scaled - scaled.round()).abs() < 1e-6
    }

    #[test]
    fn test_low_draw_clamps_to_minimum() {
        // u = 0 gives 0.99 which must never surface as a sub-1.01 crash
        assert_eq!(crash_point_from_uniform(0.0, 0.01), MIN_CRASH);
        assert_eq!(crash_point_from_uniform(0.005, 0.01), MIN_CRASH);
    }

    #[test]
    fn test_high_draw_clamps_to_maximum() {
        assert_eq!(crash_point_from_uniform(0.9999, 0.01), MAX_CRASH);
        assert_eq!(crash_point_from_uniform(1.0, 0.01), MAX_CRASH);
    }

    #[test]
    fn test_mid_draw_floors() {
        // 0.99 / 0.5 = 1.98
        assert!((crash_point_from_uniform(0.5, 0.01) - 1.98).abs() < 1e-12);
        // 0.99 / 0.25 = 3.96
        assert!((crash_point_from_uniform(0.75, 0.01) - 3.96).abs() < 1e-12);
        // 1 - 0.7 is slightly above 0.3, so 3.3 floors down to 3.29
        assert!((crash_point_from_uniform(0.7, 0.01) - 3.29).abs() < 1e-12);
    }

    #[test]
    fn test_sampler_determinism() {
        let mut a = ParetoSampler::new(0.01, 42);
        let mut b = ParetoSampler::new(0.01, 42);
        for _ in 0..100 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_distribution_is_mostly_low() {
        let mut sampler = ParetoSampler::new(0.01, 7);
        let draws: Vec<f64> = (0..2000).map(|_| sampler.sample()).collect();
        let under_three = draws.iter().filter(|&&x| x < 3.0).count();
        assert!(under_three > draws.len() / 2);
        assert!(draws.iter().any(|&x| x > 10.0));
    }

    #[test]
    fn test_scripted_cycles() {
        let mut s = ScriptedSampler::new(vec![2.0, 3.5]);
        assert_eq!(s.sample(), 2.0);
        assert_eq!(s.sample(), 3.5);
        assert_eq!(s.sample(), 2.0);
        assert!(ScriptedSampler::new(vec![]).sample().is_nan());
    }

    #[test]
    fn test_closure_sampler() {
        let mut fixed = || 4.2;
        assert_eq!(CrashSampler::sample(&mut fixed), 4.2);
    }

    proptest! {
        #[test]
        fn prop_sampled_threshold_in_bounds(seed in any::<u64>()) {
            let mut sampler = ParetoSampler::new(0.01, seed);
            for _ in 0..64 {
                let x = sampler.sample();
                prop_assert!((MIN_CRASH..=MAX_CRASH).contains(&x));
                prop_assert!(has_two_decimals(x));
            }
        }

        #[test]
        fn prop_uniform_mapping_in_bounds(u in 0.0f64..1.0, edge in 0.0f64..0.99) {
            let x = crash_point_from_uniform(u, edge);
            prop_assert!((MIN_CRASH..=MAX_CRASH).contains(&x));
            prop_assert!(has_two_decimals(x));
        }
    }
}
