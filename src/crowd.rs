//! Cosmetic crowd of other players
//!
//! Purely decorative filler for the bets list. It has its own seed and only
//! listens to public round notifications; it never reads or writes the round.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::RoundEvent;

const NAME_HEADS: [&str; 16] = [
    "Nova", "Jet", "Lucky", "Sky", "Wolf", "Zero", "Kite", "Echo", "Drift", "Milo", "Niko", "Vega",
    "Rex", "Ivy", "Panda", "Frost",
];
const NAME_JOINS: [&str; 4] = ["X", "_", "-", ""];
const NAME_TAILS: [&str; 6] = ["1", "7", "11", "99", "42", ""];

/// State of a crowd bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrowdBetState {
    Playing,
    Won,
    Lost,
}

/// One synthetic bet row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdBet {
    pub name: String,
    pub stake: f64,
    pub auto_target: Option<f64>,
    pub state: CrowdBetState,
    /// Cash-out point for wins, crash point for losses
    pub multiplier: Option<f64>,
    pub payout: f64,
}

/// Independently seeded generator of crowd bets
#[derive(Debug, Clone)]
pub struct Crowd {
    rng: Pcg32,
    bets: Vec<CrowdBet>,
}

impl Crowd {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            bets: Vec::new(),
        }
    }

    /// React to a round notification
    pub fn observe(&mut self, event: &RoundEvent) {
        match event {
            RoundEvent::RoundStarted { .. } => self.spawn(),
            RoundEvent::RoundCrashed { threshold, .. } => self.settle(*threshold),
            RoundEvent::PositionSettled { .. } => {}
        }
    }

    /// Current rows, in spawn order
    pub fn rows(&self) -> &[CrowdBet] {
        &self.bets
    }

    /// Winning rows by payout, largest first
    pub fn top(&self) -> Vec<&CrowdBet> {
        let mut winners: Vec<&CrowdBet> = self
            .bets
            .iter()
            .filter(|b| b.state == CrowdBetState::Won)
            .collect();
        winners.sort_by(|a, b| b.payout.total_cmp(&a.payout));
        winners
    }

    fn name(&mut self) -> String {
        let head = NAME_HEADS[self.rng.random_range(0..NAME_HEADS.len())];
        let join = NAME_JOINS[self.rng.random_range(0..NAME_JOINS.len())];
        let second: String = NAME_HEADS[self.rng.random_range(0..NAME_HEADS.len())]
            .chars()
            .take(2)
            .collect();
        let tail = NAME_TAILS[self.rng.random_range(0..NAME_TAILS.len())];
        format!("{head}{join}{second}{tail}")
    }

    fn spawn(&mut self) {
        let count = self.rng.random_range(16..26);
        self.bets.clear();
        for _ in 0..count {
            let name = self.name();
            let stake = self.rng.random_range(10..910) as f64;
            let auto_target = if self.rng.random_bool(0.55) {
                Some((1.2 + self.rng.random::<f64>() * 6.0).clamp(1.05, 12.0))
            } else {
                None
            };
            self.bets.push(CrowdBet {
                name,
                stake,
                auto_target,
                state: CrowdBetState::Playing,
                multiplier: None,
                payout: stake,
            });
        }
    }

    fn settle(&mut self, threshold: f64) {
        let rng = &mut self.rng;
        for bet in self.bets.iter_mut().filter(|b| b.state == CrowdBetState::Playing) {
            let cash = match bet.auto_target {
                Some(auto) if auto < threshold => Some(auto),
                _ => {
                    let manual = rng.random_bool(0.35);
                    let point = 1.1 + rng.random::<f64>() * 3.0;
                    (manual && point < threshold).then_some(point)
                }
            };
            match cash {
                Some(m) => {
                    bet.state = CrowdBetState::Won;
                    bet.multiplier = Some(m);
                    bet.payout = bet.stake * m;
                }
                None => {
                    bet.state = CrowdBetState::Lost;
                    bet.multiplier = Some(threshold);
                    bet.payout = 0.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_on_round_start() {
        let mut crowd = Crowd::new(11);
        crowd.observe(&RoundEvent::RoundStarted { round_id: 1 });
        let rows = crowd.rows();
        assert!((16..26).contains(&rows.len()));
        for bet in rows {
            assert_eq!(bet.state, CrowdBetState::Playing);
            assert!((10.0..910.0).contains(&bet.stake));
            assert!(!bet.name.is_empty());
            if let Some(auto) = bet.auto_target {
                assert!((1.05..=12.0).contains(&auto));
            }
        }
    }

    #[test]
    fn test_settle_on_crash() {
        let mut crowd = Crowd::new(12);
        crowd.observe(&RoundEvent::RoundStarted { round_id: 1 });
        crowd.observe(&RoundEvent::RoundCrashed {
            round_id: 1,
            threshold: 2.5,
        });

        for bet in crowd.rows() {
            match bet.state {
                CrowdBetState::Won => {
                    let m = bet.multiplier.unwrap();
                    assert!(m < 2.5);
                    assert!((bet.payout - bet.stake * m).abs() < 1e-9);
                }
                CrowdBetState::Lost => {
                    assert_eq!(bet.multiplier, Some(2.5));
                    assert_eq!(bet.payout, 0.0);
                }
                CrowdBetState::Playing => panic!("bet left unsettled"),
            }
            if let Some(auto) = bet.auto_target {
                if auto < 2.5 {
                    assert_eq!(bet.state, CrowdBetState::Won);
                }
            }
        }

        let top = crowd.top();
        assert!(top.windows(2).all(|w| w[0].payout >= w[1].payout));
    }

    #[test]
    fn test_minimum_crash_loses_everyone() {
        let mut crowd = Crowd::new(13);
        crowd.observe(&RoundEvent::RoundStarted { round_id: 1 });
        crowd.observe(&RoundEvent::RoundCrashed {
            round_id: 1,
            threshold: 1.01,
        });
        assert!(crowd.rows().iter().all(|b| b.state == CrowdBetState::Lost));
        assert!(crowd.top().is_empty());
    }
}
