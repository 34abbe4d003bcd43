//! Multi-round session driven through the public API

use jet_crash::crowd::Crowd;
use jet_crash::sim::{PositionState, ScriptedSampler};
use jet_crash::{
    CrashError, LocalWallet, Outcome, Round, RoundConfig, RoundEvent, RoundPhase, SlotId, Wallet,
    tick,
};

const A: SlotId = SlotId(0);
const B: SlotId = SlotId(1);
const FRAME_MS: f64 = 1000.0 / 60.0;

fn config() -> RoundConfig {
    RoundConfig {
        wait_min_ms: 2000,
        wait_max_ms: 2000,
        ..Default::default()
    }
}

/// Tick until the round reaches `phase`, collecting notifications
fn advance_to(
    round: &mut Round,
    wallet: &mut LocalWallet,
    now: &mut f64,
    phase: RoundPhase,
    events: &mut Vec<RoundEvent>,
) {
    let limit = *now + 120_000.0;
    while round.phase() != phase {
        assert!(*now < limit, "round never reached {:?}", phase);
        *now += FRAME_MS;
        tick(round, *now, wallet).unwrap();
        events.extend(round.drain_events());
    }
}

#[test]
fn test_three_round_session() {
    let sampler = ScriptedSampler::new(vec![3.5, 1.5, 2.0]);
    let mut round = Round::with_sampler(config(), Box::new(sampler), 2024).unwrap();
    let mut wallet = LocalWallet::new(1000.0);
    let mut crowd = Crowd::new(77);
    let mut events = Vec::new();
    let mut now = 0.0;
    tick(&mut round, now, &mut wallet).unwrap();

    // Round 1: A auto at 2.0 wins, B rides to the crash and loses
    round.set_auto_target(A, Some(2.0)).unwrap();
    round.place(A, 100.0, &mut wallet).unwrap();
    round.place(B, 40.0, &mut wallet).unwrap();
    assert_eq!(wallet.balance(), 860.0);

    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Running, &mut events);
    assert_eq!(
        round.place(A, 10.0, &mut wallet),
        Err(CrashError::RoundNotAcceptingBets)
    );
    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Crashed, &mut events);

    assert_eq!(round.position(A).unwrap().state, PositionState::CashedOut);
    assert_eq!(round.position(B).unwrap().state, PositionState::Lost);
    assert_eq!(wallet.balance(), 1060.0);
    assert_eq!(round.crash_threshold(), Some(3.5));

    // Round 2: A keeps its stake and auto target, crash at 1.5 beats it
    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Waiting, &mut events);
    let a = round.position(A).unwrap();
    assert_eq!(a.state, PositionState::Idle);
    assert_eq!((a.stake, a.auto_target), (100.0, Some(2.0)));

    round.place(A, 100.0, &mut wallet).unwrap();
    round.place(B, 50.0, &mut wallet).unwrap();
    round.cancel(B, &mut wallet).unwrap();
    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Crashed, &mut events);
    assert_eq!(round.position(A).unwrap().state, PositionState::Lost);
    assert_eq!(round.position(B).unwrap().state, PositionState::Idle);
    assert_eq!(wallet.balance(), 960.0);

    // Round 3: manual cash-out on B before the 2.0 crash
    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Waiting, &mut events);
    round.set_auto_target(A, None).unwrap();
    round.place(B, 100.0, &mut wallet).unwrap();
    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Running, &mut events);
    while round.current_multiplier() < 1.2 {
        now += FRAME_MS;
        tick(&mut round, now, &mut wallet).unwrap();
    }
    let settlement = round.cash_out(B, &mut wallet).unwrap();
    assert!(settlement.outcome_multiplier() >= 1.2);
    assert!(settlement.outcome_multiplier() < 2.0);
    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Crashed, &mut events);
    events.extend(round.drain_events());

    // Bookkeeping
    assert_eq!(wallet.history(), &[2.0, 1.5, 3.5]);
    let ledger = round.ledger();
    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger.latest().unwrap().slot(), B);
    let best: Vec<f64> = ledger.best().iter().map(|s| s.payout()).collect();
    assert_eq!(best.len(), 2);
    assert_eq!(best[0], 200.0);
    assert_eq!(ledger.mine(A).filter(|s| s.result() == Outcome::Lost).count(), 1);

    let crashes: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            RoundEvent::RoundCrashed { threshold, .. } => Some(*threshold),
            _ => None,
        })
        .collect();
    assert_eq!(crashes, vec![3.5, 1.5, 2.0]);

    // The crowd only ever sees notifications
    for event in &events {
        crowd.observe(event);
    }
    assert!(!crowd.rows().is_empty());
}

#[test]
fn test_snapshot_reveals_threshold_only_after_crash() {
    let sampler = ScriptedSampler::new(vec![1.8]);
    let mut round = Round::with_sampler(config(), Box::new(sampler), 1).unwrap();
    let mut wallet = LocalWallet::new(100.0);
    let mut events = Vec::new();
    let mut now = 0.0;
    tick(&mut round, now, &mut wallet).unwrap();

    let view = round.snapshot();
    assert_eq!(view.phase, RoundPhase::Waiting);
    assert_eq!(view.countdown_secs, Some(2));
    assert_eq!(view.crash_threshold, None);
    assert_eq!(view.positions.len(), 2);

    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Running, &mut events);
    for _ in 0..30 {
        now += FRAME_MS;
        tick(&mut round, now, &mut wallet).unwrap();
    }
    let view = round.snapshot();
    assert_eq!(view.crash_threshold, None);
    assert!(view.progress > 0.0 && view.progress < 1.0);
    assert!(view.multiplier > 1.0 && view.multiplier < 1.8);

    advance_to(&mut round, &mut wallet, &mut now, RoundPhase::Crashed, &mut events);
    let view = round.snapshot();
    assert_eq!(view.crash_threshold, Some(1.8));
    assert_eq!(view.multiplier, 1.8);
    assert_eq!(view.progress, 1.0);
    assert!(serde_json::to_string(&view).unwrap().contains("\"phase\":\"Crashed\""));
}
