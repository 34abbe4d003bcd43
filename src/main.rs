//! Jet Crash headless runner
//!
//! Plays a number of rounds on a simulated 60 Hz clock with a simple bot on
//! both slots, then reports the outcome.
//!
//! Usage: `jet-crash [rounds] [config.json]`
//! Environment: `RUST_LOG`, `JET_CRASH_SEED`, `JET_CRASH_CACHE` (cache dir)

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use jet_crash::consts::DEFAULT_BALANCE;
    use jet_crash::crowd::Crowd;
    use jet_crash::persistence::LocalStore;
    use jet_crash::sim::{PositionState, format_multiplier};
    use jet_crash::{LocalWallet, Round, RoundConfig, RoundEvent, RoundPhase, SlotId, Wallet, tick};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let rounds: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(10);
    let config = match args.next() {
        Some(path) => match RoundConfig::load(std::path::Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => RoundConfig::default(),
    };
    let seed = std::env::var("JET_CRASH_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);

    log::info!("Jet Crash (native) starting, seed {}, {} rounds", seed, rounds);

    let mut wallet = match std::env::var("JET_CRASH_CACHE") {
        Ok(dir) => LocalWallet::load(LocalStore::new(dir), config.history_capacity),
        Err(_) => LocalWallet::new(DEFAULT_BALANCE).with_history_capacity(config.history_capacity),
    };
    let mut round = match Round::new(config, seed) {
        Ok(round) => round,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let mut crowd = Crowd::new(seed.rotate_left(17));

    // Slot A rides an auto target, slot B bails out by hand at 1.5x
    const A: SlotId = SlotId(0);
    const B: SlotId = SlotId(1);
    const MANUAL_EXIT: f64 = 1.5;
    if let Err(e) = round.set_auto_target(A, Some(2.0)) {
        log::warn!("{}", e);
    }

    let frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;
    let mut finished = 0;
    while finished < rounds {
        if round.phase() == RoundPhase::Waiting {
            for (slot, stake) in [(A, 100.0), (B, 50.0)] {
                if round.position(slot).is_some_and(|p| p.state == PositionState::Idle) {
                    if let Err(e) = round.place(slot, stake, &mut wallet) {
                        log::debug!("Slot {} sits out: {}", slot, e);
                    }
                }
            }
        }
        if round.phase() == RoundPhase::Running && round.current_multiplier() >= MANUAL_EXIT {
            if let Err(e) = round.cash_out(B, &mut wallet) {
                let state = round.position(B).map_or("missing", |p| p.state.as_str());
                log::debug!("Slot {} stays {}: {}", B, state, e);
            }
        }

        if let Err(e) = tick(&mut round, now, &mut wallet) {
            log::error!("Round halted: {}", e);
            std::process::exit(1);
        }
        now += frame_ms;

        for event in round.drain_events() {
            crowd.observe(&event);
            match event {
                RoundEvent::RoundStarted { round_id } => {
                    log::debug!("Round {} {}", round_id, round.phase().as_str())
                }
                RoundEvent::PositionSettled { slot, settlement } => println!(
                    "  slot {} {:?} at {} -> {:.2}",
                    slot,
                    settlement.result(),
                    format_multiplier(settlement.outcome_multiplier()),
                    settlement.payout()
                ),
                RoundEvent::RoundCrashed { round_id, threshold } => {
                    let crowd_winners = crowd.top().len();
                    println!(
                        "Round {:>3} crashed at {:>8}  balance {:.2}  ({} of {} crowd bets won)",
                        round_id,
                        format_multiplier(threshold),
                        wallet.balance(),
                        crowd_winners,
                        crowd.rows().len()
                    );
                    finished += 1;
                }
            }
        }
    }

    println!("\nRecent crashes: {:?}", wallet.history());
    if let Some(best) = round.ledger().best().first() {
        println!(
            "Best win: {:.2} at {} (round {})",
            best.payout(),
            format_multiplier(best.outcome_multiplier()),
            best.round_id()
        );
    }
    println!("Final balance: {:.2}", wallet.balance());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
