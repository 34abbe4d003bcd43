//! Browser bindings
//!
//! A thin handle the page drives from `requestAnimationFrame`. Rendering,
//! audio and DOM wiring stay on the JS side and read JSON snapshots.

use wasm_bindgen::prelude::*;

use crate::config::RoundConfig;
use crate::crowd::Crowd;
use crate::error::CrashError;
use crate::persistence::LocalStore;
use crate::sim::{Round, RoundEvent, SlotId, tick};
use crate::wallet::{LocalWallet, Wallet};

fn to_js(e: CrashError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Jet Crash core loaded");
}

/// Round, wallet and crowd bundled for the page
#[wasm_bindgen]
pub struct WebRound {
    round: Round,
    wallet: LocalWallet,
    crowd: Crowd,
    pending: Vec<RoundEvent>,
}

#[wasm_bindgen]
impl WebRound {
    /// Build from an optional JSON config; invalid configs are rejected
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, config_json: Option<String>) -> Result<WebRound, JsValue> {
        let config = match config_json {
            Some(json) => RoundConfig::from_json(&json).map_err(to_js)?,
            None => RoundConfig::default(),
        };
        let wallet = LocalWallet::load(LocalStore::browser(), config.history_capacity);
        let round = Round::new(config, seed).map_err(to_js)?;
        log::info!("Round engine ready (seed {})", seed);
        Ok(Self {
            round,
            wallet,
            crowd: Crowd::new(seed ^ 0xC0FF_EE00),
            pending: Vec::new(),
        })
    }

    /// Advance to `performance.now()`
    pub fn tick(&mut self, now_ms: f64) -> Result<(), JsValue> {
        tick(&mut self.round, now_ms, &mut self.wallet).map_err(to_js)?;
        self.forward_events();
        Ok(())
    }

    pub fn place(&mut self, slot: usize, stake: f64) -> Result<(), JsValue> {
        self.round
            .place(SlotId(slot), stake, &mut self.wallet)
            .map_err(to_js)
    }

    pub fn cancel(&mut self, slot: usize) -> Result<(), JsValue> {
        self.round.cancel(SlotId(slot), &mut self.wallet).map_err(to_js)
    }

    /// Returns the realized payout
    pub fn cash_out(&mut self, slot: usize) -> Result<f64, JsValue> {
        let settlement = self
            .round
            .cash_out(SlotId(slot), &mut self.wallet)
            .map_err(to_js)?;
        self.forward_events();
        Ok(settlement.payout())
    }

    pub fn set_auto_target(&mut self, slot: usize, target: Option<f64>) -> Result<(), JsValue> {
        self.round
            .set_auto_target(SlotId(slot), target)
            .map_err(to_js)
    }

    pub fn set_stake(&mut self, slot: usize, amount: f64) -> Result<(), JsValue> {
        self.round.set_stake(SlotId(slot), amount).map_err(to_js)
    }

    pub fn halve_stake(&mut self, slot: usize) -> Result<(), JsValue> {
        self.round.halve_stake(SlotId(slot)).map_err(to_js)
    }

    pub fn double_stake(&mut self, slot: usize) -> Result<(), JsValue> {
        self.round.double_stake(SlotId(slot)).map_err(to_js)
    }

    pub fn balance(&self) -> f64 {
        self.wallet.balance()
    }

    pub fn reset_balance(&mut self) {
        self.wallet.reset_balance();
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.round.snapshot()).unwrap_or_default()
    }

    /// Notifications since the last call
    pub fn events_json(&mut self) -> String {
        let events = std::mem::take(&mut self.pending);
        serde_json::to_string(&events).unwrap_or_default()
    }

    pub fn history_json(&self) -> String {
        serde_json::to_string(self.wallet.history()).unwrap_or_default()
    }

    pub fn ledger_json(&self) -> String {
        serde_json::to_string(self.round.ledger().entries()).unwrap_or_default()
    }

    pub fn best_json(&self) -> String {
        serde_json::to_string(&self.round.ledger().best()).unwrap_or_default()
    }

    pub fn crowd_json(&self) -> String {
        serde_json::to_string(self.crowd.rows()).unwrap_or_default()
    }

    pub fn crowd_top_json(&self) -> String {
        serde_json::to_string(&self.crowd.top()).unwrap_or_default()
    }
}

impl WebRound {
    fn forward_events(&mut self) {
        for event in self.round.drain_events() {
            self.crowd.observe(&event);
            self.pending.push(event);
        }
    }
}
