//! Browser bindings
//!
//! The view layer talks to the core in JSON strings. Progress is kept in the
//! window's LocalStorage under the same keys the native store uses.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::catalog::{self, GameMode, Level};
use crate::league;
use crate::persistence::{LocalStorage, ProgressStore};
use crate::profile::GameStats;
use crate::sim::{GameConfig, MatchingGame, Minigame, SearchGame};
use crate::tuning::Tuning;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js)
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(to_js)
}

fn parse_mode(mode: &str) -> Result<GameMode, JsValue> {
    match mode {
        "memory" => Ok(GameMode::Memory),
        "attention" => Ok(GameMode::Attention),
        other => Err(JsValue::from_str(&format!("unknown mode: {other}"))),
    }
}

fn progress() -> Result<ProgressStore<LocalStorage>, JsValue> {
    LocalStorage::open().map(ProgressStore::new).map_err(to_js)
}

/// Seed from the caller, or from the wall clock
fn seed_or_now(seed: Option<f64>) -> u64 {
    seed.unwrap_or_else(js_sys::Date::now) as u64
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&to_js(err));
    }
    log::info!("SportMind core loaded");
}

/// Load (or create) the player's progress. Returns `GameStats` JSON.
#[wasm_bindgen]
pub fn initialize(nickname: &str) -> Result<String, JsValue> {
    let stats = progress()?.initialize(nickname);
    to_json(&stats)
}

/// The campaign a nickname would get, without touching storage
#[wasm_bindgen]
pub fn generate_levels(nickname: &str) -> Result<String, JsValue> {
    to_json(&catalog::generate_levels(nickname))
}

/// Fold a finished level into `stats_json` and persist it
#[wasm_bindgen]
pub fn apply_completion(
    stats_json: &str,
    level_id: u32,
    success: bool,
    stars: u8,
) -> Result<String, JsValue> {
    let stats: GameStats = from_json(stats_json)?;
    let next = progress()?.apply_completion(&stats, level_id, success, stars);
    to_json(&next)
}

#[wasm_bindgen]
pub fn lookup_league(total_points: u32) -> Result<String, JsValue> {
    to_json(&league::lookup_league(total_points))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfiniteOutcome {
    stats: GameStats,
    new_record: bool,
}

/// Record an infinite run. Returns `{ stats, newRecord }`.
#[wasm_bindgen]
pub fn record_infinite_score(stats_json: &str, mode: &str, score: u32) -> Result<String, JsValue> {
    let stats: GameStats = from_json(stats_json)?;
    let (stats, new_record) = progress()?.record_infinite_score(&stats, parse_mode(mode)?, score);
    to_json(&InfiniteOutcome { stats, new_record })
}

#[wasm_bindgen]
pub fn update_profile(stats_json: &str, nickname: &str, avatar: &str) -> Result<String, JsValue> {
    let stats: GameStats = from_json(stats_json)?;
    to_json(&progress()?.update_profile(&stats, nickname, avatar))
}

/// Point at a level. Returns `null` for locked levels.
#[wasm_bindgen]
pub fn select_level(stats_json: &str, level_id: u32) -> Result<String, JsValue> {
    let stats: GameStats = from_json(stats_json)?;
    to_json(&progress()?.select_level(&stats, level_id))
}

enum Engine {
    Matching(MatchingGame),
    Search(SearchGame),
}

/// A running minigame owned by the page
#[wasm_bindgen]
pub struct GameHandle {
    engine: Engine,
}

impl GameHandle {
    fn game(&mut self) -> &mut dyn Minigame {
        match &mut self.engine {
            Engine::Matching(game) => game,
            Engine::Search(game) => game,
        }
    }
}

#[wasm_bindgen]
impl GameHandle {
    /// Start a campaign level from its JSON
    #[wasm_bindgen(js_name = startLevel)]
    pub fn start_level(
        level_json: &str,
        seed: Option<f64>,
        tuning_json: Option<String>,
    ) -> Result<GameHandle, JsValue> {
        let level: Level = from_json(level_json)?;
        let config = GameConfig::level(&level, seed_or_now(seed))
            .with_tuning(tuning_json.map(|t| Tuning::from_json(&t)).unwrap_or_default());
        let engine = match level.mode {
            GameMode::Memory => Engine::Matching(MatchingGame::start(config)),
            GameMode::Attention => Engine::Search(SearchGame::start(config)),
        };
        Ok(GameHandle { engine })
    }

    /// Start an infinite run of `"memory"` or `"attention"`
    #[wasm_bindgen(js_name = startInfinite)]
    pub fn start_infinite(
        mode: &str,
        seed: Option<f64>,
        tuning_json: Option<String>,
    ) -> Result<GameHandle, JsValue> {
        let config = GameConfig::infinite(seed_or_now(seed))
            .with_tuning(tuning_json.map(|t| Tuning::from_json(&t)).unwrap_or_default());
        let engine = match parse_mode(mode)? {
            GameMode::Memory => Engine::Matching(MatchingGame::start(config)),
            GameMode::Attention => Engine::Search(SearchGame::start(config)),
        };
        Ok(GameHandle { engine })
    }

    /// Click a card or cell. Returns the result JSON if this ended the game.
    pub fn select(&mut self, index: usize) -> Result<Option<String>, JsValue> {
        self.game().handle_select(index).map(|r| to_json(&r)).transpose()
    }

    /// Advance the clock by `dt_ms`. Returns the result JSON if the game ended.
    pub fn tick(&mut self, dt_ms: f64) -> Result<Option<String>, JsValue> {
        self.game().tick(dt_ms.max(0.0) as u64).map(|r| to_json(&r)).transpose()
    }

    pub fn quit(&mut self) -> Result<Option<String>, JsValue> {
        self.game().quit().map(|r| to_json(&r)).transpose()
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&mut self) -> bool {
        self.game().is_finished()
    }

    /// Feedback events since the last call, as a JSON array
    pub fn events(&mut self) -> Result<String, JsValue> {
        to_json(&self.game().drain_events())
    }

    /// Board state for rendering
    pub fn state(&self) -> Result<String, JsValue> {
        match &self.engine {
            Engine::Matching(game) => to_json(game),
            Engine::Search(game) => to_json(game),
        }
    }
}
