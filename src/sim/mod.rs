//! Minigame simulation module
//!
//! Both minigames are event-driven state machines:
//! - Clicks arrive through `handle_select`
//! - Time only moves through `tick`, on a logical millisecond clock
//! - Delayed transitions live on the engine's own [`Timeline`]
//! - Randomness comes from a seeded PCG, so a seed replays a run exactly

pub mod matching;
pub mod search;
pub mod timeline;

use serde::Serialize;

use crate::catalog::{GameMode, Level};
use crate::icons::Icon;
use crate::tuning::Tuning;

pub use matching::{Card, MatchPhase, MatchingGame, infinite_pair_count};
pub use search::{Cell, SearchGame, SearchPhase, stage_grid_size, stage_target_count};
pub use timeline::{LevelClock, Timeline};

/// What a finished game reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameResult {
    /// Campaign level finished, by completion or timeout
    #[serde(rename_all = "camelCase")]
    Level { success: bool, stars: u8 },
    /// Infinite run ended, by hitting its cap or quitting
    #[serde(rename_all = "camelCase")]
    Infinite { stage_score: u32 },
}

/// Feedback for the view layer, drained after each call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GameEvent {
    StageStarted { stage: u32 },
    PreviewEnded,
    CardFlipped { card: usize },
    CardsMatched { first: usize, second: usize },
    CardsMismatched { first: usize, second: usize },
    TargetFound { cell: usize, found: u32 },
    WrongClick { cell: usize, strikes: u32 },
    StageCleared { stage: u32, score: u32 },
    TimeUp,
    /// Infinite failure cap (moves or wrong clicks) reached
    CapReached,
    Finished { result: GameResult },
}

/// Fixed level or endless stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Variant {
    #[serde(rename_all = "camelCase")]
    Bounded { level_id: u32 },
    Unbounded,
}

/// What to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Course {
    Level {
        level_id: u32,
        icons: Vec<Icon>,
        time_limit_secs: u32,
    },
    Infinite,
}

/// Everything an engine needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub course: Course,
    pub seed: u64,
    pub tuning: Tuning,
}

impl GameConfig {
    pub fn level(level: &Level, seed: u64) -> Self {
        Self {
            course: Course::Level {
                level_id: level.id,
                icons: level.icons.clone(),
                time_limit_secs: level.time_limit_secs,
            },
            seed,
            tuning: Tuning::default(),
        }
    }

    pub fn infinite(seed: u64) -> Self {
        Self {
            course: Course::Infinite,
            seed,
            tuning: Tuning::default(),
        }
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }
}

/// Contract shared by both engines
pub trait Minigame {
    fn mode(&self) -> GameMode;

    fn variant(&self) -> Variant;

    /// Click a card or cell by index. Invalid clicks are ignored.
    fn handle_select(&mut self, index: usize) -> Option<GameResult>;

    /// Advance the logical clock, firing due transitions
    fn tick(&mut self, dt_ms: u64) -> Option<GameResult>;

    /// Leave the game. Infinite runs report their score; an abandoned level
    /// reports nothing.
    fn quit(&mut self) -> Option<GameResult>;

    fn is_finished(&self) -> bool;

    /// Result of the finished game, if it produced one
    fn result(&self) -> Option<GameResult>;

    fn drain_events(&mut self) -> Vec<GameEvent>;
}

/// Start the engine for a campaign level's mode
pub fn start_level(level: &Level, seed: u64, tuning: Tuning) -> Box<dyn Minigame> {
    let config = GameConfig::level(level, seed).with_tuning(tuning);
    match level.mode {
        GameMode::Memory => Box::new(MatchingGame::start(config)),
        GameMode::Attention => Box::new(SearchGame::start(config)),
    }
}

/// Start an infinite run of a mode
pub fn start_infinite(mode: GameMode, seed: u64, tuning: Tuning) -> Box<dyn Minigame> {
    let config = GameConfig::infinite(seed).with_tuning(tuning);
    match mode {
        GameMode::Memory => Box::new(MatchingGame::start(config)),
        GameMode::Attention => Box::new(SearchGame::start(config)),
    }
}
