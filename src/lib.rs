//! SportMind - cognitive training core
//!
//! Core modules:
//! - `catalog`: Deterministic seeded campaign generation and unlock/star rules
//! - `sim`: Matching and visual-search minigame state machines
//! - `persistence`: Key-value stores and the progress store
//! - `league`: Point thresholds for the league tiers
//! - `profile`: Player profile and the `GameStats` aggregate
//! - `tuning`: Data-driven delays and failure caps
//! - `web`: JSON bindings for the browser build (wasm32 only)

pub mod catalog;
pub mod highscores;
pub mod icons;
pub mod league;
pub mod persistence;
pub mod profile;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::{GameMode, Level, SeededGenerator, apply_completion, generate_levels};
pub use highscores::HighScores;
pub use icons::Icon;
pub use league::{League, LeagueStanding, lookup_league};
pub use persistence::{KeyValueStore, MemoryStore, ProgressStore, StoreError};
pub use profile::{GameStats, UserProfile};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Number of levels in the campaign
    pub const LEVEL_COUNT: u32 = 30;
    /// Levels sharing one difficulty step (difficulty 1..=5)
    pub const LEVELS_PER_DIFFICULTY: u32 = 6;
    /// Canonical time limit for every campaign level. Older saves carry 120/60.
    pub const LEVEL_TIME_LIMIT_SECS: u32 = 180;

    /// Side of the campaign grid (both modes)
    pub const GRID_SIZE: u32 = 6;
    /// Largest grid side the infinite search mode grows to
    pub const MAX_GRID_SIZE: u32 = 8;

    /// Pairs on a full 6x6 memory board
    pub const MEMORY_PAIRS: usize = 18;
    /// Pairs on the first infinite memory stage is this plus the stage number
    pub const BASE_INFINITE_PAIRS: usize = 12;
    /// Icons stored on an attention level
    pub const ATTENTION_LEVEL_ICONS: usize = 20;
    /// Distinct icons used to fill a search grid
    pub const SEARCH_POOL_SIZE: usize = 15;
    /// Targets hidden on a campaign search grid
    pub const SEARCH_TARGETS: u32 = 5;
    /// Base targets on an infinite search stage (grows every two stages)
    pub const BASE_INFINITE_TARGETS: u32 = 3;
    /// Cap on targets per infinite search stage
    pub const MAX_SEARCH_TARGETS: u32 = 8;

    /// Stars are capped at this value
    pub const MAX_STARS: u8 = 3;
}
