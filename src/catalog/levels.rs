//! Campaign levels and the unlock/star rules

use serde::{Deserialize, Serialize};

use super::rng::SeededGenerator;
use crate::consts::*;
use crate::icons::Icon;

/// Which minigame a level plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Pair matching
    Memory,
    /// Visual search
    Attention,
}

impl GameMode {
    /// Odd ids are memory levels, even ids attention levels
    pub fn for_level(id: u32) -> Self {
        if id % 2 == 1 {
            GameMode::Memory
        } else {
            GameMode::Attention
        }
    }

    /// Icons a freshly generated level of this mode stores
    pub fn icon_count(&self) -> usize {
        match self {
            GameMode::Memory => MEMORY_PAIRS,
            GameMode::Attention => ATTENTION_LEVEL_ICONS,
        }
    }
}

/// One campaign level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// 1..=30, contiguous
    pub id: u32,
    pub mode: GameMode,
    /// 1..=5
    pub difficulty: u8,
    /// Persisted as `timeLimit`
    #[serde(rename = "timeLimit")]
    pub time_limit_secs: u32,
    pub grid_size: u32,
    /// Shuffled icon subset, in shuffle order
    pub icons: Vec<Icon>,
    pub is_unlocked: bool,
    pub is_completed: bool,
    /// 0..=3, never decreases
    pub stars: u8,
}

/// Difficulty step for a level id
pub fn difficulty_for(id: u32) -> u8 {
    (id.saturating_sub(1) / LEVELS_PER_DIFFICULTY + 1) as u8
}

/// Build the 30-level campaign for a nickname.
///
/// One generator is threaded through all levels, so level N's icon shuffle
/// continues the sequence left by level N-1.
pub fn generate_levels(nickname: &str) -> Vec<Level> {
    let mut rng = SeededGenerator::from_name(nickname);
    log::info!(
        "Generating campaign for {:?} (seed {})",
        nickname,
        super::rng::name_seed(nickname)
    );

    (1..=LEVEL_COUNT)
        .map(|id| {
            let mode = GameMode::for_level(id);
            let mut icons = rng.shuffle(&Icon::ALL);
            icons.truncate(mode.icon_count());

            Level {
                id,
                mode,
                difficulty: difficulty_for(id),
                time_limit_secs: LEVEL_TIME_LIMIT_SECS,
                grid_size: GRID_SIZE,
                icons,
                is_unlocked: id == 1,
                is_completed: false,
                stars: 0,
            }
        })
        .collect()
}

/// Merge a finished attempt into the level list.
///
/// On success the level is marked completed and keeps the better star count,
/// and the next level unlocks. A failure changes nothing. Unlocks are never
/// revoked.
pub fn apply_completion(
    levels: &[Level],
    level_id: u32,
    success: bool,
    stars_earned: u8,
) -> Vec<Level> {
    let stars_earned = stars_earned.min(MAX_STARS);
    levels
        .iter()
        .map(|level| {
            let mut level = level.clone();
            if success {
                if level.id == level_id {
                    level.is_completed = true;
                    level.stars = level.stars.max(stars_earned);
                } else if level_id.checked_add(1) == Some(level.id) {
                    level.is_unlocked = true;
                }
            }
            level
        })
        .collect()
}

/// Look up a playable level. Locked and unknown ids return `None`.
pub fn select_level(levels: &[Level], level_id: u32) -> Option<&Level> {
    levels.iter().find(|l| l.id == level_id && l.is_unlocked)
}

/// Number of completed levels
pub fn completed_count(levels: &[Level]) -> u32 {
    levels.iter().filter(|l| l.is_completed).count() as u32
}

/// Force every level to the canonical time limit.
///
/// Returns whether any stored value differed.
pub fn normalize_time_limits(levels: &mut [Level]) -> bool {
    let mut changed = false;
    for level in levels.iter_mut() {
        if level.time_limit_secs != LEVEL_TIME_LIMIT_SECS {
            level.time_limit_secs = LEVEL_TIME_LIMIT_SECS;
            changed = true;
        }
    }
    changed
}
