//! Player profile and the `GameStats` aggregate
//!
//! `GameStats` is the single writable copy of the player's progress during a
//! session. Every transition here takes `&self` and returns a new aggregate;
//! the caller replaces its copy and hands the result to the progress store.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, GameMode, Level};
use crate::league::{LEAGUES, LeagueStanding, lookup_league};

/// Avatar used until the player picks one
pub const DEFAULT_AVATAR: &str = "🎮";

/// Avatars offered by the profile editor
pub const AVATAR_OPTIONS: [&str; 15] = [
    "🎮", "⚽", "🏀", "🎾", "🏈", "🏐", "🏓", "🏸", "🥊", "🏆", "⭐", "🔥", "💪", "🎯", "🚀",
];

/// Player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub nickname: String,
    pub avatar: String,
    /// Mirrors the number of completed levels
    pub completed_levels: u32,
    pub wins: u32,
    pub losses: u32,
    /// Best infinite memory run
    pub memory_score: u32,
    /// Best infinite attention run
    pub attention_score: u32,
    pub league: String,
    pub league_progress: f64,
}

impl UserProfile {
    /// Fresh profile with zeroed counters in the base league
    pub fn new(nickname: &str) -> Self {
        Self {
            nickname: nickname.to_string(),
            avatar: DEFAULT_AVATAR.to_string(),
            completed_levels: 0,
            wins: 0,
            losses: 0,
            memory_score: 0,
            attention_score: 0,
            league: LEAGUES[0].name.to_string(),
            league_progress: 0.0,
        }
    }

    pub fn total_points(&self) -> u32 {
        self.memory_score.saturating_add(self.attention_score)
    }

    pub fn standing(&self) -> LeagueStanding {
        lookup_league(self.total_points())
    }

    /// Percentage of campaign attempts won, 0 before the first attempt
    pub fn win_rate(&self) -> f64 {
        let games = f64::from(self.wins) + f64::from(self.losses);
        if games == 0.0 {
            0.0
        } else {
            f64::from(self.wins) / games * 100.0
        }
    }

    /// Best infinite score for a mode
    pub fn best_score(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Memory => self.memory_score,
            GameMode::Attention => self.attention_score,
        }
    }

    /// Recompute the stored league fields from the scores
    fn refresh_league(&mut self) {
        let standing = self.standing();
        self.league = standing.name.to_string();
        self.league_progress = standing.progress;
    }
}

/// Everything the player has: campaign, profile and the level pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub current_level: u32,
    pub profile: UserProfile,
    pub levels: Vec<Level>,
}

impl GameStats {
    /// Fold a finished campaign attempt into the aggregate.
    ///
    /// Applies the unlock/star rule, bumps wins or losses exactly once, and
    /// resyncs `completed_levels`.
    pub fn with_level_result(&self, level_id: u32, success: bool, stars: u8) -> GameStats {
        let levels = catalog::apply_completion(&self.levels, level_id, success, stars);
        let mut profile = self.profile.clone();
        profile.completed_levels = catalog::completed_count(&levels);
        if success {
            profile.wins = profile.wins.saturating_add(1);
        } else {
            profile.losses = profile.losses.saturating_add(1);
        }

        GameStats {
            current_level: self.current_level,
            profile,
            levels,
        }
    }

    /// Raise the mode's best score if `score` beats it
    pub fn with_infinite_score(&self, mode: GameMode, score: u32) -> GameStats {
        let mut next = self.clone();
        if score <= self.profile.best_score(mode) {
            return next;
        }
        match mode {
            GameMode::Memory => next.profile.memory_score = score,
            GameMode::Attention => next.profile.attention_score = score,
        }
        next.profile.refresh_league();
        next
    }

    /// Rename and/or change avatar. The campaign keeps its original seed.
    /// An avatar outside `AVATAR_OPTIONS` is ignored.
    pub fn with_profile_edit(&self, nickname: &str, avatar: &str) -> GameStats {
        let mut next = self.clone();
        next.profile.nickname = nickname.to_string();
        if AVATAR_OPTIONS.contains(&avatar) {
            next.profile.avatar = avatar.to_string();
        } else {
            log::warn!("Ignoring unknown avatar {avatar:?}");
        }
        next
    }

    /// Point at a level. Ignored unless the level is unlocked.
    pub fn with_current_level(&self, level_id: u32) -> GameStats {
        let mut next = self.clone();
        if catalog::select_level(&self.levels, level_id).is_some() {
            next.current_level = level_id;
        }
        next
    }

    /// Bring derived profile fields in line with the levels and scores
    pub fn resynced(mut self) -> GameStats {
        self.profile.completed_levels = catalog::completed_count(&self.levels);
        self.profile.refresh_league();
        self
    }
}
