//! Typed progress persistence
//!
//! Every value is stored as JSON under a fixed key. Reads never fail: a
//! missing or malformed value falls back to the caller's default. Writes
//! happen immediately on every progress event; a failed write is logged and
//! the in-memory aggregate stays authoritative.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::StoreError;
use super::store::KeyValueStore;
use crate::catalog::{self, GameMode, Level};
use crate::consts::LEVEL_TIME_LIMIT_SECS;
use crate::highscores::HighScores;
use crate::profile::{GameStats, UserProfile};

pub const LEVELS_KEY: &str = "sm_levels";
pub const PROFILE_KEY: &str = "sm_profile";
pub const CURRENT_LEVEL_KEY: &str = "sm_current_level";

/// Progress persistence over a key-value backend
#[derive(Debug, Clone, Default)]
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Read `key`, or `default` when it is absent or does not parse
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(json) = self.store.get(key) else {
            return default;
        };
        match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Malformed value under {key} ({err}), using default");
                default
            }
        }
    }

    /// Replace the value under `key`
    pub fn save<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    /// Save, logging instead of failing
    fn persist<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(err) = self.save(key, value) {
            log::warn!("Could not save {key}: {err}");
        }
    }

    /// Assemble the session aggregate.
    ///
    /// Generates and stores the campaign on first launch. Older saves get
    /// their time limits forced to the canonical value, and are re-saved only
    /// when something actually changed.
    pub fn initialize(&mut self, nickname: &str) -> GameStats {
        let mut levels: Vec<Level> = self.load(LEVELS_KEY, Vec::new());
        if levels.is_empty() {
            levels = catalog::generate_levels(nickname);
            self.persist(LEVELS_KEY, &levels);
        } else if catalog::normalize_time_limits(&mut levels) {
            log::info!("Repaired level time limits to {LEVEL_TIME_LIMIT_SECS}s");
            self.persist(LEVELS_KEY, &levels);
        }

        let profile = self.load(PROFILE_KEY, UserProfile::new(nickname));
        let current_level = self.load(CURRENT_LEVEL_KEY, 1u32);

        GameStats {
            current_level,
            profile,
            levels,
        }
        .resynced()
    }

    /// Fold a finished campaign attempt in and save levels and profile
    pub fn apply_completion(
        &mut self,
        stats: &GameStats,
        level_id: u32,
        success: bool,
        stars: u8,
    ) -> GameStats {
        let next = stats.with_level_result(level_id, success, stars);
        self.persist(LEVELS_KEY, &next.levels);
        self.persist(PROFILE_KEY, &next.profile);
        next
    }

    /// Record a finished infinite run.
    ///
    /// Returns the new aggregate and whether the mode's stored high score was
    /// beaten.
    pub fn record_infinite_score(
        &mut self,
        stats: &GameStats,
        mode: GameMode,
        score: u32,
    ) -> (GameStats, bool) {
        let mut scores = self.high_scores();
        let new_record = scores.record(mode, score);
        if new_record {
            self.persist(HighScores::storage_key(mode), &scores.get(mode));
        }

        let next = stats.with_infinite_score(mode, score);
        self.persist(PROFILE_KEY, &next.profile);
        (next, new_record)
    }

    /// Change nickname and avatar. The campaign is kept as is.
    pub fn update_profile(&mut self, stats: &GameStats, nickname: &str, avatar: &str) -> GameStats {
        let next = stats.with_profile_edit(nickname, avatar);
        self.persist(PROFILE_KEY, &next.profile);
        next
    }

    /// Move the level pointer to an unlocked level. Locked or unknown ids
    /// return `None` and leave the store untouched.
    pub fn select_level(&mut self, stats: &GameStats, level_id: u32) -> Option<GameStats> {
        catalog::select_level(&stats.levels, level_id)?;
        let next = stats.with_current_level(level_id);
        self.persist(CURRENT_LEVEL_KEY, &next.current_level);
        Some(next)
    }

    /// Both stored high-score slots
    pub fn high_scores(&self) -> HighScores {
        HighScores {
            memory: self.load(HighScores::storage_key(GameMode::Memory), 0),
            attention: self.load(HighScores::storage_key(GameMode::Attention), 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn store() -> ProgressStore<MemoryStore> {
        ProgressStore::new(MemoryStore::new())
    }

    /// Backend whose writes always fail
    #[derive(Default)]
    struct ReadOnly(MemoryStore);

    impl KeyValueStore for ReadOnly {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_load_falls_back_on_missing_and_malformed() {
        let mut progress = store();
        assert_eq!(progress.load(CURRENT_LEVEL_KEY, 1u32), 1);
        progress.store.set(CURRENT_LEVEL_KEY, "\"seven\"").unwrap();
        assert_eq!(progress.load(CURRENT_LEVEL_KEY, 1u32), 1);
        progress.store.set(CURRENT_LEVEL_KEY, "7").unwrap();
        assert_eq!(progress.load(CURRENT_LEVEL_KEY, 1u32), 7);
    }

    #[test]
    fn test_first_launch_generates_and_persists() {
        let mut progress = store();
        let stats = progress.initialize("Ada");

        assert_eq!(stats.levels, catalog::generate_levels("Ada"));
        assert_eq!(stats.current_level, 1);
        assert_eq!(stats.profile, UserProfile::new("Ada"));
        assert!(progress.store().get(LEVELS_KEY).is_some());
        // Profile is only written on the first progress event
        assert!(progress.store().get(PROFILE_KEY).is_none());
    }

    #[test]
    fn test_existing_campaign_survives_nickname_change() {
        let mut progress = store();
        let first = progress.initialize("Ada");
        let again = progress.initialize("Grace");
        assert_eq!(first.levels, again.levels);
        assert_ne!(again.levels, catalog::generate_levels("Grace"));
    }

    #[test]
    fn test_time_limit_repair() {
        let mut progress = store();
        let mut levels = catalog::generate_levels("Ada");
        levels[0].time_limit_secs = 120;
        levels[1].time_limit_secs = 60;
        progress.save(LEVELS_KEY, &levels).unwrap();

        let stats = progress.initialize("Ada");
        assert!(stats.levels.iter().all(|l| l.time_limit_secs == 180));
        let stored: Vec<Level> = progress.load(LEVELS_KEY, Vec::new());
        assert_eq!(stored, stats.levels);
    }

    #[test]
    fn test_repair_skips_write_when_canonical() {
        let mut progress = store();
        // Pretty-printed, so any rewrite would show up
        let json = serde_json::to_string_pretty(&catalog::generate_levels("Ada")).unwrap();
        progress.store.set(LEVELS_KEY, &json).unwrap();
        let before = progress.store().get(LEVELS_KEY);

        progress.initialize("Ada");
        assert_eq!(progress.store().get(LEVELS_KEY), before);
    }

    #[test]
    fn test_unknown_icon_regenerates_campaign() {
        let mut progress = store();
        let json = serde_json::to_string(&catalog::generate_levels("Ada"))
            .unwrap()
            .replacen("\"Zap\"", "\"Kayak\"", 1);
        progress.store.set(LEVELS_KEY, &json).unwrap();

        let stats = progress.initialize("Ada");
        assert_eq!(stats.levels, catalog::generate_levels("Ada"));
    }

    #[test]
    fn test_malformed_profile_gets_default() {
        let mut progress = store();
        progress.store.set(PROFILE_KEY, "{\"nickname\": 5}").unwrap();
        let stats = progress.initialize("Ada");
        assert_eq!(stats.profile, UserProfile::new("Ada"));
    }

    #[test]
    fn test_completion_is_persisted() {
        let mut progress = store();
        let stats = progress.initialize("Ada");
        let stats = progress.apply_completion(&stats, 1, true, 2);

        let reloaded = progress.initialize("Ada");
        assert_eq!(reloaded, stats);
        assert!(reloaded.levels[1].is_unlocked);
        assert_eq!(reloaded.profile.wins, 1);
        assert_eq!(reloaded.profile.completed_levels, 1);
    }

    #[test]
    fn test_infinite_score_high_water() {
        let mut progress = store();
        let stats = progress.initialize("Ada");

        let (stats, record) = progress.record_infinite_score(&stats, GameMode::Memory, 4);
        assert!(record);
        let (stats, record) = progress.record_infinite_score(&stats, GameMode::Memory, 4);
        assert!(!record);
        let (stats, record) = progress.record_infinite_score(&stats, GameMode::Memory, 2);
        assert!(!record);

        assert_eq!(progress.high_scores().memory, 4);
        assert_eq!(progress.high_scores().attention, 0);
        assert_eq!(stats.profile.memory_score, 4);
        assert_eq!(stats.profile.wins + stats.profile.losses, 0);
        // Stored as a bare integer
        assert_eq!(progress.store().get("sm_memory_high_score").as_deref(), Some("4"));
    }

    #[test]
    fn test_huge_stored_scores_load() {
        let mut backend = MemoryStore::new();
        backend
            .set(
                PROFILE_KEY,
                r#"{"nickname":"Ada","avatar":"🎮","completedLevels":0,"wins":0,"losses":0,"memoryScore":4294967295,"attentionScore":1,"league":"Plastic","leagueProgress":0}"#,
            )
            .unwrap();

        let mut progress = ProgressStore::new(backend);
        let stats = progress.initialize("Ada");
        assert_eq!(stats.profile.total_points(), u32::MAX);
        assert_eq!(stats.profile.league, "Emerald");
    }

    #[test]
    fn test_record_matches_high_score_slots() {
        let mut backend = MemoryStore::new();
        backend.set("sm_attention_high_score", "7").unwrap();
        let mut progress = ProgressStore::new(backend);
        let stats = progress.initialize("Ada");

        let (stats, record) = progress.record_infinite_score(&stats, GameMode::Attention, 7);
        assert!(!record);
        assert!(progress.high_scores().qualifies(GameMode::Attention, 8));
        let (_, record) = progress.record_infinite_score(&stats, GameMode::Attention, 8);
        assert!(record);
        assert_eq!(progress.high_scores().attention, 8);
        assert_eq!(progress.store().get("sm_attention_high_score").as_deref(), Some("8"));
    }

    #[test]
    fn test_select_level() {
        let mut progress = store();
        let stats = progress.initialize("Ada");
        assert!(progress.select_level(&stats, 2).is_none());
        assert!(progress.store().get(CURRENT_LEVEL_KEY).is_none());

        let stats = progress.apply_completion(&stats, 1, true, 3);
        let stats = progress.select_level(&stats, 2).unwrap();
        assert_eq!(stats.current_level, 2);
        assert_eq!(progress.initialize("Ada").current_level, 2);
    }

    #[test]
    fn test_profile_edit_keeps_campaign() {
        let mut progress = store();
        let stats = progress.initialize("Ada");
        let edited = progress.update_profile(&stats, "Grace", "🚀");
        assert_eq!(edited.levels, stats.levels);

        let reloaded = progress.initialize("whoever");
        assert_eq!(reloaded.profile.nickname, "Grace");
        assert_eq!(reloaded.profile.avatar, "🚀");
    }

    #[test]
    fn test_write_failures_do_not_lose_the_aggregate() {
        let mut progress = ProgressStore::new(ReadOnly::default());
        let stats = progress.initialize("Ada");
        let next = progress.apply_completion(&stats, 1, false, 0);
        assert_eq!(next.profile.losses, 1);
        assert!(progress.save(PROFILE_KEY, &next.profile).is_err());
    }
}
