//! Campaign progression through the progress store

use sportmind::catalog::{GameMode, generate_levels, select_level};
use sportmind::persistence::{CURRENT_LEVEL_KEY, LEVELS_KEY, PROFILE_KEY};
use sportmind::{KeyValueStore, MemoryStore, ProgressStore, lookup_league};

#[test]
fn full_campaign_run() {
    let mut progress = ProgressStore::new(MemoryStore::new());
    let mut stats = progress.initialize("Ada");
    assert_eq!(stats.levels.len(), 30);
    assert_eq!(stats.levels.iter().filter(|l| l.is_unlocked).count(), 1);

    // Fail level 1 once, then clear every level in order
    stats = progress.apply_completion(&stats, 1, false, 0);
    assert!(!stats.levels[1].is_unlocked);

    for id in 1..=30 {
        stats = progress
            .select_level(&stats, id)
            .expect("next level should be unlocked");
        let stars = (id % 3 + 1) as u8;
        stats = progress.apply_completion(&stats, id, true, stars);
    }

    assert!(stats.levels.iter().all(|l| l.is_unlocked && l.is_completed));
    assert_eq!(stats.profile.completed_levels, 30);
    assert_eq!(stats.profile.wins, 30);
    assert_eq!(stats.profile.losses, 1);
    assert_eq!(stats.current_level, 30);

    let reloaded = progress.initialize("Ada");
    assert_eq!(reloaded, stats);
}

#[test]
fn stars_never_drop_on_replay() {
    let mut progress = ProgressStore::new(MemoryStore::new());
    let stats = progress.initialize("Grace");
    let stats = progress.apply_completion(&stats, 1, true, 3);
    let stats = progress.apply_completion(&stats, 1, true, 1);
    let stats = progress.apply_completion(&stats, 1, false, 0);

    assert_eq!(stats.levels[0].stars, 3);
    assert!(stats.levels[0].is_completed);
    // Failing a replay does not relock the next level
    assert!(stats.levels[1].is_unlocked);
    assert_eq!((stats.profile.wins, stats.profile.losses), (2, 1));
}

#[test]
fn locked_levels_cannot_be_selected() {
    let levels = generate_levels("Ada");
    assert!(select_level(&levels, 1).is_some());
    assert!(select_level(&levels, 2).is_none());
    assert!(select_level(&levels, 31).is_none());

    let mut progress = ProgressStore::new(MemoryStore::new());
    let stats = progress.initialize("Ada");
    assert!(progress.select_level(&stats, 5).is_none());
    assert!(progress.store().get(CURRENT_LEVEL_KEY).is_none());
}

#[test]
fn infinite_scores_drive_the_league() {
    let mut progress = ProgressStore::new(MemoryStore::new());
    let stats = progress.initialize("Ada");

    let (stats, record) = progress.record_infinite_score(&stats, GameMode::Memory, 12);
    assert!(record);
    let (stats, record) = progress.record_infinite_score(&stats, GameMode::Attention, 10);
    assert!(record);

    assert_eq!(stats.profile.total_points(), 22);
    assert_eq!(stats.profile.league, "Bronze");
    assert_eq!(stats.profile.league, lookup_league(22).name);
    assert!((stats.profile.league_progress - 10.0).abs() < 1e-9);
    // Infinite runs never count as campaign attempts
    assert_eq!(stats.profile.wins + stats.profile.losses, 0);

    let (stats, record) = progress.record_infinite_score(&stats, GameMode::Memory, 5);
    assert!(!record);
    assert_eq!(stats.profile.memory_score, 12);

    let reloaded = progress.initialize("Ada");
    assert_eq!(reloaded.profile, stats.profile);
    assert_eq!(progress.high_scores().memory, 12);
    assert_eq!(progress.high_scores().attention, 10);
}

#[test]
fn legacy_save_is_repaired() {
    let mut store = MemoryStore::new();
    let mut levels = generate_levels("Ada");
    for level in levels.iter_mut() {
        level.time_limit_secs = if level.id % 2 == 1 { 120 } else { 60 };
    }
    store
        .set(LEVELS_KEY, &serde_json::to_string(&levels).unwrap())
        .unwrap();
    store
        .set(PROFILE_KEY, r#"{"nickname":"Ada","avatar":"⚽","completedLevels":0,"wins":3,"losses":1,"memoryScore":0,"attentionScore":0,"league":"Plastic","leagueProgress":0}"#)
        .unwrap();

    let mut progress = ProgressStore::new(store);
    let stats = progress.initialize("Ada");
    assert!(stats.levels.iter().all(|l| l.time_limit_secs == 180));
    assert_eq!(stats.profile.avatar, "⚽");
    assert_eq!(stats.profile.wins, 3);

    let stored = progress.store().get(LEVELS_KEY).unwrap();
    assert!(stored.contains("\"timeLimit\":180"));
    assert!(!stored.contains("\"timeLimit\":120"));
}

#[test]
fn garbage_in_the_store_falls_back() {
    let mut store = MemoryStore::new();
    store.set(LEVELS_KEY, "not json at all").unwrap();
    store.set(PROFILE_KEY, "[]").unwrap();
    store.set(CURRENT_LEVEL_KEY, "-4").unwrap();

    let mut progress = ProgressStore::new(store);
    let stats = progress.initialize("Ada");
    assert_eq!(stats.levels, generate_levels("Ada"));
    assert_eq!(stats.profile.nickname, "Ada");
    assert_eq!(stats.current_level, 1);
}
