//! SportMind entry point
//!
//! Native builds print a player's campaign from a data directory, or play
//! scripted demo runs of every minigame. The browser build is driven from
//! JavaScript through the library's bindings.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use sportmind::consts::*;
    use sportmind::persistence::FileStore;
    use sportmind::sim::{
        GameConfig, GameResult, MatchPhase, MatchingGame, Minigame, SearchGame, SearchPhase,
    };
    use sportmind::{GameMode, GameStats, MemoryStore, ProgressStore, Tuning};

    const DEFAULT_DATA_DIR: &str = "sportmind-data";
    /// Stages the demo player clears before quitting an infinite run
    const DEMO_STAGES: u32 = 3;
    /// Clock step while waiting on a delayed transition
    const WAIT_STEP_MS: u64 = 100;

    fn usage() -> ExitCode {
        eprintln!("Usage: sportmind <nickname> [data-dir]");
        eprintln!("       sportmind --demo");
        ExitCode::from(2)
    }

    pub fn run() -> ExitCode {
        let args: Vec<String> = std::env::args().skip(1).collect();
        match args.as_slice() {
            [flag] if flag == "--demo" => {
                demo();
                ExitCode::SUCCESS
            }
            [flag, ..] if flag.starts_with('-') => usage(),
            [nickname] => show(nickname, PathBuf::from(DEFAULT_DATA_DIR)),
            [nickname, dir] => show(nickname, PathBuf::from(dir)),
            _ => usage(),
        }
    }

    /// Print the stored progress for a player
    fn show(nickname: &str, data_dir: PathBuf) -> ExitCode {
        let store = match FileStore::open(data_dir) {
            Ok(store) => store,
            Err(err) => {
                log::error!("Cannot open data directory: {err}");
                return ExitCode::FAILURE;
            }
        };
        let mut progress = ProgressStore::new(store);
        let stats = progress.initialize(nickname);
        print_stats(&stats);

        let scores = progress.high_scores();
        println!(
            "High scores: memory {}, attention {}",
            scores.memory, scores.attention
        );
        ExitCode::SUCCESS
    }

    fn print_stats(stats: &GameStats) {
        let profile = &stats.profile;
        let standing = profile.standing();
        println!("{} {}", profile.avatar, profile.nickname);
        println!(
            "League: {} ({:.0}%{})",
            standing.name,
            standing.progress,
            match standing.points_to_next {
                Some(points) => format!(", {points} points to next"),
                None => String::new(),
            }
        );
        println!(
            "Completed {}/{} | wins {} losses {} ({:.0}% win rate)",
            profile.completed_levels,
            LEVEL_COUNT,
            profile.wins,
            profile.losses,
            profile.win_rate()
        );
        println!("Current level: {}", stats.current_level);
        println!();

        for level in &stats.levels {
            let state = if level.is_completed {
                "*".repeat(usize::from(level.stars))
            } else if level.is_unlocked {
                "open".to_string()
            } else {
                "locked".to_string()
            };
            let icons: Vec<&str> = level.icons.iter().map(|i| i.name()).collect();
            println!(
                "{:>2} {:<9} d{} {:<6} {}",
                level.id,
                format!("{:?}", level.mode),
                level.difficulty,
                state,
                icons.join(" ")
            );
        }
    }

    /// Matching player with perfect recall. Quits unbounded runs after
    /// `stages` cleared boards.
    fn play_matching(game: &mut MatchingGame, stages: u32) -> Option<GameResult> {
        loop {
            match game.phase() {
                MatchPhase::Completed => return game.result(),
                MatchPhase::Playing
                    if game.move_cap().is_some() && game.stage_score() >= stages =>
                {
                    return game.quit();
                }
                MatchPhase::Playing => {
                    let cards = game.cards();
                    let first = cards.iter().position(|c| !c.matched)?;
                    let second = (first + 1..cards.len())
                        .find(|&j| cards[j].pair == cards[first].pair)?;
                    game.handle_select(first);
                    if let Some(result) = game.handle_select(second) {
                        return Some(result);
                    }
                }
                _ => {
                    if let Some(result) = game.tick(WAIT_STEP_MS) {
                        return Some(result);
                    }
                }
            }
        }
    }

    /// Search player that never misses
    fn play_search(game: &mut SearchGame, stages: u32) -> Option<GameResult> {
        loop {
            match game.phase() {
                SearchPhase::Completed => return game.result(),
                SearchPhase::Playing
                    if game.wrong_click_cap().is_some() && game.stage_score() >= stages =>
                {
                    return game.quit();
                }
                SearchPhase::Playing => {
                    let hit = game.cells().iter().position(|c| c.is_target && !c.found)?;
                    if let Some(result) = game.handle_select(hit) {
                        return Some(result);
                    }
                }
                SearchPhase::StageClear => {
                    if let Some(result) = game.tick(WAIT_STEP_MS) {
                        return Some(result);
                    }
                }
            }
        }
    }

    fn demo() {
        let mut progress = ProgressStore::new(MemoryStore::new());
        let mut stats = progress.initialize("Demo");
        let tuning = Tuning::default();

        for id in 1..=2 {
            let Some(level) = stats.levels.iter().find(|l| l.id == id).cloned() else {
                continue;
            };
            let config = GameConfig::level(&level, u64::from(id)).with_tuning(tuning.clone());
            let result = match level.mode {
                GameMode::Memory => play_matching(&mut MatchingGame::start(config), 0),
                GameMode::Attention => play_search(&mut SearchGame::start(config), 0),
            };
            println!("Level {id} ({:?}): {result:?}", level.mode);
            if let Some(GameResult::Level { success, stars }) = result {
                stats = progress.apply_completion(&stats, id, success, stars);
            }
        }

        for mode in [GameMode::Memory, GameMode::Attention] {
            let config = GameConfig::infinite(7).with_tuning(tuning.clone());
            let result = match mode {
                GameMode::Memory => play_matching(&mut MatchingGame::start(config), DEMO_STAGES),
                GameMode::Attention => play_search(&mut SearchGame::start(config), DEMO_STAGES),
            };
            println!("Infinite {mode:?}: {result:?}");
            if let Some(GameResult::Infinite { stage_score }) = result {
                let (next, new_record) = progress.record_infinite_score(&stats, mode, stage_score);
                stats = next;
                if new_record {
                    println!("  new high score!");
                }
            }
        }

        println!();
        print_stats(&stats);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point lives in the library (`web::start`)
}
