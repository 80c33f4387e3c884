//! Visual-search minigame
//!
//! A grid of icons hides several copies of one target icon. The bounded
//! variant is a timed 6x6 round rated with stars; the unbounded variant grows
//! the grid and the target count every stage and ends after too many wrong
//! clicks on a single stage.

use glam::UVec2;
use rand::seq::IndexedRandom;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::timeline::{LevelClock, Timeline};
use super::{Course, GameConfig, GameEvent, GameResult, Minigame, Variant};
use crate::catalog::GameMode;
use crate::consts::*;
use crate::icons::Icon;
use crate::tuning::Tuning;

/// Current phase of a search game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchPhase {
    Playing,
    /// Unbounded only: all targets found, next stage pending
    StageClear,
    Completed,
}

/// One grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub icon: Icon,
    /// (column, row)
    pub position: UVec2,
    pub is_target: bool,
    pub found: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchAction {
    NextStage,
}

/// Grid side on an unbounded stage
pub fn stage_grid_size(stage: u32) -> u32 {
    (GRID_SIZE + stage / 3).min(MAX_GRID_SIZE)
}

/// Targets to find on an unbounded stage
pub fn stage_target_count(stage: u32) -> u32 {
    (BASE_INFINITE_TARGETS + stage / 2).min(MAX_SEARCH_TARGETS)
}

/// Stars for a completed round
fn rate_round(remaining_secs: u32) -> u8 {
    let time_bonus = match remaining_secs {
        s if s > 30 => 2,
        s if s > 15 => 1,
        _ => 0,
    };
    (1 + time_bonus).min(MAX_STARS)
}

/// Lay out a `side`x`side` grid with `targets` copies of `target` at distinct
/// random cells and random non-target icons from `pool` everywhere else.
fn lay_out(side: u32, targets: u32, target: Icon, pool: &[Icon], rng: &mut Pcg32) -> Vec<Cell> {
    let total = (side * side) as usize;
    let mut is_target = vec![false; total];
    for idx in sample(rng, total, (targets as usize).min(total)) {
        is_target[idx] = true;
    }

    let mut fillers: Vec<Icon> = pool.iter().copied().filter(|&i| i != target).collect();
    if fillers.is_empty() {
        fillers = Icon::ALL.iter().copied().filter(|&i| i != target).collect();
    }

    (0..total)
        .map(|i| {
            let hit = is_target[i];
            let icon = if hit {
                target
            } else {
                fillers[rng.random_range(0..fillers.len())]
            };
            Cell {
                icon,
                position: UVec2::new(i as u32 % side, i as u32 / side),
                is_target: hit,
                found: false,
            }
        })
        .collect()
}

/// Search engine state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchGame {
    variant: Variant,
    phase: SearchPhase,
    grid_size: u32,
    cells: Vec<Cell>,
    target: Icon,
    found: u32,
    targets_needed: u32,
    /// Unbounded only, reset every stage
    wrong_clicks: u32,
    stage: u32,
    stage_score: u32,
    time_left_secs: Option<u32>,
    result: Option<GameResult>,
    /// Icons of the campaign level, empty when unbounded
    #[serde(skip)]
    level_pool: Vec<Icon>,
    #[serde(skip)]
    clock: Option<LevelClock>,
    #[serde(skip)]
    timeline: Timeline<SearchAction>,
    #[serde(skip)]
    tuning: Tuning,
    #[serde(skip)]
    rng: Pcg32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl SearchGame {
    /// Lay out the first grid. Search rounds have no preview and start in
    /// `Playing`.
    pub fn start(config: GameConfig) -> Self {
        let GameConfig { course, seed, tuning } = config;
        let mut game = Self {
            variant: Variant::Unbounded,
            phase: SearchPhase::Playing,
            grid_size: GRID_SIZE,
            cells: Vec::new(),
            target: Icon::ALL[0],
            found: 0,
            targets_needed: 0,
            wrong_clicks: 0,
            stage: 1,
            stage_score: 0,
            time_left_secs: None,
            result: None,
            level_pool: Vec::new(),
            clock: None,
            timeline: Timeline::new(),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };

        match course {
            Course::Level {
                level_id,
                icons,
                time_limit_secs,
            } => {
                game.variant = Variant::Bounded { level_id };
                let clock = LevelClock::starting_at(0, time_limit_secs);
                game.time_left_secs = Some(clock.remaining_secs(0));
                game.clock = Some(clock);
                game.level_pool = icons;
                game.lay_out_level();
            }
            Course::Infinite => game.lay_out_stage(),
        }
        game
    }

    fn lay_out_level(&mut self) {
        let mut pool: Vec<Icon> = self.level_pool.iter().copied().take(SEARCH_POOL_SIZE).collect();
        if pool.is_empty() {
            log::warn!("Level has no icons, searching the full catalog");
            pool = Icon::ALL.iter().copied().take(SEARCH_POOL_SIZE).collect();
        }

        self.grid_size = GRID_SIZE;
        self.targets_needed = SEARCH_TARGETS;
        self.target = *pool.choose(&mut self.rng).unwrap_or(&Icon::ALL[0]);
        self.cells = lay_out(GRID_SIZE, SEARCH_TARGETS, self.target, &pool, &mut self.rng);
    }

    fn lay_out_stage(&mut self) {
        let pool: Vec<Icon> = Icon::ALL
            .choose_multiple(&mut self.rng, SEARCH_POOL_SIZE)
            .copied()
            .collect();

        self.grid_size = stage_grid_size(self.stage);
        self.targets_needed = stage_target_count(self.stage);
        self.target = *pool.choose(&mut self.rng).unwrap_or(&Icon::ALL[0]);
        self.cells = lay_out(
            self.grid_size,
            self.targets_needed,
            self.target,
            &pool,
            &mut self.rng,
        );
        self.found = 0;
        self.wrong_clicks = 0;
        self.phase = SearchPhase::Playing;

        log::info!(
            "Search stage {}: {}x{} grid, {} targets",
            self.stage,
            self.grid_size,
            self.grid_size,
            self.targets_needed
        );
        self.events.push(GameEvent::StageStarted { stage: self.stage });
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn target(&self) -> Icon {
        self.target
    }

    pub fn found(&self) -> u32 {
        self.found
    }

    pub fn targets_needed(&self) -> u32 {
        self.targets_needed
    }

    pub fn wrong_clicks(&self) -> u32 {
        self.wrong_clicks
    }

    /// Wrong clicks that end an unbounded run
    pub fn wrong_click_cap(&self) -> Option<u32> {
        match self.variant {
            Variant::Unbounded => Some(self.tuning.wrong_click_cap),
            Variant::Bounded { .. } => None,
        }
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn stage_score(&self) -> u32 {
        self.stage_score
    }

    pub fn time_left_secs(&self) -> Option<u32> {
        self.time_left_secs
    }

    pub fn now_ms(&self) -> u64 {
        self.timeline.now_ms()
    }

    fn finish(&mut self, result: GameResult) -> Option<GameResult> {
        self.phase = SearchPhase::Completed;
        self.timeline.cancel_all();
        self.result = Some(result);
        log::info!("Search game finished: {:?}", result);
        self.events.push(GameEvent::Finished { result });
        Some(result)
    }

    fn all_found(&mut self) -> Option<GameResult> {
        match self.variant {
            Variant::Bounded { .. } => {
                let remaining = self
                    .clock
                    .map_or(0, |clock| clock.remaining_secs(self.now_ms()));
                let stars = rate_round(remaining);
                self.finish(GameResult::Level { success: true, stars })
            }
            Variant::Unbounded => {
                self.stage_score += 1;
                self.phase = SearchPhase::StageClear;
                self.events.push(GameEvent::StageCleared {
                    stage: self.stage,
                    score: self.stage_score,
                });
                self.timeline
                    .schedule(self.tuning.search_stage_clear_ms, SearchAction::NextStage);
                None
            }
        }
    }

    fn apply(&mut self, action: SearchAction) {
        match action {
            SearchAction::NextStage => {
                self.stage += 1;
                self.lay_out_stage();
            }
        }
    }
}

impl Minigame for SearchGame {
    fn mode(&self) -> GameMode {
        GameMode::Attention
    }

    fn variant(&self) -> Variant {
        self.variant
    }

    fn handle_select(&mut self, index: usize) -> Option<GameResult> {
        if self.phase != SearchPhase::Playing {
            return None;
        }
        let cell = self.cells.get_mut(index)?;
        if cell.found {
            return None;
        }

        if cell.is_target {
            cell.found = true;
            self.found += 1;
            log::debug!("Target {} found ({}/{})", index, self.found, self.targets_needed);
            self.events.push(GameEvent::TargetFound {
                cell: index,
                found: self.found,
            });
            if self.found >= self.targets_needed {
                return self.all_found();
            }
            return None;
        }

        // Bounded rounds ignore misses
        let cap = self.wrong_click_cap()?;
        self.wrong_clicks += 1;
        log::debug!("Wrong click on {} ({}/{})", index, self.wrong_clicks, cap);
        self.events.push(GameEvent::WrongClick {
            cell: index,
            strikes: self.wrong_clicks,
        });
        if self.wrong_clicks >= cap {
            self.events.push(GameEvent::CapReached);
            return self.finish(GameResult::Infinite {
                stage_score: self.stage_score,
            });
        }
        None
    }

    fn tick(&mut self, dt_ms: u64) -> Option<GameResult> {
        if self.phase == SearchPhase::Completed {
            return None;
        }
        let target = self.timeline.now_ms().saturating_add(dt_ms);
        while let Some(action) = self.timeline.pop_due(target) {
            self.apply(action);
        }
        self.timeline.advance_to(target);

        if let Some(clock) = self.clock {
            let now = self.timeline.now_ms();
            self.time_left_secs = Some(clock.remaining_secs(now));
            if clock.expired(now) {
                self.events.push(GameEvent::TimeUp);
                return self.finish(GameResult::Level {
                    success: false,
                    stars: 0,
                });
            }
        }
        None
    }

    fn quit(&mut self) -> Option<GameResult> {
        if self.phase == SearchPhase::Completed {
            return None;
        }
        match self.variant {
            Variant::Unbounded => self.finish(GameResult::Infinite {
                stage_score: self.stage_score,
            }),
            Variant::Bounded { level_id } => {
                log::info!("Level {} abandoned", level_id);
                self.phase = SearchPhase::Completed;
                self.timeline.cancel_all();
                None
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.phase == SearchPhase::Completed
    }

    fn result(&self) -> Option<GameResult> {
        self.result
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::generate_levels;

    fn level_game(seed: u64) -> SearchGame {
        let levels = generate_levels("Ada");
        SearchGame::start(GameConfig::level(&levels[1], seed))
    }

    fn targets(game: &SearchGame) -> Vec<usize> {
        (0..game.cells().len())
            .filter(|&i| game.cells()[i].is_target)
            .collect()
    }

    fn decoy(game: &SearchGame) -> usize {
        (0..game.cells().len())
            .find(|&i| !game.cells()[i].is_target)
            .unwrap()
    }

    #[test]
    fn test_level_grid_layout() {
        let game = level_game(1);
        let levels = generate_levels("Ada");
        let pool = &levels[1].icons[..15];

        assert_eq!(game.grid_size(), 6);
        assert_eq!(game.cells().len(), 36);
        assert_eq!(targets(&game).len(), 5);
        assert!(pool.contains(&game.target()));
        for cell in game.cells() {
            assert!(pool.contains(&cell.icon));
            // Only target cells carry the target icon
            assert_eq!(cell.icon == game.target(), cell.is_target);
        }
        assert_eq!(game.cells()[7].position, UVec2::new(1, 1));
        assert_eq!(game.cells()[35].position, UVec2::new(5, 5));
    }

    #[test]
    fn test_wrong_clicks_ignored_in_level() {
        let mut game = level_game(2);
        let miss = decoy(&game);
        for _ in 0..20 {
            assert_eq!(game.handle_select(miss), None);
        }
        assert_eq!(game.wrong_clicks(), 0);
        assert!(game.drain_events().is_empty());
        assert_eq!(game.phase(), SearchPhase::Playing);
    }

    #[test]
    fn test_found_cell_click_is_noop() {
        let mut game = level_game(3);
        let hit = targets(&game)[0];
        game.handle_select(hit);
        game.handle_select(hit);
        assert_eq!(game.found(), 1);
    }

    #[test]
    fn test_fast_round_earns_three_stars() {
        let mut game = level_game(4);
        game.tick(5_000);
        let mut result = None;
        for i in targets(&game) {
            result = game.handle_select(i);
        }
        assert_eq!(result, Some(GameResult::Level { success: true, stars: 3 }));
        assert!(game.is_finished());
    }

    #[test]
    fn test_star_thresholds() {
        assert_eq!(rate_round(180), 3);
        assert_eq!(rate_round(31), 3);
        assert_eq!(rate_round(30), 2);
        assert_eq!(rate_round(16), 2);
        assert_eq!(rate_round(15), 1);
        assert_eq!(rate_round(1), 1);
    }

    #[test]
    fn test_late_round_earns_one_star() {
        let mut game = level_game(5);
        game.tick(170_000);
        assert_eq!(game.time_left_secs(), Some(10));
        let mut result = None;
        for i in targets(&game) {
            result = game.handle_select(i);
        }
        assert_eq!(result, Some(GameResult::Level { success: true, stars: 1 }));
    }

    #[test]
    fn test_timeout_fails_level() {
        let mut game = level_game(6);
        assert_eq!(game.tick(179_999), None);
        assert_eq!(
            game.tick(1),
            Some(GameResult::Level { success: false, stars: 0 })
        );
        // No clicks after the end
        let hit = targets(&game)[0];
        assert_eq!(game.handle_select(hit), None);
        assert_eq!(game.found(), 0);
    }

    #[test]
    fn test_stage_scaling() {
        assert_eq!((stage_grid_size(0), stage_target_count(0)), (6, 3));
        assert_eq!((stage_grid_size(1), stage_target_count(1)), (6, 3));
        assert_eq!((stage_grid_size(3), stage_target_count(3)), (7, 4));
        assert_eq!((stage_grid_size(6), stage_target_count(6)), (8, 6));
        assert_eq!((stage_grid_size(12), stage_target_count(12)), (8, 8));
        assert_eq!((stage_grid_size(100), stage_target_count(100)), (8, 8));
    }

    #[test]
    fn test_infinite_stage_advances() {
        let mut game = SearchGame::start(GameConfig::infinite(7));
        assert_eq!(game.stage(), 1);
        assert_eq!(game.cells().len(), 36);
        assert_eq!(game.targets_needed(), 3);

        // A wrong click on stage 1 must not carry over
        game.handle_select(decoy(&game));
        for i in targets(&game) {
            assert_eq!(game.handle_select(i), None);
        }
        assert_eq!(game.phase(), SearchPhase::StageClear);
        assert_eq!(game.stage_score(), 1);
        // Clicks during the celebration are ignored
        game.handle_select(0);

        game.tick(1_500);
        assert_eq!(game.stage(), 2);
        assert_eq!(game.phase(), SearchPhase::Playing);
        assert_eq!(game.targets_needed(), 4);
        assert_eq!(game.found(), 0);
        assert_eq!(game.wrong_clicks(), 0);
    }

    #[test]
    fn test_wrong_click_cap_ends_run() {
        let mut game = SearchGame::start(GameConfig::infinite(8));
        let miss = decoy(&game);
        for _ in 0..9 {
            assert_eq!(game.handle_select(miss), None);
        }
        assert_eq!(
            game.handle_select(miss),
            Some(GameResult::Infinite { stage_score: 0 })
        );
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::CapReached));
        assert!(events.contains(&GameEvent::WrongClick { cell: miss, strikes: 10 }));
    }

    #[test]
    fn test_infinite_grid_has_distinct_target_cells() {
        let mut game = SearchGame::start(GameConfig::infinite(9));
        for _ in 0..8 {
            let hits = targets(&game);
            assert_eq!(hits.len() as u32, game.targets_needed());
            assert_eq!(game.cells().len() as u32, game.grid_size() * game.grid_size());
            for i in hits {
                game.handle_select(i);
            }
            game.tick(1_500);
        }
        assert_eq!(game.stage(), 9);
        assert_eq!(game.grid_size(), 8);
    }

    #[test]
    fn test_quit_infinite_reports_score() {
        let mut game = SearchGame::start(GameConfig::infinite(10));
        for i in targets(&game) {
            game.handle_select(i);
        }
        assert_eq!(game.quit(), Some(GameResult::Infinite { stage_score: 1 }));
        // Pending stage advance is dropped
        game.tick(5_000);
        assert_eq!(game.stage(), 1);
    }

    #[test]
    fn test_huge_tick_times_out_level() {
        let mut game = level_game(9);
        let result = game.tick(u64::MAX);
        assert_eq!(result, Some(GameResult::Level { success: false, stars: 0 }));
        assert_eq!(game.tick(u64::MAX), None);
    }

    #[test]
    fn test_quit_level_has_no_result() {
        let mut game = level_game(11);
        assert_eq!(game.quit(), None);
        assert!(game.is_finished());
        assert_eq!(game.result(), None);
    }
}
