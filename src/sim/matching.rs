//! Pair-matching minigame
//!
//! Phases: `Preview -> Playing -> Checking -> Playing ... -> Completed`.
//! The bounded variant plays one timed board built from a level's icons and
//! rates it with stars. The unbounded variant plays board after board, each
//! with more pairs, until the player runs out of moves or quits.

use rand::SeedableRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::timeline::{LevelClock, Timeline};
use super::{Course, GameConfig, GameEvent, GameResult, Minigame, Variant};
use crate::catalog::GameMode;
use crate::consts::*;
use crate::icons::Icon;
use crate::tuning::Tuning;

/// Mismatches below this earn the move bonus star
const MOVE_BONUS_LIMIT: u32 = 30;

/// Current phase of a matching game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPhase {
    /// All cards face up to memorize
    Preview,
    /// Accepting clicks
    Playing,
    /// Two cards face up, waiting for the resolve delay
    Checking,
    /// Unbounded only: board cleared, next stage pending
    StageClear,
    /// Game over, no further input
    Completed,
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub icon: Icon,
    /// Both cards of a pair share this id
    pub pair: usize,
    pub face_up: bool,
    pub matched: bool,
}

/// Delayed transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchAction {
    FlipAllDown,
    ResolveMatch { first: usize, second: usize },
    ResolveMismatch { first: usize, second: usize },
    EndRun,
    NextStage,
}

/// Pairs on an unbounded stage
pub fn infinite_pair_count(stage: u32) -> usize {
    (BASE_INFINITE_PAIRS + stage as usize).min(MEMORY_PAIRS)
}

/// Stars for a cleared board
fn rate_board(remaining_secs: u32, limit_secs: u32, moves: u32) -> u8 {
    // More than half the time left
    let time_bonus = u8::from(remaining_secs * 2 > limit_secs);
    let move_bonus = u8::from(moves < MOVE_BONUS_LIMIT);
    (1 + time_bonus + move_bonus).min(MAX_STARS)
}

/// Build two face-up cards per icon, shuffled
fn deal(icons: &[Icon], rng: &mut Pcg32) -> Vec<Card> {
    let mut cards: Vec<Card> = icons
        .iter()
        .enumerate()
        .flat_map(|(pair, &icon)| {
            let card = Card {
                icon,
                pair,
                face_up: true,
                matched: false,
            };
            [card.clone(), card]
        })
        .collect();
    cards.shuffle(rng);
    cards
}

/// Matching engine state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingGame {
    variant: Variant,
    phase: MatchPhase,
    cards: Vec<Card>,
    /// Face-up unmatched selection, at most two
    flipped: Vec<usize>,
    /// Pair ids cleared so far on this board
    matched_pairs: Vec<usize>,
    total_pairs: usize,
    /// Mismatched attempts on this board
    moves: u32,
    /// Unbounded stage number, starting at 1
    stage: u32,
    stage_score: u32,
    time_left_secs: Option<u32>,
    result: Option<GameResult>,
    #[serde(skip)]
    clock: Option<LevelClock>,
    #[serde(skip)]
    timeline: Timeline<MatchAction>,
    #[serde(skip)]
    tuning: Tuning,
    #[serde(skip)]
    rng: Pcg32,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl MatchingGame {
    /// Deal the first board and schedule the preview flip
    pub fn start(config: GameConfig) -> Self {
        let GameConfig { course, seed, tuning } = config;
        let mut game = Self {
            variant: Variant::Unbounded,
            phase: MatchPhase::Preview,
            cards: Vec::new(),
            flipped: Vec::with_capacity(2),
            matched_pairs: Vec::new(),
            total_pairs: 0,
            moves: 0,
            stage: 1,
            stage_score: 0,
            time_left_secs: None,
            result: None,
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
                game.deal_level(&icons);
            }
            Course::Infinite => game.deal_stage(),
        }
        game
    }

    /// Campaign board: the level's distinct icons, up to a full 6x6 grid
    fn deal_level(&mut self, icons: &[Icon]) {
        let mut distinct: Vec<Icon> = Vec::with_capacity(MEMORY_PAIRS);
        for &icon in icons {
            if !distinct.contains(&icon) {
                distinct.push(icon);
            }
        }
        distinct.truncate(MEMORY_PAIRS);
        if distinct.len() < MEMORY_PAIRS {
            log::warn!(
                "Level has only {} distinct icons, dealing a short board",
                distinct.len()
            );
        }

        self.total_pairs = distinct.len();
        self.cards = deal(&distinct, &mut self.rng);
        self.timeline
            .schedule(self.tuning.level_preview_ms, MatchAction::FlipAllDown);
    }

    /// Unbounded board for the current stage, icons drawn from the full catalog
    fn deal_stage(&mut self) {
        let pairs = infinite_pair_count(self.stage);
        let icons: Vec<Icon> = Icon::ALL
            .choose_multiple(&mut self.rng, pairs)
            .copied()
            .collect();

        self.total_pairs = icons.len();
        self.cards = deal(&icons, &mut self.rng);
        self.flipped.clear();
        self.matched_pairs.clear();
        self.moves = 0;
        self.phase = MatchPhase::Preview;
        self.timeline
            .schedule(self.tuning.infinite_preview_ms, MatchAction::FlipAllDown);

        log::info!("Memory stage {}: {} pairs", self.stage, pairs);
        self.events.push(GameEvent::StageStarted { stage: self.stage });
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn matched_pair_count(&self) -> usize {
        self.matched_pairs.len()
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn stage_score(&self) -> u32 {
        self.stage_score
    }

    /// Countdown as displayed, `None` for unbounded runs
    pub fn time_left_secs(&self) -> Option<u32> {
        self.time_left_secs
    }

    /// Mismatches that end the current unbounded stage
    pub fn move_cap(&self) -> Option<u32> {
        match self.variant {
            Variant::Unbounded => Some(self.tuning.move_cap(self.stage)),
            Variant::Bounded { .. } => None,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.timeline.now_ms()
    }

    fn finish(&mut self, result: GameResult) -> Option<GameResult> {
        self.phase = MatchPhase::Completed;
        self.flipped.clear();
        self.timeline.cancel_all();
        self.result = Some(result);
        log::info!("Memory game finished: {:?}", result);
        self.events.push(GameEvent::Finished { result });
        Some(result)
    }

    /// Board fully matched
    fn board_cleared(&mut self) -> Option<GameResult> {
        match self.variant {
            Variant::Bounded { .. } => {
                let (remaining, limit) = match self.clock {
                    Some(clock) => (clock.remaining_secs(self.now_ms()), clock.limit_secs),
                    None => (0, 0),
                };
                let stars = rate_board(remaining, limit, self.moves);
                self.finish(GameResult::Level { success: true, stars })
            }
            Variant::Unbounded => {
                self.stage_score += 1;
                self.phase = MatchPhase::StageClear;
                self.events.push(GameEvent::StageCleared {
                    stage: self.stage,
                    score: self.stage_score,
                });
                self.timeline
                    .schedule(self.tuning.memory_stage_clear_ms, MatchAction::NextStage);
                None
            }
        }
    }

    fn apply(&mut self, action: MatchAction) -> Option<GameResult> {
        match action {
            MatchAction::FlipAllDown => {
                for card in &mut self.cards {
                    card.face_up = false;
                }
                self.phase = MatchPhase::Playing;
                self.events.push(GameEvent::PreviewEnded);
                None
            }
            MatchAction::ResolveMatch { first, second } => {
                let pair = self.cards[first].pair;
                self.cards[first].matched = true;
                self.cards[second].matched = true;
                self.matched_pairs.push(pair);
                self.flipped.clear();
                self.phase = MatchPhase::Playing;
                self.events.push(GameEvent::CardsMatched { first, second });

                if self.matched_pairs.len() == self.total_pairs {
                    self.board_cleared()
                } else {
                    None
                }
            }
            MatchAction::ResolveMismatch { first, second } => {
                self.cards[first].face_up = false;
                self.cards[second].face_up = false;
                self.flipped.clear();
                self.phase = MatchPhase::Playing;
                None
            }
            MatchAction::EndRun => {
                self.events.push(GameEvent::CapReached);
                self.finish(GameResult::Infinite {
                    stage_score: self.stage_score,
                })
            }
            MatchAction::NextStage => {
                self.stage += 1;
                self.deal_stage();
                None
            }
        }
    }
}

impl Minigame for MatchingGame {
    fn mode(&self) -> GameMode {
        GameMode::Memory
    }

    fn variant(&self) -> Variant {
        self.variant
    }

    fn handle_select(&mut self, index: usize) -> Option<GameResult> {
        if self.phase != MatchPhase::Playing || self.flipped.len() >= 2 {
            return None;
        }
        match self.cards.get(index) {
            Some(card) if !card.face_up && !card.matched => {}
            _ => return None,
        }

        self.cards[index].face_up = true;
        self.flipped.push(index);
        self.events.push(GameEvent::CardFlipped { card: index });

        if let [first, second] = self.flipped[..] {
            self.phase = MatchPhase::Checking;
            if self.cards[first].pair == self.cards[second].pair {
                self.timeline.schedule(
                    self.tuning.match_resolve_ms,
                    MatchAction::ResolveMatch { first, second },
                );
            } else {
                self.moves += 1;
                self.events.push(GameEvent::CardsMismatched { first, second });
                log::debug!("Mismatch {} / {}: {} moves", first, second, self.moves);

                let capped = self.move_cap().is_some_and(|cap| self.moves >= cap);
                let action = if capped {
                    MatchAction::EndRun
                } else {
                    MatchAction::ResolveMismatch { first, second }
                };
                self.timeline.schedule(self.tuning.mismatch_resolve_ms, action);
            }
        }
        None
    }

    fn tick(&mut self, dt_ms: u64) -> Option<GameResult> {
        if self.phase == MatchPhase::Completed {
            return None;
        }
        let target = self.timeline.now_ms().saturating_add(dt_ms);
        let horizon = match self.clock {
            Some(clock) => target.min(clock.last_playable_ms()),
            None => target,
        };

        while let Some(action) = self.timeline.pop_due(horizon) {
            if let Some(result) = self.apply(action) {
                return Some(result);
            }
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
        if self.phase == MatchPhase::Completed {
            return None;
        }
        match self.variant {
            Variant::Unbounded => self.finish(GameResult::Infinite {
                stage_score: self.stage_score,
            }),
            Variant::Bounded { level_id } => {
                log::info!("Level {} abandoned", level_id);
                self.phase = MatchPhase::Completed;
                self.timeline.cancel_all();
                None
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.phase == MatchPhase::Completed
    }

    fn result(&self) -> Option<GameResult> {
        self.result
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
