//! Campaign catalog
//!
//! The campaign is a pure function of the nickname: a [`SeededGenerator`]
//! seeded from the name shuffles the icon catalog once per level, in order.
//! After creation the list is only mutated through [`apply_completion`].

pub mod levels;
pub mod rng;

pub use levels::{
    GameMode, Level, apply_completion, completed_count, difficulty_for, generate_levels,
    normalize_time_limits, select_level,
};
pub use rng::{SeededGenerator, name_seed};
