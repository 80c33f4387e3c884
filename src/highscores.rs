//! Infinite-mode high scores
//!
//! One slot per infinite mode, each persisted as a bare integer under its own
//! key. A slot only moves when a run strictly beats it.

use serde::{Deserialize, Serialize};

use crate::catalog::GameMode;

/// Best stage counts reached in the infinite modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub memory: u32,
    pub attention: u32,
}

impl HighScores {
    /// Store key for a mode's slot
    pub const fn storage_key(mode: GameMode) -> &'static str {
        match mode {
            GameMode::Memory => "sm_memory_high_score",
            GameMode::Attention => "sm_attention_high_score",
        }
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Memory => self.memory,
            GameMode::Attention => self.attention,
        }
    }

    /// Check if a run would set a new record
    pub fn qualifies(&self, mode: GameMode, score: u32) -> bool {
        score > self.get(mode)
    }

    /// Record a finished run. Returns true if it replaced the previous best.
    pub fn record(&mut self, mode: GameMode, score: u32) -> bool {
        if !self.qualifies(mode, score) {
            return false;
        }
        match mode {
            GameMode::Memory => self.memory = score,
            GameMode::Attention => self.attention = score,
        }
        log::info!("New {:?} high score: {}", mode, score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_strictly_greater_overwrites() {
        let mut scores = HighScores::new();
        assert!(!scores.record(GameMode::Memory, 0));
        assert!(scores.record(GameMode::Memory, 4));
        assert!(!scores.record(GameMode::Memory, 4));
        assert!(!scores.record(GameMode::Memory, 2));
        assert_eq!(scores.get(GameMode::Memory), 4);
        assert_eq!(scores.get(GameMode::Attention), 0);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut scores = HighScores::new();
        scores.record(GameMode::Attention, 9);
        assert!(scores.qualifies(GameMode::Memory, 1));
        assert!(!scores.qualifies(GameMode::Attention, 9));
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(HighScores::storage_key(GameMode::Memory), "sm_memory_high_score");
        assert_eq!(HighScores::storage_key(GameMode::Attention), "sm_attention_high_score");
    }
}
