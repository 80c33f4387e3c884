//! Data-driven game balance
//!
//! Every delay the engines schedule and both infinite-mode failure caps live
//! here instead of in the engines, so they can be overridden from JSON
//! without touching engine code.

use serde::{Deserialize, Serialize};

/// Timings (milliseconds of logical clock) and failure caps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Face-up preview before a campaign memory board flips down
    pub level_preview_ms: u64,
    /// Face-up preview on every infinite memory stage
    pub infinite_preview_ms: u64,
    /// Delay before a matching pair is cleared
    pub match_resolve_ms: u64,
    /// Delay before a mismatched pair flips back
    pub mismatch_resolve_ms: u64,
    /// Celebration between infinite memory stages
    pub memory_stage_clear_ms: u64,
    /// Celebration between infinite search stages
    pub search_stage_clear_ms: u64,

    // === Infinite memory ===
    /// Move cap is `move_cap_base + stage * move_cap_per_stage`
    pub move_cap_base: u32,
    pub move_cap_per_stage: u32,

    // === Infinite search ===
    /// Wrong clicks allowed per stage before the run ends
    pub wrong_click_cap: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_preview_ms: 1000,
            infinite_preview_ms: 1500,
            match_resolve_ms: 800,
            mismatch_resolve_ms: 1200,
            memory_stage_clear_ms: 2000,
            search_stage_clear_ms: 1500,

            move_cap_base: 50,
            move_cap_per_stage: 10,

            wrong_click_cap: 10,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override. Missing fields keep their
    /// defaults; malformed input yields the defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring malformed tuning ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Mismatches allowed on an infinite memory stage
    pub fn move_cap(&self, stage: u32) -> u32 {
        self.move_cap_base
            .saturating_add(stage.saturating_mul(self.move_cap_per_stage))
    }
}
