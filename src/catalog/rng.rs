//! Seeded linear congruential generator
//!
//! The campaign is one trace of this generator, seeded from the player's
//! nickname. The recurrence, the hash and the shuffle order are frozen: any
//! change reshuffles every existing player's campaign.

use serde::{Deserialize, Serialize};

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233280;

/// Rolling 31x hash over the UTF-16 code units of `name`.
///
/// Wraps like 32-bit signed integer arithmetic, then takes the absolute value,
/// so `i32::MIN` maps to `2^31`.
pub fn name_seed(name: &str) -> u32 {
    let hash = name
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

/// Deterministic pseudo-random sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededGenerator {
    /// Current LCG state. Holds the raw seed until the first draw, then stays
    /// below the modulus.
    state: u64,
}

impl SeededGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    /// Seed from a nickname via [`name_seed`]
    pub fn from_name(name: &str) -> Self {
        Self::new(name_seed(name))
    }

    /// Next value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        // seed * 9301 fits comfortably in u64 even for a 32-bit first seed
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }

    /// Integer in [min, max], inclusive
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        (self.next_f64() * span).floor() as i64 + min
    }

    /// Fisher-Yates shuffle into a new vector.
    ///
    /// Walks from the last index down to 1, swapping each slot with a uniformly
    /// drawn index at or below it.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut result = items.to_vec();
        for i in (1..result.len()).rev() {
            let j = (self.next_f64() * (i + 1) as f64).floor() as usize;
            result.swap(i, j);
        }
        result
    }
}
