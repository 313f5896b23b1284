//! Deterministic bounded-integer sequence.
//!
//! Every generated artifact in the world derives from draws of this
//! sequence. Call order is part of the contract: two sequences built from
//! equal seeds produce identical outputs only while their consumers draw in
//! the same order, so each consumer documents its draw order where it draws.

use crate::error::CoreError;

const LCG_MUL: u64 = 6364136223846793005;
const LCG_ADD: u64 = 1442695040888963407;

/// A pseudo-random integer generator bound to one numeric seed.
///
/// Exclusively owned by the generation or simulation pass that created it;
/// never shared across chunks.
#[derive(Debug, Clone)]
pub struct SeededSequence {
    state: u64,
}

impl SeededSequence {
    pub fn new(seed: u64) -> Self {
        let mut seq = Self {
            state: seed ^ 0x9E3779B97F4A7C15,
        };
        // One warm-up step so nearby seeds diverge from the first draw.
        seq.step();
        seq
    }

    fn step(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(LCG_MUL).wrapping_add(LCG_ADD);
        self.state
    }

    /// Draw one coin flip, consuming one step. Equivalent to
    /// `next(2) != 0` but infallible, for the pure height recursion.
    pub fn coin(&mut self) -> bool {
        (self.step() >> 33) & 1 == 1
    }

    /// Draw the next value in `[0, bound)`, consuming one step.
    pub fn next(&mut self, bound: i32) -> Result<i32, CoreError> {
        if bound <= 0 {
            return Err(CoreError::InvalidBound(bound));
        }
        let raw = self.step() >> 33;
        Ok((raw % bound as u64) as i32)
    }
}

/// Sequence for one tile-scoped key (heights, chunk layout, building dims).
/// Mixes the world seed with the key so distinct worlds diverge everywhere.
pub fn tile_sequence(seed: u32, key: i64) -> SeededSequence {
    SeededSequence::new((seed as u64).wrapping_mul(0x9E3779B9).wrapping_add(key as u64))
}
