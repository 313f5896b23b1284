//! The deterministic elevation function underneath every chunk.
//!
//! Heights are a pure function of (seed, chunk coordinate): no caching, no
//! chunk-to-chunk state. A chunk may therefore ask for its neighbors'
//! heights without loading them, which is what makes wall placement and
//! classification purely local decisions.

use holdfast_core::constants::WALL_DEPTH;
use holdfast_core::math::positive_mod;
use holdfast_core::rng::tile_sequence;
use holdfast_core::types::ChunkCoord;

#[derive(Debug, Clone, Copy)]
pub struct HeightField {
    seed: u32,
}

impl HeightField {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Floor elevation of the chunk at (cx, cy), always a multiple of
    /// WALL_DEPTH and zero everywhere at or west of cx == 0.
    ///
    /// The base terrace climbs eastward with a diagonal ridge pattern; a
    /// keyed coin then cuts the terrace down one step, but only where the
    /// western neighbor is already lower, so eastbound paths never face a
    /// cliff taller than one terrace. The recursion is bounded by cx: each
    /// hop moves one column west and column zero is flat.
    pub fn floor_height(&self, cx: i32, cy: i32) -> i32 {
        let x = cx - 1;
        if x < 0 {
            return 0;
        }
        let ridge = (positive_mod(cy + x.div_euclid(4) * 3, 6) - 2).abs();
        let mut h = (x + ridge).div_euclid(4);
        let mut rng = tile_sequence(
            self.seed,
            (x as i64) * 111 + (cy as i64) * 37 + x as i64 + cy as i64,
        );
        if rng.coin() && self.floor_height(cx - 1, cy) < h * WALL_DEPTH {
            h -= 1;
        }
        h * WALL_DEPTH
    }

    /// Heights of the three neighbors a chunk classifies against.
    pub fn neighbor_heights(&self, coord: ChunkCoord) -> (i32, i32, i32) {
        (
            self.floor_height(coord.x + 1, coord.y),
            self.floor_height(coord.x, coord.y + 1),
            self.floor_height(coord.x, coord.y - 1),
        )
    }
}

/// A dead end is a chunk whose east, north and south neighbors all sit
/// higher: the only level exit is back west.
pub fn is_dead_end(z: i32, east: i32, north: i32, south: i32) -> bool {
    east > z && north > z && south > z
}
