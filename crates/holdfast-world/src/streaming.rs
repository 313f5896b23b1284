//! The streamed window of loaded chunks.
//!
//! Being inside the window is the only liveness a chunk has: leaving it
//! drops the chunk and everything derived from it, and stepping back in
//! regenerates an identical copy (liberation flags aside) from the seed.

use std::collections::HashMap;

use glam::Vec3;
use holdfast_core::constants::{
    ACTIVE_CHUNKS_HEIGHT, ACTIVE_CHUNKS_WIDTH, CHUNK_HEIGHT, CHUNK_WIDTH,
};
use holdfast_core::types::ChunkCoord;
use holdfast_core::CoreError;
use holdfast_persist::FlagStore;

use crate::chunk::{generate_chunk, GeneratedChunk};

pub struct ActiveChunks {
    seed: u32,
    chunks: HashMap<ChunkCoord, GeneratedChunk>,
}

impl ActiveChunks {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            chunks: HashMap::new(),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Chunk coordinate containing the world position.
    pub fn chunk_coord(position: Vec3) -> ChunkCoord {
        ChunkCoord::new(
            (position.x / CHUNK_WIDTH as f32).floor() as i32,
            (position.y / CHUNK_HEIGHT as f32).floor() as i32,
        )
    }

    /// Inclusive corner bounds of the window centered on `center`.
    fn window(center: ChunkCoord) -> (ChunkCoord, ChunkCoord) {
        let min = ChunkCoord::new(
            center.x - ACTIVE_CHUNKS_WIDTH / 2,
            center.y - ACTIVE_CHUNKS_HEIGHT / 2,
        );
        let max = ChunkCoord::new(min.x + ACTIVE_CHUNKS_WIDTH - 1, min.y + ACTIVE_CHUNKS_HEIGHT - 1);
        (min, max)
    }

    /// Re-center the window on `focus` (the origin when there is no
    /// player yet): drop chunks that left it, generate chunks that entered
    /// it. Returns the coordinates loaded this call, in generation order,
    /// so the driver can place their minibosses.
    pub fn retarget(
        &mut self,
        store: &dyn FlagStore,
        focus: Option<Vec3>,
    ) -> Result<Vec<ChunkCoord>, CoreError> {
        let center = focus.map(Self::chunk_coord).unwrap_or(ChunkCoord::ZERO);
        let (min, max) = Self::window(center);

        let before = self.chunks.len();
        self.chunks
            .retain(|c, _| c.x >= min.x && c.x <= max.x && c.y >= min.y && c.y <= max.y);
        let dropped = before - self.chunks.len();

        let mut loaded = Vec::new();
        for cy in min.y..=max.y {
            for cx in min.x..=max.x {
                let coord = ChunkCoord::new(cx, cy);
                if self.chunks.contains_key(&coord) {
                    continue;
                }
                let chunk = generate_chunk(self.seed, coord, store, focus)?;
                self.chunks.insert(coord, chunk);
                loaded.push(coord);
            }
        }
        if dropped > 0 || !loaded.is_empty() {
            log::debug!(
                "window at {center}: +{} -{dropped} ({} live)",
                loaded.len(),
                self.chunks.len()
            );
        }
        Ok(loaded)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&GeneratedChunk> {
        self.chunks.get(&coord)
    }

    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut GeneratedChunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedChunk> {
        self.chunks.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GeneratedChunk> {
        self.chunks.values_mut()
    }
}
