use glam::IVec2;

/// Chunk coordinate in chunk-space (each unit = one CHUNK_WIDTH x
/// CHUNK_HEIGHT cell).
pub type ChunkCoord = IVec2;

/// Identifies one building within the world. Buildings are one-per-chunk,
/// so the owning chunk coordinate is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildingId(pub ChunkCoord);

/// Persistence key for the one fact that outlives a chunk: whether its
/// building has been liberated. String-concatenation semantics match the
/// saves written by earlier releases.
pub fn tile_key(seed: u32, coord: ChunkCoord) -> String {
    format!("{} {} {}", seed, coord.x, coord.y)
}

/// Persistence key for the world-wide anchor of the last liberated building.
pub fn anchor_key(seed: u32) -> String {
    format!("{}", seed)
}
