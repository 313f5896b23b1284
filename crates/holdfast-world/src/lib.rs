//! World generation: the deterministic height field, per-chunk assembly
//! and the streamed window of active chunks.

pub mod chunk;
pub mod height;
pub mod streaming;

pub use chunk::{generate_chunk, Classification, GeneratedChunk};
pub use height::HeightField;
pub use streaming::ActiveChunks;
