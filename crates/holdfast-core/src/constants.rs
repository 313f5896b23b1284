//! Single source of truth for shared constants. Generation, simulation and
//! the bench runner all read these; nothing else may tune them locally.

/// Chunk extent along X in world units (= grid tiles).
pub const CHUNK_WIDTH: i32 = 12;

/// Chunk extent along Y in world units (= grid tiles).
pub const CHUNK_HEIGHT: i32 = 12;

/// Smaller of the two chunk extents; building footprints derive from it.
pub const CHUNK_DIMENSION_MIN: i32 = 12;

/// Elevation quantum. Every floor height is a multiple of this.
pub const WALL_DEPTH: i32 = 2;

/// Minimum building segment depth in world units.
pub const MIN_BUILDING_DEPTH: i32 = 4;

/// Maximum building segment depth in world units.
pub const MAX_BUILDING_DEPTH: i32 = 20;

/// Shell area to health conversion: max_health = sum(w*h) / this.
pub const BUILDING_SIZE_HEALTH_RATIO: f32 = 7.0;

/// Divisor in the power derivation: power = friendliness * max_health / this.
pub const BUILDING_DAMAGE_POWER_DIV: f32 = 2.0;

/// Birth timer re-arm interval in milliseconds.
pub const BASE_BUILDING_BIRTH_INTERVAL: f32 = 199.0;

/// Spawn timer re-arm after a successful placement (aggressive follow-up).
pub const SPAWN_JUMP_INTERVAL: f32 = 99.0;

/// Spawn timer re-arm after a failed placement ended a walk.
pub const SPAWN_REST_INTERVAL: f32 = 3_000.0;

/// Base activation radius for monster births, before aggro inflation.
/// Matches the reach of a player's shot plus one chunk.
pub const MAX_BUILDING_ACTIVATION_DISTANCE: f32 = 21.0;

/// Stand-off radius: players closer than this do not trigger births.
pub const MIN_BUILDING_ACTIVATION_DISTANCE: f32 = 3.0;

/// Aggro widens the activation radius by aggro / this.
pub const AGGRO_DISTANCE_DIVISOR: f32 = 3.0;

/// Global cap on simultaneously active enemies.
pub const MAX_MONSTERS: usize = 30;

/// Cosine threshold: monsters only spawn on walls roughly facing the target.
pub const BUILDING_PLAYER_SPAWN_COS: f32 = -0.2;

/// Latent monsters become birth-eligible this long after placement, plus
/// a random jitter of the same magnitude.
pub const INCUBATION_TIME: f32 = 999.0;

/// Passive damage regeneration: damage decays by dt / this per tick.
pub const PASSIVE_REGEN_DIVISOR: f32 = 999.0;

/// Bits packed per lighting word. 24 keeps the word exact in an f32 uniform.
pub const LIGHT_WORD_BITS: u32 = 24;

/// Number of lighting words per surface.
pub const LIGHT_WORDS: usize = 4;

/// Base monster radius in world units.
pub const BASE_RADIUS: f32 = 0.45;

/// Epsilon for normal/lift comparisons.
pub const SMALL_NUMBER: f32 = 1e-3;

/// Largest i32 still safe for bitwise ops; also the palette draw bound.
pub const BIG_NUMBER: i64 = 2_147_483_647;

/// Default world seed.
pub const WORLD_SEED: u32 = 99;

/// Activation window extent, in chunks, around the player.
pub const ACTIVE_CHUNKS_WIDTH: i32 = 12;
pub const ACTIVE_CHUNKS_HEIGHT: i32 = 12;

/// Upper bound on placement attempts per spawn call.
pub const SPAWN_ATTEMPT_BUDGET: i32 = 9;

/// Aggro contributes aggro / this extra placement attempts.
pub const AGGRO_ATTEMPT_DIVISOR: f32 = 99.0;

/// Miniboss roll: one chance in this per qualifying chunk.
pub const MINIBOSS_DENIAL: i32 = 9;

/// Chunks west of this are born liberated (safe starting band).
pub const SAFE_ZONE_CHUNK_X: i32 = 3;

/// Directed lighting hint: extra Z lift and fade-out shared per chunk.
pub const DIRECTIONAL_LIGHT_EXTRA_Z: f32 = 0.3;
pub const DIRECTIONAL_LIGHT_FADE_OUT: f32 = 0.5;

/// Shell palettes handed to the renderer.
pub const NEUTRAL_FILL_COLOR: [f32; 3] = [0.3, 0.35, 0.33];
pub const GOOD_FILL_COLOR: [f32; 3] = [0.4, 0.4, 0.1];
pub const BAD_FILL_COLOR: [f32; 3] = [0.4, 0.1, 0.4];
