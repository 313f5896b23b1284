//! Building shell generation and controller state.
//!
//! A building is a tapering stack of wall segments on a chunk site. The
//! shell's footprint area sets both the latent spawn budget and the
//! building's health; everything else about it derives from tile-sequence
//! draws, so the same seed and chunk coordinate always rebuild the same
//! building.

use glam::{Vec2, Vec3, Vec4};
use holdfast_core::constants::{
    BAD_FILL_COLOR, BUILDING_SIZE_HEALTH_RATIO, CHUNK_DIMENSION_MIN, CHUNK_HEIGHT, CHUNK_WIDTH,
    GOOD_FILL_COLOR, MAX_BUILDING_DEPTH, MIN_BUILDING_DEPTH, SPAWN_REST_INTERVAL,
};
use holdfast_core::rng::SeededSequence;
use holdfast_core::surface::{ShellRef, Surface, SurfaceId, SurfaceKind};
use holdfast_core::types::{anchor_key, tile_key, BuildingId, ChunkCoord};
use holdfast_core::CoreError;
use holdfast_persist::{read_liberated, FlagStore};
use std::f32::consts::FRAC_PI_2;

use crate::spawn_pool::SpawnPool;

/// Placement rounds the pre-seed loop tolerates without progress before
/// concluding the shell has fewer nest tiles than its footprint budget.
const PRESEED_STALL_LIMIT: u32 = 999;

#[derive(Debug)]
pub struct Building {
    pub id: BuildingId,
    /// Persistence key of the liberation flag.
    pub(crate) tile_key: String,
    /// Persistence key of the world-wide last-liberated anchor.
    pub(crate) anchor_key: String,
    /// Ground-plane center of the footprint.
    pub(crate) center: Vec2,
    /// Top of the shell, where the anchor is planted on liberation.
    pub(crate) top_z: f32,
    pub(crate) walls: Vec<Surface>,
    /// Index of the top segment's roof within `walls`.
    pub(crate) roof: usize,
    pub max_health: f32,
    pub(crate) damage: f32,
    pub(crate) previous_damage: f32,
    /// 0 hostile .. 1 fully liberated, squared response curve.
    pub friendliness: f32,
    /// Passive support the building contributes once (partly) liberated.
    pub power: f32,
    pub(crate) liberated: bool,
    pub(crate) pool: SpawnPool,
    pub(crate) rng: SeededSequence,
    pub(crate) spawn_types: Vec<u32>,
    pub(crate) next_spawn: f32,
    pub(crate) next_birth: f32,
}

impl Building {
    /// Generate the building for a qualifying chunk site.
    ///
    /// `rng` is the chunk's tile sequence, already advanced past the layout
    /// draws; dimension draws continue it in a fixed order (depth, footprint
    /// dimension, segment count, taper shift, spawn types). `pre_liberated`
    /// carries the chunk's birth-liberation roll and safe-zone test; the
    /// persisted flag is read here and folded in.
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        seed: u32,
        coord: ChunkCoord,
        elevation: i32,
        rng: &mut SeededSequence,
        palette: &[u32],
        pre_liberated: bool,
        store: &dyn FlagStore,
        directed_lighting_range: Vec4,
        nearest_player: Option<Vec3>,
        next_surface_id: &mut u32,
    ) -> Result<Self, CoreError> {
        let key = tile_key(seed, coord);
        let liberated = pre_liberated || read_liberated(store, &key);

        let depth_bound =
            (MIN_BUILDING_DEPTH + elevation / MIN_BUILDING_DEPTH).min(MAX_BUILDING_DEPTH);
        let mut depth = rng.next(depth_bound)? + MIN_BUILDING_DEPTH;
        let min_dimension = CHUNK_DIMENSION_MIN / 2;
        let max_dimension = CHUNK_DIMENSION_MIN - 2;
        let dimension = rng.next(max_dimension - min_dimension)? + min_dimension;
        let mut segments = rng.next(depth / MIN_BUILDING_DEPTH)? + 1;
        let shift = rng.next(4)? + 1;

        let fill_color = if liberated { GOOD_FILL_COLOR } else { BAD_FILL_COLOR };
        let chunk_x = coord.x * CHUNK_WIDTH;
        let chunk_y = coord.y * CHUNK_HEIGHT;
        let mut width = dimension;
        let mut height = dimension;
        let mut z = elevation;
        let mut max_spawn_count = 0u32;
        let mut max_health = 0f32;
        let mut walls: Vec<Surface> = Vec::new();
        let mut roof = 0usize;
        let id = BuildingId(coord);

        while segments > 0 && width > 1 && height > 1 {
            segments -= 1;
            let bx = (chunk_x + (CHUNK_WIDTH - width) / 2) as f32;
            let by = (chunk_y + (CHUNK_HEIGHT - height) / 2) as f32;
            let bz = z as f32;
            let (w, h, d) = (width as f32, height as f32, depth as f32);
            max_spawn_count += (width * height) as u32;
            max_health += (width * height) as f32 / BUILDING_SIZE_HEALTH_RATIO;

            let mut panel = |origin: Vec3, pw: f32, ph: f32, rot_x: f32, rot_y: f32, kind| {
                let sid = SurfaceId(*next_surface_id);
                *next_surface_id += 1;
                let mut surface = Surface::panel(
                    sid,
                    kind,
                    origin,
                    pw,
                    ph,
                    rot_x,
                    rot_y,
                    fill_color,
                    [1.0, 1.0],
                    directed_lighting_range,
                );
                surface.owner = Some(ShellRef {
                    building: id,
                    wall: walls.len(),
                });
                walls.push(surface);
            };

            // Four outward faces, then the segment roof.
            panel(Vec3::new(bx, by, bz), w, d, FRAC_PI_2, 0.0, SurfaceKind::Wall);
            panel(
                Vec3::new(bx, by + h, bz + d),
                w,
                d,
                -FRAC_PI_2,
                0.0,
                SurfaceKind::Wall,
            );
            panel(Vec3::new(bx, by, bz), d, h, 0.0, FRAC_PI_2, SurfaceKind::Wall);
            panel(
                Vec3::new(bx + w, by, bz + d),
                d,
                h,
                0.0,
                -FRAC_PI_2,
                SurfaceKind::Wall,
            );
            panel(Vec3::new(bx, by, bz + d), w, h, 0.0, 0.0, SurfaceKind::Roof);
            roof = walls.len() - 1;

            z += depth;
            depth >>= shift;
            if depth == 0 {
                depth = 1;
                width -= 4;
                height -= 4;
            } else {
                width -= 2;
                height -= 2;
            }
        }

        let spawn_type_count = rng.next(3)? + 1;
        let mut spawn_types = Vec::with_capacity(spawn_type_count as usize);
        for _ in 0..spawn_type_count {
            spawn_types.push(palette[rng.next(palette.len() as i32)? as usize]);
        }

        let damage = if liberated { max_health } else { 0.0 };
        let mut building = Self {
            id,
            tile_key: key,
            anchor_key: anchor_key(seed),
            center: Vec2::new(
                chunk_x as f32 + CHUNK_WIDTH as f32 / 2.0,
                chunk_y as f32 + CHUNK_HEIGHT as f32 / 2.0,
            ),
            top_z: z as f32,
            walls,
            roof,
            max_health,
            damage,
            previous_damage: damage,
            friendliness: 0.0,
            power: 0.0,
            liberated,
            pool: SpawnPool::new(max_spawn_count),
            rng: rng.clone(),
            spawn_types,
            // First in-game spawn round waits a full rest interval; the
            // pre-seed below covers the opening pressure.
            next_spawn: SPAWN_REST_INTERVAL,
            next_birth: 0.0,
        };
        building.recompute_derived();

        if !liberated {
            building.preseed(nearest_player)?;
        }
        Ok(building)
    }

    /// Fill the pool up front so a freshly entered hostile chunk is already
    /// nested. A shell whose footprint budget exceeds its nest tiles can
    /// never fill, so bail after enough fruitless rounds.
    fn preseed(&mut self, nearest_player: Option<Vec3>) -> Result<(), CoreError> {
        let mut stalled = 0u32;
        while !self.pool.exhausted() {
            let placed = self.pool.try_spawn(
                &mut self.walls,
                self.roof,
                &mut self.rng,
                &self.spawn_types,
                0.0,
                0.0,
                nearest_player,
            )?;
            if placed {
                stalled = 0;
            } else {
                stalled += 1;
                if stalled > PRESEED_STALL_LIMIT {
                    log::debug!(
                        "pool pre-seed for {} stalled at {}/{}",
                        self.tile_key,
                        self.pool.spawn_count(),
                        self.pool.max_spawn_count()
                    );
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn is_liberated(&self) -> bool {
        self.liberated
    }

    pub fn damage(&self) -> f32 {
        self.damage
    }

    pub fn shell(&self) -> &[Surface] {
        &self.walls
    }

    pub fn pool(&self) -> &SpawnPool {
        &self.pool
    }

    /// Ground-plane center of the footprint.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// World anchor planted on liberation: footprint center at shell top.
    pub fn anchor(&self) -> Vec3 {
        Vec3::new(self.center.x, self.center.y, self.top_z)
    }
}
