//! Per-chunk assembly: terrain surfaces, classification, the building
//! site decision and (optionally) roaming minibosses.
//!
//! Everything in a chunk derives from its tile sequence, and draw order is
//! the contract: stairway coin (dead ends only), building-site coin (east
//! of the origin column only), the birth-liberation roll, then the
//! building's own dimension draws. Reordering any of these changes every
//! world ever generated, so new draws may only be appended.

use glam::{Vec3, Vec4};
use holdfast_core::constants::{
    BIG_NUMBER, CHUNK_HEIGHT, CHUNK_WIDTH, DIRECTIONAL_LIGHT_EXTRA_Z, DIRECTIONAL_LIGHT_FADE_OUT,
    NEUTRAL_FILL_COLOR, SAFE_ZONE_CHUNK_X,
};
use holdfast_core::monster::MonsterSpawn;
use holdfast_core::rng::tile_sequence;
use holdfast_core::surface::{Surface, SurfaceId, SurfaceKind};
use holdfast_core::types::ChunkCoord;
use holdfast_core::CoreError;
use holdfast_persist::FlagStore;
use holdfast_sim::Building;
use std::f32::consts::FRAC_PI_2;

use crate::height::{is_dead_end, HeightField};

#[cfg(feature = "minibosses")]
use holdfast_core::constants::{BASE_RADIUS, CHUNK_DIMENSION_MIN, MINIBOSS_DENIAL, WALL_DEPTH};
#[cfg(feature = "minibosses")]
use holdfast_core::types::tile_key;
#[cfg(feature = "minibosses")]
use holdfast_persist::read_liberated;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Level floor, walls on any higher edges.
    Flat,
    /// All level exits blocked except back west.
    DeadEnd,
    /// A dead end replaced by a sloped floor climbing to the east rim.
    Stairway,
}

/// Everything generation produces for one chunk. Dropping it unloads the
/// chunk; the persisted liberation flag is the only state that survives.
#[derive(Debug)]
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    /// Floor elevation, in world units.
    pub elevation: i32,
    pub classification: Classification,
    /// Terrain surfaces: floor first, then boundary walls.
    pub surfaces: Vec<Surface>,
    pub building: Option<Building>,
    /// Monsters to place immediately on load.
    pub minibosses: Vec<MonsterSpawn>,
}

impl GeneratedChunk {
    /// Terrain and shell surfaces together, in emission order.
    pub fn all_surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces
            .iter()
            .chain(self.building.iter().flat_map(|b| b.shell().iter()))
    }
}

/// Generate the chunk at `coord` for `seed`.
///
/// Pure except for reads of the liberation flag; generating the same chunk
/// against the same store contents always yields the same result.
pub fn generate_chunk(
    seed: u32,
    coord: ChunkCoord,
    store: &dyn FlagStore,
    nearest_player: Option<Vec3>,
) -> Result<GeneratedChunk, CoreError> {
    let field = HeightField::new(seed);
    let z = field.floor_height(coord.x, coord.y);
    let (east, north, south) = field.neighbor_heights(coord);
    let x = (coord.x * CHUNK_WIDTH) as f32;
    let y = (coord.y * CHUNK_HEIGHT) as f32;

    // Monster palette for the 9x9-chunk area, blended from the two
    // neighboring area rows so adjacent areas share some types.
    let mut palette = Vec::with_capacity(6);
    for dx in -1..=1 {
        for dy in -1..=0 {
            let area_key = (coord.y.div_euclid(9) + dy) as i64 * BIG_NUMBER
                + (coord.x.div_euclid(9) + dx) as i64;
            let mut area_rng = tile_sequence(seed, area_key);
            palette.push(area_rng.next(BIG_NUMBER as i32)? as u32);
        }
    }

    let mut rng = tile_sequence(
        seed,
        (coord.x as i64) * 111 + (coord.y as i64) * 37 + coord.x as i64 + coord.y as i64,
    );

    let dead_end = is_dead_end(z, east, north, south);
    // Ground-level dead ends always get stairs; anything else is a coin.
    let stairs = dead_end && (rng.coin() || z == 0);
    let classification = if stairs {
        Classification::Stairway
    } else if dead_end {
        Classification::DeadEnd
    } else {
        Classification::Flat
    };

    let mut next_id = 0u32;
    let mut alloc = move || {
        let id = SurfaceId(next_id);
        next_id += 1;
        id
    };
    let mut surfaces = Vec::new();

    let directed_lighting_range;
    if stairs {
        let dz = (east - z) as f32;
        let run = CHUNK_WIDTH as f32;
        let width = (run * run + dz * dz).sqrt();
        let angle = dz.atan2(run);
        directed_lighting_range = Vec4::new(
            x,
            dz / run,
            z as f32 + DIRECTIONAL_LIGHT_EXTRA_Z,
            DIRECTIONAL_LIGHT_FADE_OUT,
        );
        surfaces.push(Surface::panel(
            alloc(),
            SurfaceKind::Floor,
            Vec3::new(x, y, z as f32),
            width,
            CHUNK_HEIGHT as f32,
            0.0,
            angle,
            NEUTRAL_FILL_COLOR,
            // Stretch the grid so its lines keep meeting the side walls.
            [2.0 / angle.cos(), 2.0],
            directed_lighting_range,
        ));
    } else {
        directed_lighting_range = Vec4::new(
            x,
            0.0,
            z as f32 + DIRECTIONAL_LIGHT_EXTRA_Z,
            DIRECTIONAL_LIGHT_FADE_OUT,
        );
        surfaces.push(Surface::panel(
            alloc(),
            SurfaceKind::Floor,
            Vec3::new(x, y, z as f32),
            CHUNK_WIDTH as f32,
            CHUNK_HEIGHT as f32,
            0.0,
            0.0,
            NEUTRAL_FILL_COLOR,
            [2.0, 2.0],
            directed_lighting_range,
        ));
    }

    // Boundary walls against higher neighbors. A stairway's slope replaces
    // its east wall; the west edge never needs one because heights only
    // climb eastward.
    if east > z && !stairs {
        surfaces.push(Surface::panel(
            alloc(),
            SurfaceKind::Wall,
            Vec3::new(x + CHUNK_WIDTH as f32, y, z as f32),
            (east - z) as f32,
            CHUNK_HEIGHT as f32,
            0.0,
            FRAC_PI_2,
            NEUTRAL_FILL_COLOR,
            [3.0, 2.0],
            directed_lighting_range,
        ));
    }
    if north > z {
        surfaces.push(Surface::panel(
            alloc(),
            SurfaceKind::Wall,
            Vec3::new(x, y + CHUNK_HEIGHT as f32, z as f32),
            CHUNK_WIDTH as f32,
            (north - z) as f32,
            FRAC_PI_2,
            0.0,
            NEUTRAL_FILL_COLOR,
            [2.0, 3.0],
            directed_lighting_range,
        ));
    }
    if south > z {
        surfaces.push(Surface::panel(
            alloc(),
            SurfaceKind::Wall,
            Vec3::new(x, y, south as f32),
            CHUNK_WIDTH as f32,
            (south - z) as f32,
            -FRAC_PI_2,
            0.0,
            NEUTRAL_FILL_COLOR,
            [2.0, 3.0],
            directed_lighting_range,
        ));
    }

    // The origin column and everything west of it stays clear of sites so
    // fresh worlds open onto safe ground.
    let site = coord.x > 0 && (rng.coin() || dead_end) && !stairs;
    let birth_roll = rng.next(9 + z)? == 0;
    let pre_liberated = birth_roll || coord.x < SAFE_ZONE_CHUNK_X;

    let mut building = None;
    let mut minibosses = Vec::new();
    if site {
        let mut shell_id = surfaces.len() as u32;
        building = Some(Building::generate(
            seed,
            coord,
            z,
            &mut rng,
            &palette,
            pre_liberated,
            store,
            directed_lighting_range,
            nearest_player,
            &mut shell_id,
        )?);
    } else {
        #[cfg(feature = "minibosses")]
        {
            let key = tile_key(seed, coord);
            let liberated = pre_liberated || read_liberated(store, &key);
            if !liberated && rng.next(MINIBOSS_DENIAL)? == 0 && z != 0 {
                let type_id = palette[rng.next(palette.len() as i32)? as usize];
                let radius = (BASE_RADIUS * (((z / WALL_DEPTH) as f32).sqrt() + 1.0))
                    .min(CHUNK_DIMENSION_MIN as f32 / 4.0);
                minibosses.push(MonsterSpawn {
                    type_id,
                    position: Vec3::new(
                        x + CHUNK_WIDTH as f32 / 2.0,
                        y + CHUNK_HEIGHT as f32 / 2.0,
                        z as f32 + WALL_DEPTH as f32 + radius,
                    ),
                    velocity: Vec3::ZERO,
                    radius,
                    birthday: 0.0,
                    lifespan: None,
                    // Killing the miniboss liberates the chunk it guards.
                    liberates: Some(key),
                });
            }
        }
    }

    log::trace!(
        "chunk {coord} z={z} {classification:?} building={} minibosses={}",
        building.is_some(),
        minibosses.len()
    );
    Ok(GeneratedChunk {
        coord,
        elevation: z,
        classification,
        surfaces,
        building,
        minibosses,
    })
}
