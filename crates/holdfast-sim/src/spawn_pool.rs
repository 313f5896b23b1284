//! Latent monster pool for one building shell.
//!
//! Monsters are not created on demand: the pool places latent spawns on
//! shell tiles first (lighting the tile's nest bit), and a separate birth
//! scan later promotes eligible ones into live monsters. Placement runs a
//! correlated random walk across the shell so consecutive spawns cluster.

use std::collections::BTreeMap;

use glam::Vec3;
use holdfast_core::constants::{
    AGGRO_ATTEMPT_DIVISOR, BASE_RADIUS, BUILDING_PLAYER_SPAWN_COS, INCUBATION_TIME, SMALL_NUMBER,
    SPAWN_ATTEMPT_BUDGET,
};
use holdfast_core::math::facing_cos;
use holdfast_core::monster::MonsterSpawn;
use holdfast_core::rng::SeededSequence;
use holdfast_core::surface::Surface;
use holdfast_core::CoreError;

/// Key of one occupied shell tile: (wall index, packed tile bit). Ordered
/// so the birth scan promotes tiles in a stable ascending order.
type TileSlot = (usize, u32);

#[derive(Debug, Clone)]
struct Walk {
    wall: usize,
    gx: i32,
    gy: i32,
    type_id: u32,
}

#[derive(Debug)]
pub struct SpawnPool {
    /// Concurrent latency budget: total shell footprint area. Births free
    /// budget back up, so a building keeps restocking over its lifetime.
    max_spawn_count: u32,
    spawn_count: u32,
    entries: BTreeMap<TileSlot, MonsterSpawn>,
    /// Current walk position. Persists across calls so interrupted walks
    /// resume where they stopped.
    walk: Walk,
    /// True while the previous placement round succeeded; the next round
    /// then steps the walk instead of picking a fresh tile.
    walking: bool,
}

impl SpawnPool {
    pub fn new(max_spawn_count: u32) -> Self {
        Self {
            max_spawn_count,
            spawn_count: 0,
            entries: BTreeMap::new(),
            walk: Walk {
                wall: 0,
                gx: 0,
                gy: 0,
                type_id: 0,
            },
            walking: false,
        }
    }

    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    pub fn max_spawn_count(&self) -> u32 {
        self.max_spawn_count
    }

    /// Latent spawns currently waiting on shell tiles.
    pub fn latent_count(&self) -> usize {
        self.entries.len()
    }

    /// True while every budgeted slot holds a latent spawn.
    pub fn exhausted(&self) -> bool {
        self.spawn_count >= self.max_spawn_count
    }

    pub fn walking(&self) -> bool {
        self.walking
    }

    pub fn set_walking(&mut self, walking: bool) {
        self.walking = walking;
    }

    pub fn occupied(&self, wall: usize, bit: u32) -> bool {
        self.entries.contains_key(&(wall, bit))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileSlot, &MonsterSpawn)> {
        self.entries.iter()
    }

    /// Try to place one latent spawn somewhere on the shell.
    ///
    /// Runs up to a budgeted number of attempts; higher aggro buys more.
    /// Each attempt either steps the current walk (when `walking`) or picks
    /// a fresh wall, tile and type. A tile takes the spawn only when it is
    /// inside the wall extent, on a vertical wall or the top roof,
    /// unoccupied, and (when a target is given and aggro is up) on a wall
    /// roughly facing the target. Returns Ok(true) on placement; running
    /// out of attempts or budget is Ok(false), not an error.
    pub fn try_spawn(
        &mut self,
        walls: &mut [Surface],
        roof: usize,
        rng: &mut SeededSequence,
        spawn_types: &[u32],
        now: f32,
        aggro: f32,
        target: Option<Vec3>,
    ) -> Result<bool, CoreError> {
        let budget =
            (rng.next(SPAWN_ATTEMPT_BUDGET)? as f32 + aggro / AGGRO_ATTEMPT_DIVISOR) as i32;
        let mut attempts = budget.min(SPAWN_ATTEMPT_BUDGET);

        while attempts > 0 && !self.exhausted() {
            attempts -= 1;
            if self.walking {
                self.walk.gx += rng.next(3)? - 1;
                self.walk.gy += rng.next(3)? - 1;
            } else {
                self.walk.type_id = spawn_types[rng.next(spawn_types.len() as i32)? as usize];
                self.walk.wall = rng.next(walls.len() as i32)? as usize;
                self.walk.gx = rng.next(walls[self.walk.wall].grid_width())?;
                self.walk.gy = rng.next(walls[self.walk.wall].grid_height())?;
            }

            let wall = &walls[self.walk.wall];
            let in_extent = self.walk.gx >= 0
                && self.walk.gy >= 0
                && self.walk.gx < wall.grid_width()
                && self.walk.gy < wall.grid_height();
            // Floors and stair slopes are never nest tiles; only vertical
            // shell walls and the top roof take spawns.
            if !in_extent || (wall.normal.z.abs() >= SMALL_NUMBER && self.walk.wall != roof) {
                continue;
            }

            let position = wall.tile_center_world(self.walk.gx, self.walk.gy, BASE_RADIUS + SMALL_NUMBER);
            let mut type_id = self.walk.type_id;
            if let Some(target) = target {
                // Spawns below the target, and all roof spawns, come out as
                // the flying variant so they can actually reach the player.
                if target.z > position.z || self.walk.wall == roof {
                    type_id = MonsterSpawn::flying_type(type_id);
                }
                let facing = facing_cos(position, target, wall.normal);
                let faces_target =
                    aggro == 0.0 || matches!(facing, Some(c) if c > BUILDING_PLAYER_SPAWN_COS);
                if !faces_target {
                    continue;
                }
            }

            let bit = (self.walk.gy * wall.grid_width() + self.walk.gx) as u32;
            let slot = (self.walk.wall, bit);
            if self.entries.contains_key(&slot) {
                continue;
            }

            let spawn = MonsterSpawn {
                type_id,
                position,
                // Latent drift away from the wall face, in the ground plane.
                velocity: Vec3::new(wall.normal.x, wall.normal.y, 0.0) * 0.001,
                radius: BASE_RADIUS,
                birthday: now + INCUBATION_TIME + rng.next(INCUBATION_TIME as i32)? as f32,
                lifespan: None,
                liberates: None,
            };
            self.entries.insert(slot, spawn);
            walls[self.walk.wall].set_light(bit, true);
            self.spawn_count += 1;
            return Ok(true);
        }
        Ok(false)
    }

    /// Promote the first birth-eligible latent spawn on `wall`, clearing
    /// its nest light. Scans tiles in ascending bit order so births are
    /// deterministic. None when the wall holds no eligible spawn.
    pub fn birth_from_wall(
        &mut self,
        walls: &mut [Surface],
        wall: usize,
        now: f32,
    ) -> Option<MonsterSpawn> {
        let slot = self
            .entries
            .range((wall, 0)..=(wall, u32::MAX))
            .find(|(_, spawn)| spawn.birthday < now)
            .map(|(slot, _)| *slot)?;
        let spawn = self.entries.remove(&slot)?;
        walls[wall].set_light(slot.1, false);
        self.spawn_count -= 1;
        Some(spawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use holdfast_core::surface::{SurfaceId, SurfaceKind};

    fn shell() -> Vec<Surface> {
        // Two vertical walls and a roof, 6x4 tiles each.
        let wall = |id: u32, rot_x: f32, rot_y: f32, kind| {
            Surface::panel(
                SurfaceId(id),
                kind,
                Vec3::ZERO,
                6.0,
                4.0,
                rot_x,
                rot_y,
                [0.0; 3],
                [1.0, 1.0],
                Vec4::ZERO,
            )
        };
        vec![
            wall(0, std::f32::consts::FRAC_PI_2, 0.0, SurfaceKind::Wall),
            wall(1, -std::f32::consts::FRAC_PI_2, 0.0, SurfaceKind::Wall),
            wall(2, 0.0, 0.0, SurfaceKind::Roof),
        ]
    }

    fn fill(pool: &mut SpawnPool, walls: &mut [Surface], rng: &mut SeededSequence) {
        let mut stalled = 0;
        while !pool.exhausted() && stalled < 999 {
            let before = pool.spawn_count();
            pool.try_spawn(walls, 2, rng, &[8, 12, 44], 0.0, 0.0, None)
                .unwrap();
            stalled = if pool.spawn_count() == before { stalled + 1 } else { 0 };
        }
    }

    #[test]
    fn test_placement_lights_tile_and_counts() {
        let mut walls = shell();
        let mut pool = SpawnPool::new(10);
        let mut rng = SeededSequence::new(5);
        fill(&mut pool, &mut walls, &mut rng);
        assert_eq!(pool.spawn_count(), 10);
        assert_eq!(pool.latent_count(), 10);
        let lit: u32 = walls
            .iter()
            .map(|w| w.grid_lighting.iter().map(|word| word.count_ones()).sum::<u32>())
            .sum();
        assert_eq!(lit, 10, "every latent spawn lights exactly one tile");
        // Every entry sits on a lit tile of its wall.
        for (&(wall, bit), _) in pool.iter() {
            assert!(walls[wall].light(bit));
        }
    }

    #[test]
    fn test_no_double_occupancy() {
        let mut walls = shell();
        // Budget above tile capacity: placements stop at distinct tiles.
        let mut pool = SpawnPool::new(500);
        let mut rng = SeededSequence::new(9);
        fill(&mut pool, &mut walls, &mut rng);
        let max_tiles = 3 * 6 * 4;
        assert!(pool.latent_count() <= max_tiles);
        // BTreeMap keys are unique by construction; check count coherence.
        assert_eq!(pool.latent_count() as u32, pool.spawn_count());
    }

    #[test]
    fn test_exhausted_pool_refuses() {
        let mut walls = shell();
        let mut pool = SpawnPool::new(1);
        let mut rng = SeededSequence::new(3);
        fill(&mut pool, &mut walls, &mut rng);
        assert!(pool.exhausted());
        let placed = pool
            .try_spawn(&mut walls, 2, &mut rng, &[8], 0.0, 0.0, None)
            .unwrap();
        assert!(!placed, "spent budget must return Ok(false), not place");
    }

    #[test]
    fn test_birth_scan_ascending_and_unlights() {
        let mut walls = shell();
        let mut pool = SpawnPool::new(8);
        let mut rng = SeededSequence::new(11);
        fill(&mut pool, &mut walls, &mut rng);
        let wall = pool.iter().next().map(|(&(w, _), _)| w).unwrap();
        let first_bit = pool
            .iter()
            .filter(|(&(w, _), _)| w == wall)
            .map(|(&(_, b), _)| b)
            .min()
            .unwrap();
        // All birthdays are < now for a large enough now.
        let now = 1.0e9;
        let born = pool.birth_from_wall(&mut walls, wall, now).unwrap();
        assert!(born.birthday < now);
        assert!(!walls[wall].light(first_bit), "birth clears the nest light");
        assert!(!pool.occupied(wall, first_bit));
    }

    #[test]
    fn test_birth_respects_birthday() {
        let mut walls = shell();
        let mut pool = SpawnPool::new(4);
        let mut rng = SeededSequence::new(2);
        let placed = {
            let mut any = false;
            for _ in 0..200 {
                if pool
                    .try_spawn(&mut walls, 2, &mut rng, &[8], 100.0, 0.0, None)
                    .unwrap()
                {
                    any = true;
                    break;
                }
            }
            any
        };
        assert!(placed);
        for wall in 0..walls.len() {
            // birthday >= 100 + INCUBATION_TIME; nothing births at age 100.
            assert!(pool.birth_from_wall(&mut walls, wall, 100.0).is_none());
        }
    }

    #[test]
    fn test_facing_constraint_under_aggro() {
        let mut walls = shell();
        // Target far on the -Y side; under aggro only the -Y facing wall
        // (index 0) may take spawns. Roof normal +Z never faces a level
        // target beyond the cosine threshold here because dz dominates.
        let target = Vec3::new(3.0, -100.0, 0.5);
        let mut pool = SpawnPool::new(50);
        let mut rng = SeededSequence::new(77);
        for _ in 0..500 {
            let _ = pool
                .try_spawn(&mut walls, 2, &mut rng, &[8], 0.0, 50.0, Some(target))
                .unwrap();
        }
        assert!(pool.latent_count() > 0, "some placements should land");
        for (&(wall, _), _) in pool.iter() {
            let cos = facing_cos(Vec3::ZERO, target, walls[wall].normal).unwrap();
            assert!(
                cos > BUILDING_PLAYER_SPAWN_COS || wall == 2,
                "wall {wall} does not face the target"
            );
        }
    }

    #[test]
    fn test_spawns_below_target_fly() {
        let mut walls = shell();
        // Target high overhead: every placement sits below it and must
        // come out as the flying variant (low type bits cleared).
        let target = Vec3::new(3.0, 2.0, 50.0);
        let mut pool = SpawnPool::new(200);
        let mut rng = SeededSequence::new(13);
        for _ in 0..2000 {
            let _ = pool
                .try_spawn(&mut walls, 2, &mut rng, &[0b111], 0.0, 0.0, Some(target))
                .unwrap();
        }
        assert!(pool.latent_count() > 0);
        for (_, spawn) in pool.iter() {
            assert_eq!(spawn.type_id & 3, 0);
        }
    }

    #[test]
    fn test_grounded_spawns_keep_their_type() {
        let mut walls = shell();
        // Target at floor level: wall spawns above it keep the full type;
        // only roof placements are forced airborne.
        let target = Vec3::new(3.0, 2.0, -10.0);
        let mut pool = SpawnPool::new(200);
        let mut rng = SeededSequence::new(29);
        for _ in 0..2000 {
            let _ = pool
                .try_spawn(&mut walls, 2, &mut rng, &[0b111], 0.0, 0.0, Some(target))
                .unwrap();
        }
        for (&(wall, _), spawn) in pool.iter() {
            if wall == 2 {
                assert_eq!(spawn.type_id & 3, 0, "roof spawns always fly");
            } else {
                assert_eq!(spawn.type_id, 0b111);
            }
        }
    }
}
