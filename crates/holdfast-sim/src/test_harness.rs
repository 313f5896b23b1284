//! Scripted world driver for controller scenarios.

use glam::{Vec3, Vec4};
use holdfast_core::monster::MonsterSpawn;
use holdfast_core::rng::tile_sequence;
use holdfast_core::types::ChunkCoord;
use holdfast_persist::MemoryFlagStore;

use crate::building::Building;
use crate::context::WorldContext;

pub struct TestWorld {
    pub age: f32,
    aggro: f32,
    aggro_next: f32,
    pub player: Option<Vec3>,
    pub spawned: Vec<MonsterSpawn>,
    /// Pretend enemies already alive, for cap scenarios.
    pub enemy_fill: usize,
}

impl TestWorld {
    pub fn new(player: Option<Vec3>) -> Self {
        Self {
            age: 0.0,
            aggro: 0.0,
            aggro_next: 0.0,
            player,
            spawned: Vec::new(),
            enemy_fill: 0,
        }
    }

    /// Run one building tick and roll the aggro aggregate over.
    pub fn tick(&mut self, building: &mut Building, store: &mut MemoryFlagStore, dt: f32) {
        building.update(self, store, dt).unwrap();
        self.age += dt;
        self.aggro = self.aggro_next;
        self.aggro_next = 0.0;
    }
}

impl WorldContext for TestWorld {
    fn age(&self) -> f32 {
        self.age
    }

    fn previous_aggro(&self) -> f32 {
        self.aggro
    }

    fn raise_aggro(&mut self, damage: f32) {
        self.aggro_next = self.aggro_next.max(damage);
    }

    fn nearest_player(&self, _x: f32, _y: f32) -> Option<Vec3> {
        self.player
    }

    fn enemy_count(&self) -> usize {
        self.spawned.len() + self.enemy_fill
    }

    fn spawn_monster(&mut self, spawn: MonsterSpawn) {
        self.spawned.push(spawn);
    }
}

pub const PALETTE: [u32; 6] = [101, 202, 303, 404, 505, 606];

pub fn make_building(
    seed: u32,
    coord: ChunkCoord,
    elevation: i32,
    pre_liberated: bool,
    store: &MemoryFlagStore,
) -> Building {
    let key = (coord.x as i64) * 111 + (coord.y as i64) * 37 + coord.x as i64 + coord.y as i64;
    let mut rng = tile_sequence(seed, key);
    let mut next_id = 0;
    Building::generate(
        seed,
        coord,
        elevation,
        &mut rng,
        &PALETTE,
        pre_liberated,
        store,
        Vec4::ZERO,
        None,
        &mut next_id,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use holdfast_core::constants::{GOOD_FILL_COLOR, LIGHT_WORDS, MAX_MONSTERS};
    use holdfast_core::types::tile_key;
    use holdfast_persist::{read_anchor, read_liberated, FlagStore};

    const COORD: IVec2 = IVec2::new(5, 0);

    #[test]
    fn test_generation_is_deterministic() {
        let store = MemoryFlagStore::new();
        let a = make_building(99, COORD, 8, false, &store);
        let b = make_building(99, COORD, 8, false, &store);
        assert_eq!(a.max_health, b.max_health);
        assert_eq!(a.shell().len(), b.shell().len());
        for (wa, wb) in a.shell().iter().zip(b.shell()) {
            assert_eq!(wa.origin, wb.origin);
            assert_eq!(wa.width, wb.width);
            assert_eq!(wa.height, wb.height);
            assert_eq!(wa.grid_lighting, wb.grid_lighting);
        }
        assert_eq!(a.pool().latent_count(), b.pool().latent_count());
    }

    #[test]
    fn test_hostile_building_preseeds() {
        let store = MemoryFlagStore::new();
        let building = make_building(99, COORD, 8, false, &store);
        assert!(!building.is_liberated());
        assert_eq!(building.damage(), 0.0);
        assert_eq!(building.friendliness, 0.0);
        assert_eq!(building.power, 0.0);
        assert!(building.pool().latent_count() > 0, "pool should pre-seed");
        assert!(building.max_health > 0.0);
        // Shell walls in multiples of five: four faces plus a roof.
        assert_eq!(building.shell().len() % 5, 0);
    }

    #[test]
    fn test_enough_hits_liberate_exactly_once() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let mut world = TestWorld::new(None);
        let key = tile_key(99, COORD);

        let hits = building.max_health.ceil() as usize + 1;
        for _ in 0..hits {
            building.on_shell_hit(world.age);
            world.tick(&mut building, &mut store, 0.01);
        }
        assert!(building.is_liberated());
        assert!(read_liberated(&store, &key));
        let anchor = read_anchor(&store, "99").unwrap().unwrap();
        assert_eq!(anchor[0], building.center().x);
        assert_eq!(anchor[1], building.center().y);
        for wall in building.shell() {
            assert_eq!(wall.grid_lighting, [0; LIGHT_WORDS], "lights cleared");
            assert_eq!(wall.fill_color, GOOD_FILL_COLOR);
        }
        assert_eq!(building.friendliness, 1.0);

        // Replaying hits and updates changes nothing further.
        let stored = store.get(&key);
        building.on_shell_hit(world.age);
        world.tick(&mut building, &mut store, 0.01);
        world.tick(&mut building, &mut store, 1000.0);
        assert!(building.is_liberated());
        assert_eq!(building.damage(), building.max_health);
        assert_eq!(store.get(&key), stored);
        assert!(world.spawned.is_empty(), "liberated buildings never spawn");
    }

    #[test]
    fn test_persisted_flag_survives_regeneration() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let mut world = TestWorld::new(None);
        let hits = building.max_health.ceil() as usize + 1;
        for _ in 0..hits {
            building.on_shell_hit(world.age);
            world.tick(&mut building, &mut store, 0.01);
        }
        assert!(building.is_liberated());

        // Rebuild from the same store: liberated at construction, inert.
        let reborn = make_building(99, COORD, 8, false, &store);
        assert!(reborn.is_liberated());
        assert_eq!(reborn.damage(), reborn.max_health);
        assert_eq!(reborn.pool().latent_count(), 0, "no pre-seed when liberated");
        for wall in reborn.shell() {
            assert_eq!(wall.fill_color, GOOD_FILL_COLOR);
            assert_eq!(wall.grid_lighting, [0; LIGHT_WORDS]);
        }
    }

    #[test]
    fn test_damage_regenerates_toward_zero() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let mut world = TestWorld::new(None);
        building.on_shell_hit(0.0);
        building.on_shell_hit(0.0);
        assert_eq!(building.damage(), 2.0);
        world.tick(&mut building, &mut store, 500.0);
        assert!(building.damage() < 2.0);
        for _ in 0..100 {
            world.tick(&mut building, &mut store, 500.0);
        }
        assert_eq!(building.damage(), 0.0, "regeneration floors at zero");
        assert!(!building.is_liberated());
    }

    #[test]
    fn test_damage_feeds_aggro() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let mut world = TestWorld::new(None);
        building.on_shell_hit(0.0);
        world.tick(&mut building, &mut store, 0.01);
        assert!(world.previous_aggro() > 0.0);
        assert!((world.previous_aggro() - building.damage()).abs() < 1e-3);
    }

    #[test]
    fn test_births_near_player() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        // ~9 units from the footprint center: inside the activation band.
        let player = Vec3::new(building.center().x + 9.0, building.center().y, 1.0);
        let mut world = TestWorld::new(Some(player));
        for _ in 0..400 {
            world.tick(&mut building, &mut store, 50.0);
        }
        assert!(
            !world.spawned.is_empty(),
            "latent spawns past incubation should birth near a player"
        );
        for spawn in &world.spawned {
            assert!(spawn.birthday < world.age);
            assert!(spawn.liberates.is_none());
        }
    }

    #[test]
    fn test_spawn_rounds_start_walks() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let player = Vec3::new(building.center().x + 9.0, building.center().y, 1.0);
        let mut world = TestWorld::new(Some(player));
        assert!(!building.pool().walking(), "pools start walk-less");
        let mut walked = false;
        for _ in 0..400 {
            world.tick(&mut building, &mut store, 50.0);
            walked |= building.pool().walking();
        }
        assert!(walked, "a successful placement round should start a walk");
    }

    #[test]
    fn test_no_births_at_enemy_cap() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let player = Vec3::new(building.center().x + 9.0, building.center().y, 1.0);
        let mut world = TestWorld::new(Some(player));
        world.enemy_fill = MAX_MONSTERS;
        for _ in 0..400 {
            world.tick(&mut building, &mut store, 50.0);
        }
        assert!(world.spawned.is_empty(), "cap must suppress births");
    }

    #[test]
    fn test_no_births_for_distant_player() {
        let mut store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let player = Vec3::new(building.center().x + 500.0, building.center().y, 1.0);
        let mut world = TestWorld::new(Some(player));
        for _ in 0..400 {
            world.tick(&mut building, &mut store, 50.0);
        }
        assert!(world.spawned.is_empty());
    }

    #[test]
    fn test_random_birth_liberation_is_not_persisted() {
        let store = MemoryFlagStore::new();
        let building = make_building(99, COORD, 8, true, &store);
        assert!(building.is_liberated());
        assert_eq!(building.damage(), building.max_health);
        assert_eq!(building.friendliness, 1.0);
        assert!(store.is_empty(), "birth liberation is not written back");
    }

    #[test]
    fn test_hits_clamp_at_max_health() {
        let store = MemoryFlagStore::new();
        let mut building = make_building(99, COORD, 8, false, &store);
        let hits = building.max_health.ceil() as usize + 50;
        for _ in 0..hits {
            building.on_shell_hit(0.0);
        }
        assert_eq!(building.damage(), building.max_health);
    }
}
