use std::time::Instant;

use glam::Vec3;
use holdfast_core::constants::{CHUNK_WIDTH, WORLD_SEED};
use holdfast_core::monster::MonsterSpawn;
use holdfast_persist::MemoryFlagStore;
use holdfast_sim::WorldContext;
use holdfast_world::ActiveChunks;

use crate::scenes::{SceneConfig, SceneKind};

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub chunk_count: u32,
    pub building_count: u32,
    pub tick_count: u32,
    pub timings: TimingSeries,
}

pub struct BenchmarkRunner {
    tick_count: u32,
}

/// Minimal world the siege scenes drive controllers against.
struct BenchWorld {
    age: f32,
    aggro: f32,
    aggro_next: f32,
    player: Vec3,
    spawned: Vec<MonsterSpawn>,
}

impl WorldContext for BenchWorld {
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
        Some(self.player)
    }

    fn enemy_count(&self) -> usize {
        // Births never saturate: the scene wants the expensive path.
        0
    }

    fn spawn_monster(&mut self, spawn: MonsterSpawn) {
        self.spawned.push(spawn);
    }
}

impl BenchmarkRunner {
    pub fn new(tick_count: u32) -> Self {
        Self { tick_count }
    }

    pub fn run_scene(&self, config: &SceneConfig) -> BenchmarkResult {
        log::info!("Running scene '{}'...", config.name);
        let result = match config.kind {
            SceneKind::Streaming { start_x } => self.run_streaming(config.name, start_x),
            SceneKind::Siege { window_x } => self.run_siege(config.name, window_x),
        };
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms",
            result.timings.mean_ms,
            result.timings.p95_ms,
            result.timings.p99_ms
        );
        result
    }

    /// One tick = advance the window focus one chunk east, generating a
    /// fresh column.
    fn run_streaming(&self, name: &str, start_x: i32) -> BenchmarkResult {
        let store = MemoryFlagStore::new();
        let mut active = ActiveChunks::new(WORLD_SEED);
        let mut chunk_count = 0u32;
        let mut building_count = 0u32;
        let mut tick_times = Vec::with_capacity(self.tick_count as usize);

        for tick in 0..=self.tick_count {
            let focus = Vec3::new(((start_x + tick as i32) * CHUNK_WIDTH) as f32, 0.0, 0.0);

            let tick_start = Instant::now();
            let loaded = active
                .retarget(&store, Some(focus))
                .expect("generation failed");
            let elapsed = tick_start.elapsed().as_secs_f64() * 1000.0;

            for coord in &loaded {
                if active.get(*coord).and_then(|c| c.building.as_ref()).is_some() {
                    building_count += 1;
                }
            }
            chunk_count += loaded.len() as u32;
            // Tick zero fills the whole window; time only the steady state.
            if tick > 0 {
                tick_times.push(elapsed);
            }
        }

        BenchmarkResult {
            scene_name: name.to_string(),
            chunk_count,
            building_count,
            tick_count: self.tick_count,
            timings: compute_timings(&tick_times),
        }
    }

    /// One tick = a controller update for every building in the window,
    /// each with a player planted just inside its activation band.
    fn run_siege(&self, name: &str, window_x: i32) -> BenchmarkResult {
        let mut store = MemoryFlagStore::new();
        let mut active = ActiveChunks::new(WORLD_SEED);
        let focus = Vec3::new((window_x * CHUNK_WIDTH) as f32, 0.0, 0.0);
        let loaded = active
            .retarget(&store, Some(focus))
            .expect("generation failed");
        let chunk_count = loaded.len() as u32;

        let mut buildings: Vec<_> = active
            .iter_mut()
            .filter_map(|chunk| chunk.building.take())
            .collect();
        let building_count = buildings.len() as u32;

        let mut world = BenchWorld {
            age: 0.0,
            aggro: 0.0,
            aggro_next: 0.0,
            player: Vec3::ZERO,
            spawned: Vec::new(),
        };

        let dt = 16.0; // ~60Hz tick in ms
        let mut tick_times = Vec::with_capacity(self.tick_count as usize);
        for _ in 0..self.tick_count {
            let tick_start = Instant::now();
            for building in &mut buildings {
                // Keep a hit trickling in so damage, aggro and friendliness
                // all stay in motion.
                building.on_shell_hit(world.age);
                let center = building.center();
                world.player = Vec3::new(center.x + 9.0, center.y, 1.0);
                building
                    .update(&mut world, &mut store, dt)
                    .expect("update failed");
            }
            tick_times.push(tick_start.elapsed().as_secs_f64() * 1000.0);
            world.age += dt;
            world.aggro = world.aggro_next;
            world.aggro_next = 0.0;
        }
        log::info!(
            "  {} buildings, {} births, {} liberated",
            building_count,
            world.spawned.len(),
            buildings.iter().filter(|b| b.is_liberated()).count()
        );

        BenchmarkResult {
            scene_name: name.to_string(),
            chunk_count,
            building_count,
            tick_count: self.tick_count,
            timings: compute_timings(&tick_times),
        }
    }
}

/// Compute timing statistics from a list of tick times in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
