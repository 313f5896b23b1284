//! Per-tick building behavior: passive regeneration, spawn placement,
//! births, shell hits and the one-way liberation transition.

use glam::Vec3;
use holdfast_core::constants::{
    AGGRO_DISTANCE_DIVISOR, BASE_BUILDING_BIRTH_INTERVAL, BUILDING_DAMAGE_POWER_DIV,
    BUILDING_PLAYER_SPAWN_COS, GOOD_FILL_COLOR, MAX_BUILDING_ACTIVATION_DISTANCE, MAX_MONSTERS,
    MIN_BUILDING_ACTIVATION_DISTANCE, PASSIVE_REGEN_DIVISOR, SPAWN_JUMP_INTERVAL,
    SPAWN_REST_INTERVAL,
};
use holdfast_core::CoreError;
use holdfast_persist::{write_anchor, write_liberated, FlagStore};

use crate::building::Building;
use crate::context::WorldContext;

impl Building {
    /// Advance the building by `dt` milliseconds.
    ///
    /// Hostile buildings regenerate (damage decays), feed their damage into
    /// the world's aggro aggregate, keep the latent pool stocked while a
    /// player is around, and birth monsters at walls facing the player.
    /// Once damage reaches max health the building liberates; from then on
    /// update is a no-op.
    pub fn update(
        &mut self,
        ctx: &mut dyn WorldContext,
        store: &mut dyn FlagStore,
        dt: f32,
    ) -> Result<(), CoreError> {
        if self.damage < self.max_health {
            self.damage = (self.damage - dt / PASSIVE_REGEN_DIVISOR).max(0.0);
            ctx.raise_aggro(self.damage);

            if let Some(player) = ctx.nearest_player(self.center.x, self.center.y) {
                self.step_spawning(ctx, player, dt)?;
                self.step_births(ctx, player, dt)?;
            }
        } else {
            self.liberate(store);
        }

        if self.damage != self.previous_damage {
            self.previous_damage = self.damage;
            self.recompute_derived();
        }
        Ok(())
    }

    fn step_spawning(
        &mut self,
        ctx: &mut dyn WorldContext,
        player: Vec3,
        dt: f32,
    ) -> Result<(), CoreError> {
        self.next_spawn -= dt;
        if self.next_spawn >= 0.0 {
            return Ok(());
        }
        let placed = self.pool.try_spawn(
            &mut self.walls,
            self.roof,
            &mut self.rng,
            &self.spawn_types,
            ctx.age(),
            ctx.previous_aggro(),
            Some(player),
        )?;
        if placed {
            self.next_spawn += SPAWN_JUMP_INTERVAL;
        } else {
            self.next_spawn = SPAWN_REST_INTERVAL;
        }
        self.pool.set_walking(placed);
        Ok(())
    }

    fn step_births(
        &mut self,
        ctx: &mut dyn WorldContext,
        player: Vec3,
        dt: f32,
    ) -> Result<(), CoreError> {
        let diff = Vec3::new(player.x - self.center.x, player.y - self.center.y, 0.0);
        let distance = diff.length();
        let reach =
            MAX_BUILDING_ACTIVATION_DISTANCE + ctx.previous_aggro() / AGGRO_DISTANCE_DIVISOR;
        if distance <= MIN_BUILDING_ACTIVATION_DISTANCE
            || distance >= reach
            || ctx.enemy_count() >= MAX_MONSTERS
        {
            return Ok(());
        }
        self.next_birth -= dt;
        if self.next_birth >= 0.0 {
            return Ok(());
        }
        // One wall candidate per attempt; it must roughly face the player
        // (the roof always qualifies) or the timer stays expired and the
        // next tick redraws.
        let wall = self.rng.next(self.walls.len() as i32)? as usize;
        let faces_player = wall == self.roof
            || (distance > 0.0
                && (diff / distance).dot(self.walls[wall].normal) > BUILDING_PLAYER_SPAWN_COS);
        if !faces_player {
            return Ok(());
        }
        if let Some(spawn) = self.pool.birth_from_wall(&mut self.walls, wall, ctx.age()) {
            ctx.spawn_monster(spawn);
            self.next_birth = BASE_BUILDING_BIRTH_INTERVAL;
        }
        Ok(())
    }

    /// Register one shell hit: stamp the damage flash on every shell
    /// surface and add a point of damage, clamped at max health.
    pub fn on_shell_hit(&mut self, age: f32) {
        for wall in &mut self.walls {
            wall.last_damage_age = age;
        }
        self.damage = (self.damage + 1.0).min(self.max_health);
    }

    /// One-way hostile -> liberated transition. Persists the liberation
    /// marker and the world anchor, clears every nest light and recolors
    /// the shell. Safe to replay.
    pub(crate) fn liberate(&mut self, store: &mut dyn FlagStore) {
        if self.liberated {
            return;
        }
        self.liberated = true;
        write_liberated(store, &self.tile_key);
        let anchor = self.anchor();
        write_anchor(store, &self.anchor_key, [anchor.x, anchor.y, anchor.z]);
        for wall in &mut self.walls {
            wall.clear_lights();
            wall.fill_color = GOOD_FILL_COLOR;
        }
        log::info!("building {} liberated at {anchor}", self.tile_key);
    }

    /// Derive friendliness (squared damage fraction) and power from the
    /// current damage.
    pub(crate) fn recompute_derived(&mut self) {
        let friendliness = (self.damage / self.max_health).clamp(0.0, 1.0);
        self.friendliness = friendliness * friendliness;
        self.power = self.friendliness * self.max_health / BUILDING_DAMAGE_POWER_DIV;
    }
}
