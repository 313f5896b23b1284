use glam::Vec3;
use holdfast_core::monster::MonsterSpawn;

/// Per-tick view of the world a building controller runs against. Passed
/// explicitly into every update so the data flow is visible at the call
/// site; controllers hold no reference back into the world.
pub trait WorldContext {
    /// World age in milliseconds.
    fn age(&self) -> f32;

    /// Aggregate aggro as of the end of the previous tick. Reading last
    /// tick's value keeps this tick's result independent of the order
    /// buildings update in.
    fn previous_aggro(&self) -> f32;

    /// Fold one building's damage into the aggregate for the next tick.
    fn raise_aggro(&mut self, damage: f32);

    /// Nearest live player to the given ground position, if any.
    fn nearest_player(&self, x: f32, y: f32) -> Option<Vec3>;

    /// Number of active enemies, checked against the global cap before a
    /// birth is attempted.
    fn enemy_count(&self) -> usize;

    /// Hand a birthed or miniboss monster over to the world.
    fn spawn_monster(&mut self, spawn: MonsterSpawn);
}
