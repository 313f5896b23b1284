use glam::Vec3;

/// A monster spawn request: the decision to put a monster into the world.
/// Mesh construction from `type_id` belongs to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterSpawn {
    /// Procedural type seed; the low two bits cleared mark a flying variant.
    pub type_id: u32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    /// World age after which a latent monster may be birthed.
    pub birthday: f32,
    /// Lifespan in ms; None for unbounded (minibosses).
    pub lifespan: Option<f32>,
    /// TileKey to persist as liberated when this monster dies. Carried by
    /// minibosses instead of a death callback.
    pub liberates: Option<String>,
}

impl MonsterSpawn {
    /// Clear the low type bits, forcing the flying variant.
    pub fn flying_type(type_id: u32) -> u32 {
        type_id & !3
    }
}
