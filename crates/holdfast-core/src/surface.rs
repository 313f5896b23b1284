//! Planar surface descriptors: floors, walls and roofs.
//!
//! The core decides which surfaces exist and with what extents; turning a
//! descriptor into GPU geometry is the renderer's job. The grid-lighting
//! words are consumed by the renderer as-is, so their packing scheme is part
//! of this type's contract.

use crate::constants::{LIGHT_WORDS, LIGHT_WORD_BITS};
use crate::types::BuildingId;
use glam::{Mat4, Vec3, Vec4};

/// Identifies one surface within its chunk. Stable across regeneration
/// because surfaces are always emitted in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Floor,
    Wall,
    Roof,
}

/// Back-reference from a shell surface to its owning building. Collision
/// events carry this instead of a captured callback; the driver routes the
/// hit to the owning controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellRef {
    pub building: BuildingId,
    pub wall: usize,
}

#[derive(Debug, Clone)]
pub struct Surface {
    pub id: SurfaceId,
    pub kind: SurfaceKind,
    pub origin: Vec3,
    /// Extent along the local X axis, in grid tiles.
    pub width: f32,
    /// Extent along the local Y axis, in grid tiles.
    pub height: f32,
    /// Outward unit normal (image of local +Z).
    pub normal: Vec3,
    /// Maps local grid points (gx, gy, lift) to world space.
    pub points_to_world: Mat4,
    pub fill_color: [f32; 3],
    /// Grid-line repeat hint for the renderer.
    pub tile_repeat: [f32; 2],
    /// Lighting hint shared by every surface of the chunk.
    pub directed_lighting_range: Vec4,
    /// One bit per grid tile, LIGHT_WORD_BITS per word. Lit bits mark
    /// occupied nest tiles.
    pub grid_lighting: [u32; LIGHT_WORDS],
    /// World age of the last shell hit, for damage-flash rendering.
    pub last_damage_age: f32,
    pub owner: Option<ShellRef>,
}

impl Surface {
    /// Build a panel at `origin` rotated by `rot_x` about the world X axis
    /// and `rot_y` about the world Y axis (positive `rot_y` raises the far
    /// +X edge). The unrotated panel lies in the XY plane with normal +Z.
    #[allow(clippy::too_many_arguments)]
    pub fn panel(
        id: SurfaceId,
        kind: SurfaceKind,
        origin: Vec3,
        width: f32,
        height: f32,
        rot_x: f32,
        rot_y: f32,
        fill_color: [f32; 3],
        tile_repeat: [f32; 2],
        directed_lighting_range: Vec4,
    ) -> Self {
        let rotation = Mat4::from_rotation_x(rot_x) * Mat4::from_rotation_y(-rot_y);
        let points_to_world = Mat4::from_translation(origin) * rotation;
        let normal = rotation.transform_vector3(Vec3::Z).normalize();
        Self {
            id,
            kind,
            origin,
            width,
            height,
            normal,
            points_to_world,
            fill_color,
            tile_repeat,
            directed_lighting_range,
            grid_lighting: [0; LIGHT_WORDS],
            last_damage_age: 0.0,
            owner: None,
        }
    }

    pub fn grid_width(&self) -> i32 {
        self.width as i32
    }

    pub fn grid_height(&self) -> i32 {
        self.height as i32
    }

    /// World position of the center of grid tile (gx, gy), lifted `lift`
    /// along the surface normal.
    pub fn tile_center_world(&self, gx: i32, gy: i32, lift: f32) -> Vec3 {
        self.points_to_world
            .transform_point3(Vec3::new(gx as f32 + 0.5, gy as f32 + 0.5, lift))
    }

    /// Set or clear one grid-lighting bit. Tiles beyond the packed range
    /// carry no light hint and are silently dropped.
    pub fn set_light(&mut self, bit: u32, on: bool) {
        let word = (bit / LIGHT_WORD_BITS) as usize;
        let offset = bit % LIGHT_WORD_BITS;
        if word >= LIGHT_WORDS {
            return;
        }
        if on {
            self.grid_lighting[word] |= 1 << offset;
        } else {
            self.grid_lighting[word] &= !(1 << offset);
        }
    }

    pub fn light(&self, bit: u32) -> bool {
        let word = (bit / LIGHT_WORD_BITS) as usize;
        let offset = bit % LIGHT_WORD_BITS;
        word < LIGHT_WORDS && self.grid_lighting[word] & (1 << offset) != 0
    }

    pub fn clear_lights(&mut self) {
        self.grid_lighting = [0; LIGHT_WORDS];
    }
}
