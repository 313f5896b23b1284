use glam::Vec3;

/// Euclidean (always non-negative) remainder for i32.
pub fn positive_mod(value: i32, modulus: i32) -> i32 {
    value.rem_euclid(modulus)
}

/// Cosine of the angle between the direction `from -> to` and `normal`.
/// Returns None when the two points coincide.
pub fn facing_cos(from: Vec3, to: Vec3, normal: Vec3) -> Option<f32> {
    let diff = to - from;
    let distance = diff.length();
    if distance <= f32::EPSILON {
        return None;
    }
    Some((diff / distance).dot(normal))
}
