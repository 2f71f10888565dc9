//! Vector helpers on top of `glam::Vec2`

pub use glam::Vec2;

/// Distances below this are treated as coincident points.
pub const EPSILON: f32 = 1e-6;

/// Normal used when two centres coincide and no direction can be derived.
pub const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Unit direction of `delta` together with its length.
///
/// Returns `None` when `delta` is too short to normalize.
pub fn direction_and_length(delta: Vec2) -> Option<(Vec2, f32)> {
    let length = delta.length();
    if length > EPSILON {
        Some((delta / length, length))
    } else {
        None
    }
}

/// Kinetic energy of a point mass.
pub fn kinetic_energy(mass: f32, velocity: Vec2) -> f32 {
    0.5 * mass * velocity.length_squared()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_delta_has_no_direction() {
        assert!(direction_and_length(Vec2::ZERO).is_none());
        assert!(direction_and_length(Vec2::splat(1e-9)).is_none());
    }

    #[test]
    fn direction_is_unit_length() {
        let (dir, len) = direction_and_length(Vec2::new(3.0, 4.0)).unwrap();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((len - 5.0).abs() < 1e-6);
    }
}
