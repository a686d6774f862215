//! Ground-plane vector helpers.
//! Small helpers for headings, yaw rotation and world-bound clamping.
use glam::{Quat, Vec3};

/// Returns the unit forward vector for a yaw angle.
///
/// A heading of zero faces `+Z`; positive angles turn towards `+X`.
///
/// # Examples
/// ```
/// use roamer::vector_math::heading_vector;
/// let forward = heading_vector(std::f32::consts::FRAC_PI_2);
/// assert!((forward.x - 1.0).abs() < 1e-6);
/// assert!(forward.z.abs() < 1e-6);
/// ```
#[must_use]
pub fn heading_vector(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Rotates `offset` about the world `Y` axis by `angle` radians.
#[must_use]
pub fn rotate_y(offset: Vec3, angle: f32) -> Vec3 {
    Quat::from_rotation_y(angle) * offset
}

/// Returns the yaw that faces along the horizontal part of `direction`.
///
/// This is the inverse of [`heading_vector`] for unit ground vectors.
#[must_use]
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Projects `direction` onto the ground plane and normalises it.
///
/// Returns `None` for non-finite input or when nothing horizontal remains,
/// such as a camera looking straight down.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use roamer::vector_math::ground_direction;
///
/// let dir = ground_direction(Vec3::new(3.0, -9.0, 4.0)).unwrap();
/// assert!((dir.x - 0.6).abs() < 1e-6);
/// assert_eq!(dir.y, 0.0);
/// assert!((dir.z - 0.8).abs() < 1e-6);
///
/// assert!(ground_direction(Vec3::new(0.0, -1.0, 0.0)).is_none());
/// ```
#[must_use]
pub fn ground_direction(direction: Vec3) -> Option<Vec3> {
    if !direction.is_finite() {
        return None;
    }
    Vec3::new(direction.x, 0.0, direction.z).try_normalize()
}

/// Clamps the horizontal components of `position` into `[-bound, bound]`.
///
/// The vertical component is left untouched.
#[must_use]
pub const fn clamp_to_bounds(position: Vec3, bound: f32) -> Vec3 {
    Vec3::new(
        position.x.clamp(-bound, bound),
        position.y,
        position.z.clamp(-bound, bound),
    )
}
