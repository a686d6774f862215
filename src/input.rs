//! Per-frame control input consumed by the simulation core.
//!
//! The core never sees raw keyboard or pointer events. Hosts translate their
//! device state into [`FrameInput`]: four held direction flags plus a single
//! edge-triggered interact command.

use glam::Vec3;

/// Held state of the four movement directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "This struct represents the pressed state of exactly four directional keys."
)]
pub struct MoveFlags {
    /// Move away from the camera (W or `ArrowUp`).
    pub forward: bool,
    /// Move towards the camera (S or `ArrowDown`).
    pub back: bool,
    /// Strafe to the camera's left (A or `ArrowLeft`).
    pub left: bool,
    /// Strafe to the camera's right (D or `ArrowRight`).
    pub right: bool,
}

impl MoveFlags {
    /// Returns `true` when any direction is held.
    #[must_use]
    pub const fn any(self) -> bool {
        self.forward || self.back || self.left || self.right
    }

    /// Flags with only `forward` held.
    #[must_use]
    pub const fn forward() -> Self {
        Self {
            forward: true,
            back: false,
            left: false,
            right: false,
        }
    }

    /// Flags with only `back` held.
    #[must_use]
    pub const fn back() -> Self {
        Self {
            forward: false,
            back: true,
            left: false,
            right: false,
        }
    }
}

/// Everything the simulation reads from the host for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Movement keys held during this frame.
    pub movement: MoveFlags,
    /// `true` on the single frame an interact command was issued.
    pub interact: bool,
}

impl FrameInput {
    /// Input holding only the given movement flags.
    #[must_use]
    pub const fn moving(movement: MoveFlags) -> Self {
        Self {
            movement,
            interact: false,
        }
    }

    /// Input carrying only an interact command.
    #[must_use]
    pub const fn interact() -> Self {
        Self {
            movement: MoveFlags {
                forward: false,
                back: false,
                left: false,
                right: false,
            },
            interact: true,
        }
    }
}

/// Maps a negative/positive key pair to an axis value.
pub(crate) const fn axis(neg: bool, pos: bool) -> f32 {
    match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

/// Composes a normalised ground-plane walking direction.
///
/// `camera_forward` is the camera's view direction projected onto the ground
/// plane, so "forward" always means "away from the camera". Right is derived
/// as `(-forward.z, 0, forward.x)`. Returns `None` when no key is held or
/// opposing keys cancel out.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use roamer::input::{compose_direction, MoveFlags};
///
/// let dir = compose_direction(MoveFlags::forward(), Vec3::Z).unwrap();
/// assert_eq!(dir, Vec3::Z);
///
/// let diagonal = MoveFlags { forward: true, right: true, ..Default::default() };
/// let dir = compose_direction(diagonal, Vec3::Z).unwrap();
/// assert!((dir.length() - 1.0).abs() < 1e-6);
///
/// assert!(compose_direction(MoveFlags::default(), Vec3::Z).is_none());
/// ```
#[must_use]
pub fn compose_direction(flags: MoveFlags, camera_forward: Vec3) -> Option<Vec3> {
    if !flags.any() {
        return None;
    }
    let right = Vec3::new(-camera_forward.z, 0.0, camera_forward.x);
    let raw = camera_forward * axis(flags.back, flags.forward) + right * axis(flags.left, flags.right);
    raw.try_normalize()
}
