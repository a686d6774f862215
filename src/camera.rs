//! Third-person follow camera.
//!
//! The camera trails the controlled entity at a fixed offset rotated by the
//! entity's yaw, easing towards that ideal position every frame while always
//! looking at a point just above the entity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CAMERA_DRIVE_OFFSET, CAMERA_LOOK_HEIGHT, CAMERA_REFERENCE_FRAME_SECS, CAMERA_SMOOTHING,
    CAMERA_WALK_OFFSET,
};
use crate::vector_math::{ground_direction, rotate_y};

/// How the smoothing factor relates to frame time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraSmoothing {
    /// Apply the factor once per frame regardless of frame length.
    PerFrame,
    /// Scale the factor so the camera converges at the same rate at any
    /// frame rate; identical to `PerFrame` at the reference frame length.
    #[default]
    TimeNormalized,
}

/// Camera rig tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Offset from a walking actor before yaw rotation.
    pub walk_offset: Vec3,
    /// Offset from a driven vehicle before yaw rotation.
    pub drive_offset: Vec3,
    /// Height above the target the camera looks at.
    pub look_height: f32,
    /// Fraction of the remaining distance covered per reference frame.
    pub smoothing: f32,
    /// Whether `smoothing` is scaled by frame length.
    pub mode: CameraSmoothing,
    /// Frame length at which `smoothing` applies unscaled.
    pub reference_frame_secs: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            walk_offset: CAMERA_WALK_OFFSET,
            drive_offset: CAMERA_DRIVE_OFFSET,
            look_height: CAMERA_LOOK_HEIGHT,
            smoothing: CAMERA_SMOOTHING,
            mode: CameraSmoothing::default(),
            reference_frame_secs: CAMERA_REFERENCE_FRAME_SECS,
        }
    }
}

impl CameraTuning {
    /// Blend factor to apply for a frame of `dt` seconds.
    ///
    /// # Examples
    /// ```
    /// use roamer::camera::{CameraSmoothing, CameraTuning};
    ///
    /// let tuning = CameraTuning::default();
    /// assert!((tuning.alpha(1.0 / 60.0) - 0.06).abs() < 1e-6);
    /// assert_eq!(tuning.alpha(0.0), 0.0);
    ///
    /// let legacy = CameraTuning { mode: CameraSmoothing::PerFrame, ..tuning };
    /// assert_eq!(legacy.alpha(0.5), 0.06);
    /// ```
    #[must_use]
    pub fn alpha(&self, dt: f32) -> f32 {
        match self.mode {
            CameraSmoothing::PerFrame => self.smoothing,
            CameraSmoothing::TimeNormalized => {
                if dt <= 0.0 || self.reference_frame_secs <= 0.0 {
                    return 0.0;
                }
                let frames = dt / self.reference_frame_secs;
                1.0 - (1.0 - self.smoothing).powf(frames)
            }
        }
    }
}

/// The entity the camera is following this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follow {
    /// Ground position of the followed entity.
    pub position: Vec3,
    /// Its heading in radians.
    pub yaw: f32,
    /// Selects the driving offset.
    pub driving: bool,
}

/// Current camera pose.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraState {
    /// Eye position.
    pub position: Vec3,
    /// Point the camera is aimed at.
    pub look_at: Vec3,
}

/// The pose the camera is easing towards.
#[must_use]
pub fn ideal_pose(target: Follow, tuning: &CameraTuning) -> CameraState {
    let offset = if target.driving {
        tuning.drive_offset
    } else {
        tuning.walk_offset
    };
    CameraState {
        position: target.position + rotate_y(offset, target.yaw),
        look_at: target.position + Vec3::Y * tuning.look_height,
    }
}

impl CameraState {
    /// Places the camera directly at its ideal pose.
    #[must_use]
    pub fn snapped(target: Follow, tuning: &CameraTuning) -> Self {
        ideal_pose(target, tuning)
    }

    /// Eases the position towards the ideal pose; the look-at target is
    /// applied immediately.
    pub fn follow(&mut self, target: Follow, tuning: &CameraTuning, dt: f32) {
        let ideal = ideal_pose(target, tuning);
        self.position = self.position.lerp(ideal.position, tuning.alpha(dt));
        self.look_at = ideal.look_at;
    }

    /// Viewing direction flattened onto the ground, `+Z` when degenerate.
    #[must_use]
    pub fn ground_forward(&self) -> Vec3 {
        ground_direction(self.look_at - self.position).unwrap_or(Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::PI;

    fn walker(yaw: f32) -> Follow {
        Follow {
            position: Vec3::new(10.0, 0.0, 10.0),
            yaw,
            driving: false,
        }
    }

    #[rstest]
    fn ideal_sits_behind_and_above() {
        let pose = ideal_pose(walker(0.0), &CameraTuning::default());
        assert!(pose.position.abs_diff_eq(Vec3::new(10.0, 6.0, -2.0), 1e-5));
        assert!(pose.look_at.abs_diff_eq(Vec3::new(10.0, 2.0, 10.0), 1e-6));
    }

    #[rstest]
    fn ideal_rotates_with_yaw() {
        let pose = ideal_pose(walker(PI), &CameraTuning::default());
        assert!(pose.position.abs_diff_eq(Vec3::new(10.0, 6.0, 22.0), 1e-4));
    }

    #[rstest]
    fn driving_pulls_the_camera_back() {
        let target = Follow {
            driving: true,
            ..walker(0.0)
        };
        let pose = ideal_pose(target, &CameraTuning::default());
        assert!(pose.position.abs_diff_eq(Vec3::new(10.0, 8.0, -8.0), 1e-5));
    }

    #[rstest]
    fn follow_converges_independently_of_frame_rate() {
        let tuning = CameraTuning::default();
        let start = CameraState::snapped(walker(0.0), &tuning);
        let target = Follow {
            position: Vec3::new(20.0, 0.0, 10.0),
            ..walker(0.0)
        };

        let mut fast = start;
        for _ in 0..120 {
            fast.follow(target, &tuning, 1.0 / 120.0);
        }
        let mut slow = start;
        for _ in 0..30 {
            slow.follow(target, &tuning, 1.0 / 30.0);
        }
        assert_relative_eq!(fast.position.x, slow.position.x, epsilon = 1e-3);
    }

    #[rstest]
    fn ground_forward_points_away_from_camera() {
        let camera = CameraState::snapped(walker(0.0), &CameraTuning::default());
        assert!(camera.ground_forward().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[rstest]
    fn top_down_camera_falls_back_to_z() {
        let camera = CameraState {
            position: Vec3::new(0.0, 10.0, 0.0),
            look_at: Vec3::ZERO,
        };
        assert_eq!(camera.ground_forward(), Vec3::Z);
    }
}
