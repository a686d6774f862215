//! The player-controlled walking actor.
//!
//! Walking is integrated once per frame. Positions are clamped to the world
//! bound after every move so the actor can never leave the playable square.
use glam::Vec3;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ANIMATION_RATE, IDLE_BOB_AMPLITUDE, IDLE_BOB_FREQUENCY, LEG_SWING_RATIO, LIMB_IDLE_DECAY,
    LIMB_SWING_AMPLITUDE, LIMB_SWING_FREQUENCY, WALK_PROGRESS_SCALE, WALK_SPEED,
};
use crate::numeric::expect_f32;
use crate::vector_math::{clamp_to_bounds, yaw_of};

/// Walking tuning, per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkTuning {
    /// World units covered per frame while a direction is held.
    pub speed: f32,
    /// Animation phase advanced per unit of distance.
    pub animation_rate: f32,
}

impl Default for WalkTuning {
    fn default() -> Self {
        Self {
            speed: WALK_SPEED,
            animation_rate: ANIMATION_RATE,
        }
    }
}

/// Swing angles of the four limbs, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LimbPose {
    /// Left arm swing about the shoulder.
    pub left_arm: f32,
    /// Right arm swing about the shoulder.
    pub right_arm: f32,
    /// Left leg swing about the hip.
    pub left_leg: f32,
    /// Right leg swing about the hip.
    pub right_leg: f32,
}

impl LimbPose {
    /// Walking pose for an animation phase. Arms and legs swing in
    /// opposition, legs at a reduced amplitude.
    #[must_use]
    pub fn swing(phase: f32) -> Self {
        let s = (phase * LIMB_SWING_FREQUENCY).sin() * LIMB_SWING_AMPLITUDE;
        let leg = s * LEG_SWING_RATIO;
        Self {
            left_arm: s,
            right_arm: -s,
            left_leg: -leg,
            right_leg: leg,
        }
    }

    /// Relaxes every limb towards rest by `factor`.
    pub const fn decay(&mut self, factor: f32) {
        self.left_arm *= factor;
        self.right_arm *= factor;
        self.left_leg *= factor;
        self.right_leg *= factor;
    }
}

/// The walking character.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Feet position on the ground plane.
    pub position: Vec3,
    /// Yaw in radians; zero faces `+Z`.
    pub facing: f32,
    /// Accumulated walk cycle driving the limb swing.
    pub animation_phase: f32,
    /// Current limb swing.
    pub limbs: LimbPose,
    /// Vertical idle offset applied to the body mesh only.
    pub bob: f32,
    /// Hidden while seated in a vehicle.
    pub visible: bool,
}

impl Actor {
    /// A visible actor standing at rest at `position`.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            facing: 0.0,
            animation_phase: 0.0,
            limbs: LimbPose::default(),
            bob: 0.0,
            visible: true,
        }
    }

    /// Advances one walking frame.
    ///
    /// With a direction the actor moves, turns to face it and animates, and
    /// the scaled walked distance is returned. Without one the limbs relax
    /// and the body bobs on `elapsed`.
    pub fn step(
        &mut self,
        direction: Option<Vec3>,
        elapsed: f64,
        tuning: &WalkTuning,
        bound: f32,
    ) -> Option<f32> {
        let Some(heading) = direction else {
            self.limbs.decay(LIMB_IDLE_DECAY);
            self.bob = expect_f32((elapsed * IDLE_BOB_FREQUENCY).sin()) * IDLE_BOB_AMPLITUDE;
            return None;
        };

        self.position = clamp_to_bounds(self.position + heading * tuning.speed, bound);
        self.facing = yaw_of(heading);
        self.animation_phase += tuning.speed * tuning.animation_rate;
        self.limbs = LimbPose::swing(self.animation_phase);
        self.bob = 0.0;
        trace!("actor walked to {:?}", self.position);
        Some(tuning.speed * WALK_PROGRESS_SCALE)
    }

    /// Seats the actor in a vehicle at `at`.
    pub const fn board(&mut self, at: Vec3) {
        self.position = at;
        self.visible = false;
        self.bob = 0.0;
    }

    /// Keeps a seated actor on top of its vehicle.
    pub const fn ride(&mut self, at: Vec3) {
        self.position = at;
    }

    /// Places the actor back on foot at `at`, clamped to `bound`.
    pub fn alight(&mut self, at: Vec3, bound: f32) {
        self.position = clamp_to_bounds(at, bound);
        self.visible = true;
    }
}
