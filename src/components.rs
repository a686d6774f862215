//! ECS marker components tying scene entities to simulation objects.
//! The presentation layer queries these to copy each frame's snapshot onto
//! transforms.
use bevy::prelude::*;

use crate::interaction::LandmarkKind;
use crate::vehicle::VehicleId;

/// The actor's body root.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct ActorBody;

/// One of the actor's four swinging limbs.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limb {
    /// Swings with the phase sine.
    LeftArm,
    /// Mirrors the left arm.
    RightArm,
    /// Swings against the left arm at a reduced amplitude.
    LeftLeg,
    /// Mirrors the left leg.
    RightLeg,
}

/// A vehicle's body root.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleBody(pub VehicleId);

/// A wheel child of a [`VehicleBody`], indexed into its wheel array.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelMesh {
    /// Owning vehicle.
    pub vehicle: VehicleId,
    /// Position in the owner's wheel array.
    pub index: usize,
}

/// Static landmark geometry.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandmarkBody(pub LandmarkKind);

/// The directional light driven by the day/night cycle.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct SunLight;

/// Marker component for the follow camera.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct CameraController;
