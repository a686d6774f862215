//! World layout and the aggregate simulation state.
//!
//! A [`WorldLayout`] describes where things are placed; [`WorldState`] is the
//! validated, live world built from it. The fleet and the landmark set are
//! fixed once the state exists.

use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::camera::{CameraState, Follow};
use crate::clock::{ClockError, WorldClock};
use crate::config::{ConfigError, SimConfig};
use crate::events::EventOutbox;
use crate::interaction::{InteractionRegistry, Landmark, LandmarkKind, ProximityTrigger};
use crate::locomotion::ControlState;
use crate::vector_math::clamp_to_bounds;
use crate::vehicle::{Fleet, Vehicle, VehicleId};

/// Placement of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    /// Identifier, unique within the layout.
    pub id: VehicleId,
    /// Non-blank display name.
    pub label: String,
    /// Parking spot, clamped into the world bound.
    pub position: Vec3,
    /// Initial yaw in radians.
    #[serde(default)]
    pub heading: f32,
}

/// Placement of one landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSpec {
    /// Category.
    pub kind: LandmarkKind,
    /// Centre, clamped into the world bound.
    pub position: Vec3,
    /// Activation radius; must be positive.
    pub radius: f32,
}

/// Initial placement of the actor, fleet and landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldLayout {
    /// Where the actor stands on a fresh session.
    pub actor_start: Vec3,
    /// Vehicles in scan order.
    pub vehicles: Vec<VehicleSpec>,
    /// Landmarks in any order; they are sorted by precedence on build.
    pub landmarks: Vec<LandmarkSpec>,
}

fn vehicle(id: u32, label: &str, x: f32, z: f32, heading: f32) -> VehicleSpec {
    VehicleSpec {
        id: VehicleId(id),
        label: label.to_owned(),
        position: Vec3::new(x, 0.0, z),
        heading,
    }
}

const fn landmark(kind: LandmarkKind, x: f32, z: f32, radius: f32) -> LandmarkSpec {
    LandmarkSpec {
        kind,
        position: Vec3::new(x, 0.0, z),
        radius,
    }
}

impl Default for WorldLayout {
    fn default() -> Self {
        Self {
            actor_start: Vec3::ZERO,
            vehicles: vec![
                vehicle(1, "Red Racer", 3.0, -25.0, 0.0),
                vehicle(2, "Blue Cruiser", -3.0, 0.0, PI),
                vehicle(3, "Yellow Taxi", 3.0, 40.0, 0.0),
                vehicle(4, "Green Machine", 50.0, 30.0, FRAC_PI_2),
            ],
            landmarks: vec![
                landmark(LandmarkKind::Dwelling, 35.0, -20.0, 10.0),
                landmark(LandmarkKind::Dispenser, -20.0, 50.0, 5.0),
                landmark(LandmarkKind::AboutSign, -8.0, -10.0, 4.0),
                landmark(LandmarkKind::GamesSign, -8.0, 15.0, 4.0),
            ],
        }
    }
}

/// Errors raised while building a [`WorldState`].
#[derive(Debug, thiserror::Error)]
pub enum WorldBuildError {
    /// Tuning failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Clock timing was rejected.
    #[error(transparent)]
    Clock(#[from] ClockError),
    /// Two vehicles share an id.
    #[error("vehicle id {0} is used more than once")]
    DuplicateVehicle(VehicleId),
    /// A vehicle label is blank.
    #[error("{0} has an empty label")]
    EmptyLabel(VehicleId),
    /// A landmark radius is zero, negative or not finite.
    #[error("{what} has a non-positive activation radius {radius}")]
    InvalidRadius {
        /// Landmark kind.
        what: String,
        /// Rejected radius.
        radius: f32,
    },
}

impl WorldLayout {
    fn fleet(&self, activation_radius: f32, bound: f32) -> Result<Fleet, WorldBuildError> {
        let mut seen = HashSet::new();
        let mut vehicles = Vec::with_capacity(self.vehicles.len());
        for spec in &self.vehicles {
            if !seen.insert(spec.id) {
                return Err(WorldBuildError::DuplicateVehicle(spec.id));
            }
            if spec.label.trim().is_empty() {
                return Err(WorldBuildError::EmptyLabel(spec.id));
            }
            vehicles.push(Vehicle::new(
                spec.id,
                spec.label.clone(),
                clamp_to_bounds(spec.position, bound),
                spec.heading,
                activation_radius,
            ));
        }
        Ok(Fleet::new(vehicles))
    }

    fn registry(&self, bound: f32) -> Result<InteractionRegistry, WorldBuildError> {
        let landmarks = self
            .landmarks
            .iter()
            .map(|spec| {
                if spec.radius.is_finite() && spec.radius > 0.0 {
                    Ok(Landmark::new(
                        spec.kind,
                        clamp_to_bounds(spec.position, bound),
                        spec.radius,
                    ))
                } else {
                    Err(WorldBuildError::InvalidRadius {
                        what: format!("{:?}", spec.kind),
                        radius: spec.radius,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InteractionRegistry::new(landmarks))
    }
}

/// The live world owned by the frame orchestrator.
#[derive(Debug, Clone)]
pub struct WorldState {
    /// Validated configuration the world was built from.
    pub config: SimConfig,
    /// Day/night clock.
    pub clock: WorldClock,
    /// The on-foot character.
    pub actor: Actor,
    /// Every vehicle, fixed after construction.
    pub fleet: Fleet,
    /// Walking, or driving a particular vehicle.
    pub control: ControlState,
    /// Interaction offer and landmark registry.
    pub proximity: ProximityTrigger,
    /// Smoothed follow camera.
    pub camera: CameraState,
    /// Events produced during the current frame.
    pub outbox: EventOutbox,
}

impl WorldState {
    /// Builds and validates a world from `config`.
    ///
    /// The camera starts at the ideal pose for the actor.
    ///
    /// # Errors
    ///
    /// Returns [`WorldBuildError`] for invalid tuning or an inconsistent
    /// layout.
    pub fn new(config: &SimConfig) -> Result<Self, WorldBuildError> {
        config.validate()?;
        let bound = config.world_bound;
        let clock = WorldClock::new(config.clock.half_cycle_secs, config.clock.max_frame_delta_secs)?;
        let fleet = config
            .layout
            .fleet(config.vehicle.activation_radius, bound)?;
        let registry = config.layout.registry(bound)?;
        let actor = Actor::new(clamp_to_bounds(config.layout.actor_start, bound));

        let mut world = Self {
            config: config.clone(),
            clock,
            actor,
            fleet,
            control: ControlState::Walking,
            proximity: ProximityTrigger::new(registry),
            camera: CameraState {
                position: Vec3::ZERO,
                look_at: Vec3::ZERO,
            },
            outbox: EventOutbox::default(),
        };
        world.camera = CameraState::snapped(world.follow_target(), &world.config.camera);
        world
            .proximity
            .refresh(world.actor.position, &world.fleet, false);
        info!(
            "world built with {} vehicles and {} landmarks",
            world.fleet.len(),
            world.proximity.registry().landmarks().len()
        );
        if world.fleet.is_empty() {
            warn!("layout places no vehicles; the actor can only walk");
        }
        Ok(world)
    }

    /// The vehicle currently being driven, if any.
    #[must_use]
    pub fn active_vehicle(&self) -> Option<&Vehicle> {
        self.control.vehicle().and_then(|id| self.fleet.get(id))
    }

    /// The entity the camera should track this frame.
    #[must_use]
    pub fn follow_target(&self) -> Follow {
        self.active_vehicle().map_or(
            Follow {
                position: self.actor.position,
                yaw: self.actor.facing,
                driving: false,
            },
            |v| Follow {
                position: v.position,
                yaw: v.heading,
                driving: true,
            },
        )
    }

    /// Teleports the walking actor, for restoring a saved session.
    ///
    /// Ignored while driving since the actor then mirrors its vehicle.
    pub fn place_actor(&mut self, position: Vec3) {
        if self.control.is_driving() {
            return;
        }
        self.actor.position = clamp_to_bounds(position, self.config.world_bound);
        self.camera = CameraState::snapped(self.follow_target(), &self.config.camera);
        self.proximity
            .refresh(self.actor.position, &self.fleet, false);
    }
}
