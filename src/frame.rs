//! Frame orchestrator.
//!
//! [`Simulation::tick`] is the only per-frame entry point. It runs the
//! subsystems in a fixed order (clock, interact command, locomotion,
//! proximity, camera), then publishes the frame to the collaborators.

use glam::Vec3;
use log::trace;

use crate::actor::LimbPose;
use crate::camera::CameraState;
use crate::clock::{DayPhase, Lighting};
use crate::config::SimConfig;
use crate::constants::SPEED_DISPLAY_SCALE;
use crate::events::{Collaborators, HudSnapshot, WorldEvent};
use crate::input::FrameInput;
use crate::locomotion::{self, InteractOutcome};
use crate::numeric::{expect_f32, speed_readout};
use crate::vehicle::{VehicleId, WHEEL_COUNT};
use crate::world::{WorldBuildError, WorldState};

/// Renderable state of the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActorPose {
    /// Ground position.
    pub position: Vec3,
    /// Yaw in radians.
    pub facing: f32,
    /// Swing angles for the four limbs.
    pub limbs: LimbPose,
    /// Vertical idle bob offset.
    pub bob: f32,
    /// `false` while the actor sits in a vehicle.
    pub visible: bool,
}

/// Renderable state of one vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    /// Vehicle this pose belongs to.
    pub id: VehicleId,
    /// Ground position.
    pub position: Vec3,
    /// Yaw in radians.
    pub heading: f32,
    /// Accumulated rotation of each wheel.
    pub wheel_spin: [f32; WHEEL_COUNT],
    /// `true` for the vehicle being driven.
    pub occupied: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSnapshot {
    /// Number of ticks completed, starting at one for the first frame.
    pub frame: u64,
    /// Simulated seconds since the session started.
    pub elapsed: f64,
    /// Actor pose.
    pub actor: ActorPose,
    /// One pose per vehicle, in fleet order.
    pub vehicles: Vec<VehiclePose>,
    /// Camera placement after smoothing.
    pub camera: CameraState,
    /// Light strengths and sun tint.
    pub lighting: Lighting,
    /// Darkness in `[0, 1]`.
    pub night_factor: f32,
    /// Current half of the cycle.
    pub day_phase: DayPhase,
}

/// Owns the world and drives it one frame at a time.
#[derive(Debug, Clone)]
pub struct Simulation {
    world: WorldState,
    snapshot: FrameSnapshot,
    hud: HudSnapshot,
}

impl Simulation {
    /// Builds a simulation from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldBuildError`] when the configuration or layout is
    /// invalid.
    pub fn new(config: &SimConfig) -> Result<Self, WorldBuildError> {
        WorldState::new(config).map(Self::from_world)
    }

    /// Wraps an already built world.
    #[must_use]
    pub fn from_world(world: WorldState) -> Self {
        let mut sim = Self {
            world,
            snapshot: FrameSnapshot::default(),
            hud: HudSnapshot::default(),
        };
        sim.capture();
        sim
    }

    /// Read access to the world.
    #[must_use]
    pub const fn world(&self) -> &WorldState {
        &self.world
    }

    /// Write access for restoring saved state between ticks.
    pub const fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    /// The snapshot produced by the most recent tick.
    #[must_use]
    pub const fn snapshot(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    /// The HUD values produced by the most recent tick.
    #[must_use]
    pub const fn hud(&self) -> &HudSnapshot {
        &self.hud
    }

    /// Applies an interact command between ticks.
    ///
    /// Events it produces are delivered by the next [`Self::tick`].
    pub fn interact(&mut self) -> InteractOutcome {
        let outcome = locomotion::interact(&mut self.world);
        let world = &mut self.world;
        world
            .proximity
            .refresh(world.actor.position, &world.fleet, world.control.is_driving());
        outcome
    }

    /// Advances the world by one frame and publishes the result.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &FrameInput,
        out: &mut Collaborators<'_>,
    ) -> &FrameSnapshot {
        let step = self.world.clock.advance(f64::from(dt));
        if step.night_began {
            self.world.outbox.push(WorldEvent::NightReached);
        }

        if input.interact {
            locomotion::interact(&mut self.world);
        }
        locomotion::update(&mut self.world, input.movement);

        let world = &mut self.world;
        world
            .proximity
            .refresh(world.actor.position, &world.fleet, world.control.is_driving());

        let target = world.follow_target();
        world
            .camera
            .follow(target, &world.config.camera, expect_f32(step.applied));

        self.snapshot.frame += 1;
        self.capture();
        trace!(
            "frame {} at t={:.3}s: {} events",
            self.snapshot.frame,
            self.snapshot.elapsed,
            self.world.outbox.len()
        );

        for event in self.world.outbox.drain() {
            out.events.dispatch(&event);
        }
        out.hud.present(&self.hud);
        out.renderer.render(&self.snapshot);
        &self.snapshot
    }

    fn capture(&mut self) {
        let world = &self.world;
        let snapshot = &mut self.snapshot;
        snapshot.elapsed = world.clock.elapsed();
        snapshot.actor = ActorPose {
            position: world.actor.position,
            facing: world.actor.facing,
            limbs: world.actor.limbs,
            bob: world.actor.bob,
            visible: world.actor.visible,
        };
        let active = world.control.vehicle();
        snapshot.vehicles.clear();
        snapshot.vehicles.extend(world.fleet.iter().map(|v| VehiclePose {
            id: v.id,
            position: v.position,
            heading: v.heading,
            wheel_spin: v.wheels.map(|w| w.spin),
            occupied: active == Some(v.id),
        }));
        snapshot.camera = world.camera;
        snapshot.night_factor = world.clock.night_factor();
        snapshot.lighting = world.clock.lighting();
        snapshot.day_phase = world.clock.day_phase();

        self.hud = HudSnapshot {
            prompt: world.proximity.prompt(&world.fleet).map(str::to_owned),
            drive_hud: world.control.is_driving(),
            speed: world
                .active_vehicle()
                .map_or(0, |v| speed_readout(v.velocity, SPEED_DISPLAY_SCALE)),
            time_of_day: world.clock.day_phase(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Detached;
    use crate::input::MoveFlags;
    use rstest::{fixture, rstest};

    #[fixture]
    fn sim() -> Simulation {
        Simulation::new(&SimConfig::default()).unwrap_or_else(|e| panic!("simulation: {e}"))
    }

    fn tick(sim: &mut Simulation, input: FrameInput) -> FrameSnapshot {
        let (mut a, mut b, mut c) = (Detached, Detached, Detached);
        sim.tick(0.016, &input, &mut Detached::bundle(&mut a, &mut b, &mut c))
            .clone()
    }

    #[rstest]
    fn initial_hud_offers_nearby_vehicle(sim: Simulation) {
        assert_eq!(sim.hud().prompt.as_deref(), Some("Press E to drive Blue Cruiser"));
        assert_eq!(sim.snapshot().frame, 0);
    }

    #[rstest]
    fn tick_counts_frames_and_time(mut sim: Simulation) {
        tick(&mut sim, FrameInput::default());
        let snapshot = tick(&mut sim, FrameInput::default());
        assert_eq!(snapshot.frame, 2);
        assert!((snapshot.elapsed - 0.032).abs() < 1e-6);
        assert_eq!(snapshot.vehicles.len(), 4);
    }

    #[rstest]
    fn driving_shows_speed_and_hides_prompt(mut sim: Simulation) {
        tick(&mut sim, FrameInput::interact());
        for _ in 0..3 {
            tick(&mut sim, FrameInput::moving(MoveFlags::forward()));
        }
        assert!(sim.hud().drive_hud);
        assert!(sim.hud().prompt.is_none());
        assert_eq!(sim.hud().speed, 24);
        assert!(sim.snapshot().vehicles.iter().any(|v| v.occupied));
        assert!(!sim.snapshot().actor.visible);
    }

    #[rstest]
    fn interact_between_ticks_takes_effect_immediately(mut sim: Simulation) {
        let outcome = sim.interact();
        assert_eq!(outcome, InteractOutcome::Entered(VehicleId(2)));
        assert!(!sim.world().outbox.is_empty());
        tick(&mut sim, FrameInput::default());
        assert!(sim.world().outbox.is_empty());
    }
}
