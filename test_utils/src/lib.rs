//! Utility helpers for tests.
//!
//! Provides recording collaborators that capture everything the simulation
//! pushes out, plus builders for common world setups.

use glam::Vec3;
use roamer::world::{LandmarkSpec, VehicleSpec};
use roamer::{
    Collaborators, EventSink, FrameInput, FrameSnapshot, HudSink, HudSnapshot, LandmarkKind,
    SceneRenderer, SimConfig, Simulation, VehicleId, WorldEvent,
};

/// Frame length used by most scenarios, in seconds.
pub const FRAME_DT: f32 = 0.016;

/// Every world event dispatched, in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog(pub Vec<WorldEvent>);

impl EventSink for EventLog {
    fn dispatch(&mut self, event: &WorldEvent) {
        self.0.push(*event);
    }
}

/// Every HUD snapshot presented, in order.
#[derive(Debug, Default, Clone)]
pub struct HudLog(pub Vec<HudSnapshot>);

impl HudSink for HudLog {
    fn present(&mut self, hud: &HudSnapshot) {
        self.0.push(hud.clone());
    }
}

/// The most recent frame handed to the renderer and a frame count.
#[derive(Debug, Default, Clone)]
pub struct FrameLog {
    pub last: Option<FrameSnapshot>,
    pub count: usize,
}

impl SceneRenderer for FrameLog {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.last = Some(frame.clone());
        self.count += 1;
    }
}

/// A full set of recording collaborators.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub events: EventLog,
    pub hud: HudLog,
    pub frames: FrameLog,
}

impl Recorder {
    /// Borrows the recorder as a collaborator bundle for one tick.
    pub fn collaborators(&mut self) -> Collaborators<'_> {
        Collaborators {
            events: &mut self.events,
            hud: &mut self.hud,
            renderer: &mut self.frames,
        }
    }

    /// Counts recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&WorldEvent) -> bool) -> usize {
        self.events.0.iter().filter(|e| predicate(*e)).count()
    }

    /// The latest HUD snapshot, if any frame has run.
    pub fn last_hud(&self) -> Option<&HudSnapshot> {
        self.hud.0.last()
    }
}

/// Builds a simulation from `config`.
///
/// # Panics
/// Panics if the configuration does not produce a valid world.
pub fn simulation(config: &SimConfig) -> Simulation {
    Simulation::new(config).unwrap_or_else(|e| panic!("failed to build simulation: {e}"))
}

/// Ticks `sim` `frames` times with the same input and frame length.
pub fn run_frames(
    sim: &mut Simulation,
    recorder: &mut Recorder,
    frames: usize,
    dt: f32,
    input: FrameInput,
) {
    for _ in 0..frames {
        sim.tick(dt, &input, &mut recorder.collaborators());
    }
}

/// A configuration whose world holds only the given vehicles and landmarks.
pub fn sparse_config(
    actor_start: Vec3,
    vehicles: Vec<VehicleSpec>,
    landmarks: Vec<LandmarkSpec>,
) -> SimConfig {
    let mut config = SimConfig::default();
    config.layout.actor_start = actor_start;
    config.layout.vehicles = vehicles;
    config.layout.landmarks = landmarks;
    config
}

/// Shorthand for a vehicle placement.
pub fn vehicle_at(id: u32, label: &str, position: Vec3, heading: f32) -> VehicleSpec {
    VehicleSpec {
        id: VehicleId(id),
        label: label.to_owned(),
        position,
        heading,
    }
}

/// Shorthand for a landmark placement.
pub fn landmark_at(kind: LandmarkKind, position: Vec3, radius: f32) -> LandmarkSpec {
    LandmarkSpec {
        kind,
        position,
        radius,
    }
}
