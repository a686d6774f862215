#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the Roamer simulation core.
//!
//! A single actor explores an open world, drives vehicles and triggers
//! proximity interactions while a day/night cycle runs. The core is plain
//! data driven by [`Simulation::tick`]; [`SimulationPlugin`] hosts it inside a
//! Bevy app and, with the `render` feature, [`PresentationPlugin`] draws it.
pub mod actor;
pub mod camera;
pub mod clock;
pub mod components;
pub mod config;
pub mod constants;
pub mod events;
pub mod frame;
pub mod input;
pub mod interaction;
pub mod locomotion;
pub mod logging;
pub mod numeric;
pub mod plugin;
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub mod presentation;
pub mod save;
pub mod vector_math;
pub mod vehicle;
pub mod world;

pub use actor::{Actor, LimbPose, WalkTuning};
pub use camera::{CameraSmoothing, CameraState, CameraTuning};
pub use clock::{ClockError, DayPhase, Lighting, WorldClock};
pub use config::{ConfigError, SimConfig};
pub use events::{
    Collaborators, Detached, EventSink, HudSink, HudSnapshot, Panel, SceneRenderer, SoundCue,
    WorldEvent,
};
pub use frame::{FrameSnapshot, Simulation};
pub use input::{FrameInput, MoveFlags};
pub use interaction::{InteractAction, LandmarkKind, SignPanel};
pub use locomotion::{ControlState, InteractOutcome};
pub use logging::init as init_logging;
pub use plugin::{SimEvent, SimulationPlugin, SimulationState};
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use presentation::PresentationPlugin;
pub use save::{SaveError, SaveState};
pub use vehicle::{Vehicle, VehicleId, VehicleTuning};
pub use world::{WorldBuildError, WorldLayout, WorldState};
