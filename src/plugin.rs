//! Bevy plugin driving the simulation from the `Update` schedule.
//!
//! Keyboard state is folded into [`FrameControls`], the simulation ticks
//! once per app update, and every world event is re-published as a
//! [`SimEvent`] so observers can react to it. The latest HUD values and
//! render snapshot are kept in resources for the presentation layer.

use std::path::PathBuf;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{error, info};
use thiserror::Error;

use crate::config::SimConfig;
use crate::events::{
    Collaborators, EventSink, HudSink, HudSnapshot, SceneRenderer, WorldEvent,
};
use crate::frame::{FrameSnapshot, Simulation};
use crate::input::{FrameInput, MoveFlags};
use crate::save::SaveState;

/// The running simulation.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct SimulationState(pub Simulation);

/// Input gathered for the next tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct FrameControls(pub FrameInput);

/// HUD values from the latest tick.
#[derive(Resource, Debug, Clone, Default, PartialEq, Deref)]
pub struct HudState(pub HudSnapshot);

impl HudSink for HudState {
    fn present(&mut self, hud: &HudSnapshot) {
        self.0.clone_from(hud);
    }
}

/// Render snapshot from the latest tick.
#[derive(Resource, Debug, Clone, Default, PartialEq, Deref)]
pub struct LatestFrame(pub FrameSnapshot);

impl SceneRenderer for LatestFrame {
    fn render(&mut self, frame: &FrameSnapshot) {
        self.0.clone_from(frame);
    }
}

/// Where the session is persisted on exit.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SavePath(pub PathBuf);

/// A world event re-published for Bevy observers.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SimEvent(pub WorldEvent);

/// Where a [`SimulationError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationErrorContext {
    /// Building the world from configuration.
    Init,
    /// Reading the save file.
    Restore,
    /// Writing the save file.
    Persist,
}

/// Raised when the plugin hits an error it cannot propagate.
#[derive(Event, Debug, Clone, Error)]
#[error("{context:?}: {detail}")]
pub struct SimulationError {
    /// Stage that failed.
    pub context: SimulationErrorContext,
    /// Rendered underlying error.
    pub detail: String,
}

impl SimulationError {
    /// Wraps an error message with its stage.
    #[must_use]
    pub fn new(context: SimulationErrorContext, detail: impl Into<String>) -> Self {
        Self {
            context,
            detail: detail.into(),
        }
    }
}

/// System set containing input gathering and the simulation tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

#[derive(Default)]
struct EventBuffer(Vec<WorldEvent>);

impl EventSink for EventBuffer {
    fn dispatch(&mut self, event: &WorldEvent) {
        self.0.push(*event);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_simulation_error(event: On<SimulationError>) {
    let SimulationError { context, detail } = event.event();
    error!("simulation error during {context:?}: {detail}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_sim_event(event: On<SimEvent>) {
    let SimEvent(inner) = event.event();
    if !matches!(inner, WorldEvent::Walked { .. }) {
        info!("world event: {inner:?}");
    }
}

/// Maps WASD/arrow keys and `E` onto [`FrameControls`].
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn read_keyboard_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut controls: ResMut<FrameControls>,
) {
    let held = |a: KeyCode, b: KeyCode| keyboard.pressed(a) || keyboard.pressed(b);
    controls.0 = FrameInput {
        movement: MoveFlags {
            forward: held(KeyCode::KeyW, KeyCode::ArrowUp),
            back: held(KeyCode::KeyS, KeyCode::ArrowDown),
            left: held(KeyCode::KeyA, KeyCode::ArrowLeft),
            right: held(KeyCode::KeyD, KeyCode::ArrowRight),
        },
        interact: keyboard.just_pressed(KeyCode::KeyE),
    };
}

/// Advances the simulation by the frame's delta time.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn tick_simulation_system(
    mut commands: Commands,
    time: Res<Time>,
    controls: Res<FrameControls>,
    state: Option<ResMut<SimulationState>>,
    mut hud: ResMut<HudState>,
    mut frame: ResMut<LatestFrame>,
) {
    let Some(mut sim) = state else {
        return;
    };
    let mut events = EventBuffer::default();
    let mut out = Collaborators {
        events: &mut events,
        hud: &mut *hud,
        renderer: &mut *frame,
    };
    sim.tick(time.delta_secs(), &controls.0, &mut out);
    for event in events.0 {
        commands.trigger(SimEvent(event));
    }
}

/// Writes the save file when the app is asked to exit.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn persist_on_exit_system(
    mut commands: Commands,
    mut exits: MessageReader<AppExit>,
    state: Option<Res<SimulationState>>,
    path: Res<SavePath>,
) {
    if exits.read().next().is_none() {
        return;
    }
    let Some(sim) = state else {
        return;
    };
    if let Err(e) = SaveState::capture(&sim).store(&path.0) {
        commands.trigger(SimulationError::new(
            SimulationErrorContext::Persist,
            e.to_string(),
        ));
    }
}

/// Installs the simulation and its input and event plumbing.
///
/// ```ignore
/// use bevy::prelude::*;
/// use roamer::{SimConfig, SimulationPlugin};
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(SimulationPlugin::new(SimConfig::default()))
///     .run();
/// ```
#[derive(Debug, Clone)]
pub struct SimulationPlugin {
    config: SimConfig,
    save_path: Option<PathBuf>,
}

impl SimulationPlugin {
    /// Plugin without persistence.
    #[must_use]
    pub const fn new(config: SimConfig) -> Self {
        Self {
            config,
            save_path: None,
        }
    }

    /// Restores from and persists to `path`.
    #[must_use]
    pub fn with_save(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_simulation_error);
        app.add_observer(log_sim_event);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<FrameControls>();

        let mut sim = match Simulation::new(&self.config) {
            Ok(built) => built,
            Err(e) => {
                app.world_mut().trigger(SimulationError::new(
                    SimulationErrorContext::Init,
                    e.to_string(),
                ));
                return;
            }
        };

        if let Some(path) = &self.save_path {
            match SaveState::load(path) {
                Ok(Some(state)) => state.apply(&mut sim),
                Ok(None) => info!("no save at {}, starting fresh", path.display()),
                Err(e) => app.world_mut().trigger(SimulationError::new(
                    SimulationErrorContext::Restore,
                    e.to_string(),
                )),
            }
            app.insert_resource(SavePath(path.clone()));
            app.add_systems(Last, persist_on_exit_system);
        }

        app.insert_resource(HudState(sim.hud().clone()));
        app.insert_resource(LatestFrame(sim.snapshot().clone()));
        app.insert_resource(SimulationState(sim));
        app.add_systems(
            Update,
            (read_keyboard_system, tick_simulation_system)
                .chain()
                .in_set(SimulationSet),
        );
    }
}
