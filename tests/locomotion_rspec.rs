//! Behaviour tests for walking, boarding and leaving vehicles using rust-rspec.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use roamer::{ControlState, FrameInput, MoveFlags, SimConfig, Simulation, VehicleId, WorldEvent};
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::{run_frames, simulation, Recorder, FRAME_DT};

/// Shared simulation plus everything its collaborators recorded.
#[derive(Debug, Clone)]
struct LocomotionFixture {
    state: Arc<Mutex<(Simulation, Recorder)>>,
}

impl LocomotionFixture {
    fn bootstrap() -> Self {
        Self {
            state: Arc::new(Mutex::new((
                simulation(&SimConfig::default()),
                Recorder::default(),
            ))),
        }
    }

    fn guard(&self) -> MutexGuard<'_, (Simulation, Recorder)> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts every example from a freshly built world.
    fn reset(&self) {
        *self.guard() = (simulation(&SimConfig::default()), Recorder::default());
    }

    fn run(&self, frames: usize, input: FrameInput) {
        let mut guard = self.guard();
        let (sim, recorder) = &mut *guard;
        run_frames(sim, recorder, frames, FRAME_DT, input);
    }

    fn control(&self) -> ControlState {
        self.guard().0.world().control
    }

    fn actor_position(&self) -> Vec3 {
        self.guard().0.world().actor.position
    }

    fn actor_visible(&self) -> bool {
        self.guard().0.snapshot().actor.visible
    }

    fn cruiser_position(&self) -> Vec3 {
        self.guard()
            .0
            .world()
            .fleet
            .get(VehicleId(2))
            .map_or(Vec3::NAN, |v| v.position)
    }

    fn walked_events(&self) -> usize {
        self.guard()
            .1
            .count(|e| matches!(e, WorldEvent::Walked { .. }))
    }
}

#[test]
fn actor_walks_boards_and_alights() {
    run_serial(&rspec::given(
        "an actor standing next to the Blue Cruiser",
        LocomotionFixture::bootstrap(),
        |scenario: &mut Scenario<LocomotionFixture>| {
            scenario.before_each(|state| state.reset());

            scenario.when("the forward key is held for a second", |ctx| {
                ctx.before_each(|state| {
                    state.run(60, FrameInput::moving(MoveFlags::forward()));
                });

                ctx.then("the actor moves away from the camera", |state| {
                    let position = state.actor_position();
                    assert!(position.z > 10.0, "actor at {position:?}");
                    assert!(position.x.abs() < 1e-3);
                });

                ctx.then("walking progress is reported every frame", |state| {
                    assert_eq!(state.walked_events(), 60);
                });
            });

            scenario.when("the interact key is pressed", |ctx| {
                ctx.before_each(|state| state.run(1, FrameInput::interact()));

                ctx.then("the actor is driving the cruiser", |state| {
                    assert_eq!(state.control(), ControlState::Driving(VehicleId(2)));
                });

                ctx.then("the actor is hidden inside the vehicle", |state| {
                    assert!(!state.actor_visible());
                });

                ctx.when("the car is driven forward and interact is pressed again", |ctx| {
                    ctx.before_each(|state| {
                        state.run(40, FrameInput::moving(MoveFlags::forward()));
                        state.run(1, FrameInput::interact());
                    });

                    ctx.then("the actor is walking again", |state| {
                        assert_eq!(state.control(), ControlState::Walking);
                        assert!(state.actor_visible());
                    });

                    ctx.then("the actor stands beside the parked car", |state| {
                        let expected = state.cruiser_position() + Vec3::new(3.0, 0.0, 0.0);
                        assert!(
                            state.actor_position().abs_diff_eq(expected, 1e-4),
                            "actor at {:?}, expected {expected:?}",
                            state.actor_position()
                        );
                    });

                    ctx.then("no walking progress was credited while driving", |state| {
                        assert_eq!(state.walked_events(), 0);
                    });
                });
            });
        },
    ));
}
