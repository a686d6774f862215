//! Verifies what the orchestrator hands to each collaborator using mocks.

use glam::Vec3;
use mockall::{mock, Sequence};
use roamer::{
    Collaborators, EventSink, FrameInput, FrameSnapshot, HudSink, HudSnapshot, InteractAction,
    LandmarkKind, Panel, SceneRenderer, SignPanel, SimConfig, SoundCue, VehicleId, WorldEvent,
};
use rstest::rstest;
use test_utils::{landmark_at, simulation, sparse_config, FRAME_DT};

mock! {
    pub Events {}
    impl EventSink for Events {
        fn dispatch(&mut self, event: &WorldEvent);
    }
}

mock! {
    pub Hud {}
    impl HudSink for Hud {
        fn present(&mut self, hud: &HudSnapshot);
    }
}

mock! {
    pub Renderer {}
    impl SceneRenderer for Renderer {
        fn render(&mut self, frame: &FrameSnapshot);
    }
}

#[rstest]
fn entering_vehicle_notifies_every_collaborator() {
    let mut sim = simulation(&SimConfig::default());

    let mut events = MockEvents::new();
    let mut seq = Sequence::new();
    events
        .expect_dispatch()
        .withf(|e| *e == WorldEvent::Sound(SoundCue::Click))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    events
        .expect_dispatch()
        .withf(|e| {
            *e == WorldEvent::VehicleEntered {
                vehicle: VehicleId(2),
            }
        })
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut hud = MockHud::new();
    hud.expect_present()
        .withf(|h| h.drive_hud && h.speed == 0 && h.prompt.is_none())
        .times(1)
        .return_const(());

    let mut renderer = MockRenderer::new();
    renderer
        .expect_render()
        .withf(|f| f.frame == 1 && !f.actor.visible && f.vehicles.iter().any(|v| v.occupied))
        .times(1)
        .return_const(());

    let mut out = Collaborators {
        events: &mut events,
        hud: &mut hud,
        renderer: &mut renderer,
    };
    sim.tick(FRAME_DT, &FrameInput::interact(), &mut out);
}

#[rstest]
fn sign_confirmation_is_dispatched_in_order() {
    let config = sparse_config(
        Vec3::ZERO,
        vec![],
        vec![landmark_at(
            LandmarkKind::AboutSign,
            Vec3::new(0.0, 0.0, 2.0),
            4.0,
        )],
    );
    let mut sim = simulation(&config);

    let expected = [
        WorldEvent::Sound(SoundCue::Click),
        WorldEvent::PanelOpened(Panel::Sign(SignPanel::About)),
        WorldEvent::SectionVisited(SignPanel::About),
        WorldEvent::InteractConfirmed {
            action: InteractAction::OpenSign(SignPanel::About),
        },
    ];
    let mut events = MockEvents::new();
    let mut seq = Sequence::new();
    for event in expected {
        events
            .expect_dispatch()
            .withf(move |e| *e == event)
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
    }

    let mut hud = MockHud::new();
    hud.expect_present()
        .withf(|h| !h.drive_hud && h.prompt.as_deref() == Some("Press E - About Me"))
        .times(1)
        .return_const(());
    let mut renderer = MockRenderer::new();
    renderer.expect_render().times(1).return_const(());

    let mut out = Collaborators {
        events: &mut events,
        hud: &mut hud,
        renderer: &mut renderer,
    };
    sim.tick(FRAME_DT, &FrameInput::interact(), &mut out);
}

#[rstest]
fn quiet_frame_dispatches_no_events() {
    let config = sparse_config(Vec3::ZERO, vec![], vec![]);
    let mut sim = simulation(&config);

    let mut events = MockEvents::new();
    events.expect_dispatch().never();
    let mut hud = MockHud::new();
    hud.expect_present()
        .withf(|h| h.prompt.is_none() && !h.drive_hud)
        .times(3)
        .return_const(());
    let mut renderer = MockRenderer::new();
    renderer.expect_render().times(3).return_const(());

    for _ in 0..3 {
        let mut out = Collaborators {
            events: &mut events,
            hud: &mut hud,
            renderer: &mut renderer,
        };
        sim.tick(FRAME_DT, &FrameInput::default(), &mut out);
    }
}
