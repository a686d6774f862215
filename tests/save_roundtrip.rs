//! Session persistence against real files.

use glam::Vec3;
use roamer::{FrameInput, MoveFlags, SaveError, SaveState, SimConfig};
use rstest::rstest;
use tempfile::tempdir;
use test_utils::{run_frames, simulation, Recorder, FRAME_DT};

#[rstest]
fn missing_save_is_not_an_error() {
    let dir = tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let loaded = SaveState::load(&dir.path().join("absent.json"));
    assert!(matches!(loaded, Ok(None)));
}

#[rstest]
fn malformed_save_is_reported() {
    let dir = tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = dir.path().join("save.json");
    std::fs::write(&path, "{ not json").unwrap_or_else(|e| panic!("write: {e}"));
    assert!(matches!(
        SaveState::load(&path),
        Err(SaveError::Json { .. })
    ));
}

#[rstest]
fn walked_position_survives_a_restart() {
    let dir = tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = dir.path().join("nested").join("save.json");

    let mut sim = simulation(&SimConfig::default());
    let mut recorder = Recorder::default();
    run_frames(
        &mut sim,
        &mut recorder,
        30,
        FRAME_DT,
        FrameInput::moving(MoveFlags::forward()),
    );
    let walked_to = sim.world().actor.position;
    SaveState::capture(&sim)
        .store(&path)
        .unwrap_or_else(|e| panic!("store: {e}"));

    let mut restarted = simulation(&SimConfig::default());
    let state = SaveState::load(&path)
        .unwrap_or_else(|e| panic!("load: {e}"))
        .unwrap_or_else(|| panic!("save file missing"));
    state.apply(&mut restarted);

    let world = restarted.world();
    assert!(world.actor.position.abs_diff_eq(walked_to, 1e-6));
    let expected_camera = walked_to + Vec3::new(0.0, 6.0, -12.0);
    assert!(
        world.camera.position.abs_diff_eq(expected_camera, 1e-4),
        "camera should snap behind the restored actor, got {:?}",
        world.camera.position
    );
}

#[rstest]
fn out_of_bounds_save_is_clamped() {
    let mut sim = simulation(&SimConfig::default());
    SaveState {
        actor_position: [500.0, 0.0, -500.0],
    }
    .apply(&mut sim);
    let bound = sim.world().config.world_bound;
    assert_eq!(sim.world().actor.position, Vec3::new(bound, 0.0, -bound));
}

#[rstest]
fn non_finite_save_is_ignored() {
    let mut sim = simulation(&SimConfig::default());
    SaveState {
        actor_position: [f32::NAN, 0.0, 1.0],
    }
    .apply(&mut sim);
    assert_eq!(sim.world().actor.position, Vec3::ZERO);
}
