//! Presentation layer plugin owning the 3D scene.
//!
//! `PresentationPlugin` spawns placeholder geometry for the actor, the fleet
//! and the landmarks, then copies every [`LatestFrame`] onto transforms,
//! visibility, the sun and the sky. It never writes simulation state: the
//! core remains the sole source of truth.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::components::{
    ActorBody, CameraController, LandmarkBody, Limb, SunLight, VehicleBody, WheelMesh,
};
use crate::frame::FrameSnapshot;
use crate::interaction::LandmarkKind;
use crate::plugin::{HudState, LatestFrame, SimulationSet, SimulationState};
use crate::vehicle::WHEEL_COUNT;

/// Directional light illuminance for a sun intensity of one.
const SUN_LUX_PER_UNIT: f32 = 8_000.0;
const SUN_POSITION: Vec3 = Vec3::new(50.0, 80.0, 30.0);
const FOG_START: f32 = 60.0;
const FOG_END: f32 = 220.0;

const VEHICLE_PALETTE: [Color; 4] = [
    Color::srgb(0.85, 0.1, 0.1),
    Color::srgb(0.15, 0.3, 0.85),
    Color::srgb(0.95, 0.8, 0.1),
    Color::srgb(0.1, 0.7, 0.25),
];

fn srgb(rgb: Vec3) -> Color {
    Color::srgb(rgb.x, rgb.y, rgb.z)
}

const fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

fn landmark_shape(kind: LandmarkKind) -> (Cuboid, Color) {
    match kind {
        LandmarkKind::Dwelling => (Cuboid::new(10.0, 7.0, 10.0), Color::srgb(0.8, 0.7, 0.55)),
        LandmarkKind::Dispenser => (Cuboid::new(1.5, 3.0, 1.2), Color::srgb(0.9, 0.2, 0.3)),
        LandmarkKind::AboutSign | LandmarkKind::GamesSign => {
            (Cuboid::new(2.5, 1.5, 0.2), Color::srgb(0.55, 0.35, 0.2))
        }
    }
}

fn spawn_actor(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let skin = materials.add(Color::srgb(0.55, 0.38, 0.26));
    let shirt = materials.add(Color::srgb(0.2, 0.45, 0.8));
    let arm = meshes.add(Cuboid::new(0.25, 1.0, 0.25));
    let leg = meshes.add(Cuboid::new(0.3, 1.0, 0.3));
    let limbs = [
        (Limb::LeftArm, Vec3::new(0.65, 3.0, 0.0), arm.clone(), skin.clone()),
        (Limb::RightArm, Vec3::new(-0.65, 3.0, 0.0), arm, skin.clone()),
        (Limb::LeftLeg, Vec3::new(0.2, 1.5, 0.0), leg.clone(), shirt.clone()),
        (Limb::RightLeg, Vec3::new(-0.2, 1.5, 0.0), leg, shirt.clone()),
    ];

    commands
        .spawn((
            ActorBody,
            Name::new("Actor"),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|body| {
            body.spawn((
                Mesh3d(meshes.add(Cuboid::new(1.0, 1.5, 0.5))),
                MeshMaterial3d(shirt),
                Transform::from_xyz(0.0, 2.5, 0.0),
            ));
            body.spawn((
                Mesh3d(meshes.add(Sphere::new(0.45))),
                MeshMaterial3d(skin),
                Transform::from_xyz(0.0, 3.7, 0.0),
            ));
            for (limb, pivot, mesh, material) in limbs {
                body.spawn((limb, Transform::from_translation(pivot), Visibility::default()))
                    .with_children(|joint| {
                        joint.spawn((
                            Mesh3d(mesh),
                            MeshMaterial3d(material),
                            Transform::from_xyz(0.0, -0.5, 0.0),
                        ));
                    });
            }
        });
}

/// Spawns the camera, the sun, the ground and one body per simulated object.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn spawn_scene_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    state: Option<Res<SimulationState>>,
) {
    let Some(sim) = state else {
        return;
    };
    let world = sim.world();
    let frame = sim.snapshot();
    let side = world.config.world_bound * 2.0;

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(frame.camera.position).looking_at(frame.camera.look_at, Vec3::Y),
        DistanceFog {
            color: srgb(frame.lighting.sky),
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
        CameraController,
        Name::new("FollowCamera"),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: frame.lighting.sun_intensity * SUN_LUX_PER_UNIT,
            color: srgb(frame.lighting.sun_color),
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(SUN_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        SunLight,
        Name::new("Sun"),
    ));
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(side, side))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.55, 0.25))),
        Name::new("Ground"),
    ));

    spawn_actor(&mut commands, &mut meshes, &mut materials);

    let wheel_mesh = meshes.add(Cylinder::new(0.4, 0.3));
    let tyre = materials.add(Color::srgb(0.08, 0.08, 0.08));
    for (index, vehicle) in world.fleet.iter().enumerate() {
        let paint = VEHICLE_PALETTE
            .get(index % VEHICLE_PALETTE.len())
            .copied()
            .unwrap_or(Color::WHITE);
        commands
            .spawn((
                VehicleBody(vehicle.id),
                Name::new(vehicle.label.clone()),
                Transform::from_translation(vehicle.position)
                    .with_rotation(Quat::from_rotation_y(vehicle.heading)),
                Visibility::default(),
            ))
            .with_children(|car| {
                car.spawn((
                    Mesh3d(meshes.add(Cuboid::new(2.2, 1.0, 4.0))),
                    MeshMaterial3d(materials.add(paint)),
                    Transform::from_xyz(0.0, 0.9, 0.0),
                ));
                for (wheel_index, wheel) in vehicle.wheels.iter().enumerate() {
                    car.spawn((
                        WheelMesh {
                            vehicle: vehicle.id,
                            index: wheel_index,
                        },
                        Mesh3d(wheel_mesh.clone()),
                        MeshMaterial3d(tyre.clone()),
                        Transform::from_translation(wheel.mount)
                            .with_rotation(Quat::from_rotation_z(FRAC_PI_2)),
                    ));
                }
            });
    }

    for landmark in world.proximity.registry().landmarks() {
        let (shape, color) = landmark_shape(landmark.kind);
        commands.spawn((
            LandmarkBody(landmark.kind),
            Mesh3d(meshes.add(shape)),
            MeshMaterial3d(materials.add(color)),
            Transform::from_translation(landmark.position + Vec3::Y * shape.half_size.y),
        ));
    }
}

/// Applies the actor's pose, bob, visibility and limb swing.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_actor_system(
    frame: Res<LatestFrame>,
    mut bodies: Query<(&mut Transform, &mut Visibility), With<ActorBody>>,
    mut limbs: Query<(&mut Transform, &Limb), Without<ActorBody>>,
) {
    let pose = &frame.actor;
    for (mut transform, mut vis) in &mut bodies {
        transform.translation = pose.position + Vec3::Y * pose.bob;
        transform.rotation = Quat::from_rotation_y(pose.facing);
        *vis = visibility(pose.visible);
    }
    for (mut transform, limb) in &mut limbs {
        let angle = match limb {
            Limb::LeftArm => pose.limbs.left_arm,
            Limb::RightArm => pose.limbs.right_arm,
            Limb::LeftLeg => pose.limbs.left_leg,
            Limb::RightLeg => pose.limbs.right_leg,
        };
        transform.rotation = Quat::from_rotation_x(angle);
    }
}

fn wheel_spin(frame: &FrameSnapshot, wheel: WheelMesh) -> Option<f32> {
    frame
        .vehicles
        .iter()
        .find(|v| v.id == wheel.vehicle)
        .and_then(|v| v.wheel_spin.get(wheel.index).copied())
}

/// Applies vehicle poses and wheel spin.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_vehicles_system(
    frame: Res<LatestFrame>,
    mut bodies: Query<(&VehicleBody, &mut Transform)>,
    mut wheels: Query<(&WheelMesh, &mut Transform), Without<VehicleBody>>,
) {
    for (VehicleBody(id), mut transform) in &mut bodies {
        if let Some(pose) = frame.vehicles.iter().find(|v| v.id == *id) {
            transform.translation = pose.position;
            transform.rotation = Quat::from_rotation_y(pose.heading);
        }
    }
    for (wheel, mut transform) in &mut wheels {
        debug_assert!(wheel.index < WHEEL_COUNT, "wheel index out of range");
        if let Some(spin) = wheel_spin(&frame, *wheel) {
            transform.rotation = Quat::from_rotation_x(spin) * Quat::from_rotation_z(FRAC_PI_2);
        }
    }
}

/// Places the camera and tints fog and clear colour with the sky.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_camera_system(
    frame: Res<LatestFrame>,
    mut clear: ResMut<ClearColor>,
    mut cameras: Query<(&mut Transform, Option<&mut DistanceFog>), With<CameraController>>,
) {
    let sky = srgb(frame.lighting.sky);
    clear.0 = sky;
    for (mut transform, fog) in &mut cameras {
        *transform = Transform::from_translation(frame.camera.position)
            .looking_at(frame.camera.look_at, Vec3::Y);
        if let Some(mut distance_fog) = fog {
            distance_fog.color = sky;
        }
    }
}

/// Dims and recolours the sun with the day/night cycle.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_sun_system(
    frame: Res<LatestFrame>,
    mut suns: Query<&mut DirectionalLight, With<SunLight>>,
) {
    for mut light in &mut suns {
        light.illuminance = frame.lighting.sun_intensity * SUN_LUX_PER_UNIT;
        light.color = srgb(frame.lighting.sun_color);
    }
}

/// Formats the HUD into a single status line.
#[must_use]
pub fn hud_line(hud: &crate::events::HudSnapshot) -> String {
    let mut line = format!("Roamer | {}", hud.time_of_day.label());
    if hud.drive_hud {
        line.push_str(&format!(" | {} km/h", hud.speed));
    }
    if let Some(prompt) = &hud.prompt {
        line.push_str(" | ");
        line.push_str(prompt);
    }
    line
}

/// Shows the HUD line in the window title.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_window_title_system(
    hud: Res<HudState>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !hud.is_changed() {
        return;
    }
    let title = hud_line(&hud);
    for mut window in &mut windows {
        if window.title != title {
            window.title.clone_from(&title);
        }
    }
}

/// Plugin owning scene setup and the per-frame visual sync.
///
/// Add it after [`crate::SimulationPlugin`] so the scene can be spawned from
/// the initial world.
#[derive(Debug)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CameraController>();
        app.register_type::<ActorBody>();
        app.register_type::<SunLight>();
        app.init_resource::<ClearColor>();
        app.add_systems(Startup, spawn_scene_system);
        app.add_systems(
            Update,
            (
                sync_actor_system,
                sync_vehicles_system,
                sync_camera_system,
                sync_sun_system,
                sync_window_title_system,
            )
                .after(SimulationSet),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DayPhase;
    use crate::events::HudSnapshot;
    use rstest::rstest;

    #[rstest]
    #[case::walking_day(HudSnapshot::default(), "Roamer | Day")]
    #[case::driving_night(
        HudSnapshot { drive_hud: true, speed: 42, time_of_day: DayPhase::Night, prompt: None },
        "Roamer | Night | 42 km/h"
    )]
    #[case::prompt(
        HudSnapshot { prompt: Some("Press E to buy drinks".to_owned()), ..Default::default() },
        "Roamer | Day | Press E to buy drinks"
    )]
    fn hud_line_lists_visible_fields(#[case] hud: HudSnapshot, #[case] expected: &str) {
        assert_eq!(hud_line(&hud), expected);
    }
}
