//! Simulation tuning constants used across systems.
//!
//! These values are the defaults behind [`crate::config::SimConfig`]. Motion
//! constants are expressed per frame: positions advance once per display
//! refresh regardless of frame length.
use glam::Vec3;

/// Half extent of the square playable area on the X and Z axes.
pub const WORLD_BOUND: f32 = 140.0;

/// Upper bound on a single frame's delta time, in seconds.
pub const MAX_FRAME_DELTA: f64 = 0.05;
/// Length of one day (or one night) in seconds.
pub const HALF_CYCLE_SECS: f64 = 90.0;
/// Phase at which dusk begins.
pub const DUSK_START: f64 = 0.4;
/// Phase at which full night begins; also the night flag threshold.
pub const NIGHT_START: f64 = 0.5;
/// Phase at which dawn begins.
pub const DAWN_START: f64 = 0.9;

/// Distance walked per frame.
pub const WALK_SPEED: f32 = 0.18;
/// Animation phase advanced per unit of distance walked.
pub const ANIMATION_RATE: f32 = 0.15 / 0.18;
/// Limb swing cycles per unit of animation phase.
pub const LIMB_SWING_FREQUENCY: f32 = 4.0;
/// Peak arm swing in radians.
pub const LIMB_SWING_AMPLITUDE: f32 = 0.5;
/// Leg swing as a fraction of arm swing.
pub const LEG_SWING_RATIO: f32 = 0.7;
/// Per-frame decay of limb angles while standing still.
pub const LIMB_IDLE_DECAY: f32 = 0.9;
/// Idle bob angular frequency in radians per second.
pub const IDLE_BOB_FREQUENCY: f64 = 2.0;
/// Idle bob height.
pub const IDLE_BOB_AMPLITUDE: f32 = 0.03;
/// Scale applied to walked distance before it is reported to achievements.
pub const WALK_PROGRESS_SCALE: f32 = 10.0;

/// Velocity gained per frame of throttle.
pub const VEHICLE_ACCELERATION: f32 = 0.08;
/// Forward speed cap.
pub const VEHICLE_MAX_SPEED: f32 = 0.8;
/// Reverse speed cap as a fraction of the forward cap.
pub const VEHICLE_REVERSE_RATIO: f32 = 0.4;
/// Heading change per frame of steering, in radians.
pub const VEHICLE_TURN_RATE: f32 = 0.03;
/// Velocity multiplier applied per coasting frame.
pub const VEHICLE_FRICTION: f32 = 0.97;
/// Minimum absolute velocity before steering input has any effect.
pub const VEHICLE_STEER_THRESHOLD: f32 = 0.01;
/// Coasting velocities below this magnitude snap to zero.
pub const VEHICLE_STOP_EPSILON: f32 = 1.0e-3;
/// Distance within which a vehicle can be entered.
pub const VEHICLE_ACTIVATION_RADIUS: f32 = 5.0;
/// Wheel rotation per unit of velocity.
pub const WHEEL_SPIN_RATE: f32 = 2.0;
/// Multiplier from velocity to the displayed speed.
pub const SPEED_DISPLAY_SCALE: f32 = 100.0;
/// Where the actor is placed relative to a vehicle it leaves.
pub const VEHICLE_EXIT_OFFSET: Vec3 = Vec3::new(3.0, 0.0, 0.0);

/// Follow offset while walking, rotated by the actor's facing.
pub const CAMERA_WALK_OFFSET: Vec3 = Vec3::new(0.0, 6.0, -12.0);
/// Follow offset while driving, rotated by the vehicle heading.
pub const CAMERA_DRIVE_OFFSET: Vec3 = Vec3::new(0.0, 8.0, -18.0);
/// Height above the target the camera looks at.
pub const CAMERA_LOOK_HEIGHT: f32 = 2.0;
/// Fraction of the remaining distance the camera covers per reference frame.
pub const CAMERA_SMOOTHING: f32 = 0.06;
/// Frame length at which [`CAMERA_SMOOTHING`] applies unscaled.
pub const CAMERA_REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;

/// Sky colour at noon.
pub const SKY_DAY_RGB: u32 = 0x0087_CEEB;
/// Sky colour at midnight.
pub const SKY_NIGHT_RGB: u32 = 0x000A_0A2E;
/// Warm sun tint.
pub const SUN_DAY_RGB: u32 = 0x00FF_E4B5;
/// Moonlight tint used past half darkness.
pub const SUN_NIGHT_RGB: u32 = 0x0044_66AA;
/// Sun strength at noon.
pub const SUN_DAY_INTENSITY: f32 = 1.2;
/// Fraction of sun strength lost at full night.
pub const SUN_NIGHT_DIMMING: f32 = 0.9;
/// Ambient strength at noon.
pub const AMBIENT_DAY_INTENSITY: f32 = 0.3;
/// Ambient strength lost at full night.
pub const AMBIENT_NIGHT_DIMMING: f32 = 0.15;
/// Hemisphere light strength at noon.
pub const HEMISPHERE_DAY_INTENSITY: f32 = 0.6;
/// Hemisphere strength lost at full night.
pub const HEMISPHERE_NIGHT_DIMMING: f32 = 0.35;
/// Building window emissive strength at full night.
pub const WINDOW_GLOW_INTENSITY: f32 = 0.8;
