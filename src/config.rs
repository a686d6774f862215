//! Simulation configuration.
//!
//! Values are layered with `figment`: built-in defaults first, then an
//! optional TOML file, then `ROAMER_`-prefixed environment variables. Nested
//! keys use a double underscore, so `ROAMER_VEHICLE__MAX_SPEED=1.2` overrides
//! `vehicle.max_speed`.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use crate::actor::WalkTuning;
use crate::camera::CameraTuning;
use crate::constants::{HALF_CYCLE_SECS, MAX_FRAME_DELTA, VEHICLE_EXIT_OFFSET, WORLD_BOUND};
use crate::vehicle::VehicleTuning;
use crate::world::WorldLayout;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ROAMER_";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested file is absent.
    #[error("configuration file {0} does not exist")]
    MissingFile(PathBuf),
    /// A provider failed or a value did not deserialize.
    #[error("failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
    /// A merged value is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted key of the rejected value.
        field: &'static str,
        /// What was expected.
        reason: String,
    },
}

/// Day/night timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Length of the day, and of the night, in seconds.
    pub half_cycle_secs: f64,
    /// Upper clamp for a single frame delta.
    pub max_frame_delta_secs: f64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            half_cycle_secs: HALF_CYCLE_SECS,
            max_frame_delta_secs: MAX_FRAME_DELTA,
        }
    }
}

/// Everything needed to build a [`crate::world::WorldState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Day/night timing.
    pub clock: ClockSettings,
    /// Half extent of the playable square on X and Z.
    pub world_bound: f32,
    /// On-foot movement.
    pub walk: WalkTuning,
    /// Shared vehicle dynamics.
    pub vehicle: VehicleTuning,
    /// Follow camera behaviour.
    pub camera: CameraTuning,
    /// Offset from a vehicle at which the actor is placed on exit.
    pub exit_offset: Vec3,
    /// Initial placement of the actor, vehicles and landmarks.
    pub layout: WorldLayout,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            clock: ClockSettings::default(),
            world_bound: WORLD_BOUND,
            walk: WalkTuning::default(),
            vehicle: VehicleTuning::default(),
            camera: CameraTuning::default(),
            exit_offset: VEHICLE_EXIT_OFFSET,
            layout: WorldLayout::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a positive number, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a non-negative number, got {value}")))
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a finite number, got {value}")))
    }
}

fn require_finite_vec(field: &'static str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("expected finite components, got {value:?}")))
    }
}

fn require_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a value in [0, 1], got {value}")))
    }
}

/// Coasting must shrink speed every frame, so one is excluded.
fn require_decay(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a value in [0, 1), got {value}")))
    }
}

impl SimConfig {
    /// Loads configuration from defaults, an optional TOML file and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, a value fails to
    /// deserialize, or the merged result is out of range.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = path {
            if !file.is_file() {
                return Err(ConfigError::MissingFile(file.to_path_buf()));
            }
            info!("loading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that deserialization alone cannot express.
    ///
    /// Layout contents are checked separately when the world is built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_clock()?;
        require_positive("world_bound", f64::from(self.world_bound))?;
        require_non_negative("walk.speed", self.walk.speed)?;
        require_non_negative("walk.animation_rate", self.walk.animation_rate)?;
        self.validate_vehicle()?;
        self.validate_camera()?;
        require_finite_vec("exit_offset", self.exit_offset)
    }

    fn validate_clock(&self) -> Result<(), ConfigError> {
        let ClockSettings {
            half_cycle_secs,
            max_frame_delta_secs,
        } = self.clock;
        require_positive("clock.half_cycle_secs", half_cycle_secs)?;
        require_positive("clock.max_frame_delta_secs", max_frame_delta_secs)?;
        if half_cycle_secs <= max_frame_delta_secs {
            return Err(invalid(
                "clock.half_cycle_secs",
                format!(
                    "must exceed the maximum frame delta of {max_frame_delta_secs}s, \
                     got {half_cycle_secs}s"
                ),
            ));
        }
        Ok(())
    }

    fn validate_vehicle(&self) -> Result<(), ConfigError> {
        let tuning = &self.vehicle;
        require_positive("vehicle.acceleration", f64::from(tuning.acceleration))?;
        require_positive("vehicle.max_speed", f64::from(tuning.max_speed))?;
        require_unit("vehicle.reverse_ratio", tuning.reverse_ratio)?;
        require_non_negative("vehicle.turn_rate", tuning.turn_rate)?;
        require_decay("vehicle.friction", tuning.friction)?;
        require_non_negative("vehicle.steer_threshold", tuning.steer_threshold)?;
        require_positive("vehicle.stop_epsilon", f64::from(tuning.stop_epsilon))?;
        require_finite("vehicle.wheel_spin_rate", tuning.wheel_spin_rate)?;
        require_positive(
            "vehicle.activation_radius",
            f64::from(tuning.activation_radius),
        )
    }

    fn validate_camera(&self) -> Result<(), ConfigError> {
        let tuning = &self.camera;
        require_finite_vec("camera.walk_offset", tuning.walk_offset)?;
        require_finite_vec("camera.drive_offset", tuning.drive_offset)?;
        require_finite("camera.look_height", tuning.look_height)?;
        require_positive("camera.smoothing", f64::from(tuning.smoothing))?;
        require_unit("camera.smoothing", tuning.smoothing)?;
        require_positive(
            "camera.reference_frame_secs",
            f64::from(tuning.reference_frame_secs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_cycle(SimConfig { clock: ClockSettings { half_cycle_secs: 0.0, ..Default::default() }, ..Default::default() }, "clock.half_cycle_secs")]
    #[case::negative_bound(SimConfig { world_bound: -1.0, ..Default::default() }, "world_bound")]
    #[case::sticky_friction(SimConfig { vehicle: VehicleTuning { friction: 1.5, ..Default::default() }, ..Default::default() }, "vehicle.friction")]
    #[case::frozen_camera(SimConfig { camera: CameraTuning { smoothing: 0.0, ..Default::default() }, ..Default::default() }, "camera.smoothing")]
    #[case::frictionless(SimConfig { vehicle: VehicleTuning { friction: 1.0, ..Default::default() }, ..Default::default() }, "vehicle.friction")]
    #[case::nan_turn_rate(SimConfig { vehicle: VehicleTuning { turn_rate: f32::NAN, ..Default::default() }, ..Default::default() }, "vehicle.turn_rate")]
    #[case::infinite_acceleration(SimConfig { vehicle: VehicleTuning { acceleration: f32::INFINITY, ..Default::default() }, ..Default::default() }, "vehicle.acceleration")]
    #[case::negative_steer_threshold(SimConfig { vehicle: VehicleTuning { steer_threshold: -0.1, ..Default::default() }, ..Default::default() }, "vehicle.steer_threshold")]
    #[case::zero_stop_epsilon(SimConfig { vehicle: VehicleTuning { stop_epsilon: 0.0, ..Default::default() }, ..Default::default() }, "vehicle.stop_epsilon")]
    #[case::nan_wheel_spin(SimConfig { vehicle: VehicleTuning { wheel_spin_rate: f32::NAN, ..Default::default() }, ..Default::default() }, "vehicle.wheel_spin_rate")]
    #[case::nan_animation_rate(SimConfig { walk: WalkTuning { animation_rate: f32::NAN, ..Default::default() }, ..Default::default() }, "walk.animation_rate")]
    #[case::nan_walk_offset(SimConfig { camera: CameraTuning { walk_offset: Vec3::NAN, ..Default::default() }, ..Default::default() }, "camera.walk_offset")]
    #[case::infinite_drive_offset(SimConfig { camera: CameraTuning { drive_offset: Vec3::INFINITY, ..Default::default() }, ..Default::default() }, "camera.drive_offset")]
    #[case::nan_look_height(SimConfig { camera: CameraTuning { look_height: f32::NAN, ..Default::default() }, ..Default::default() }, "camera.look_height")]
    #[case::cycle_within_one_step(SimConfig { clock: ClockSettings { half_cycle_secs: 0.05, max_frame_delta_secs: 0.05 }, ..Default::default() }, "clock.half_cycle_secs")]
    fn validate_names_offending_field(#[case] config: SimConfig, #[case] expected: &str) {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid field {expected}, got {other:?}"),
        }
    }

    #[rstest]
    fn missing_file_is_reported() {
        let result = SimConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }
}
