//! Vehicle dynamics model.
//!
//! Vehicles carry a single scalar forward velocity along their heading. Only
//! the vehicle currently being driven is integrated; the rest of the fleet
//! stays where it was parked.

use glam::Vec3;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::constants::{
    VEHICLE_ACCELERATION, VEHICLE_ACTIVATION_RADIUS, VEHICLE_FRICTION, VEHICLE_MAX_SPEED,
    VEHICLE_REVERSE_RATIO, VEHICLE_STEER_THRESHOLD, VEHICLE_STOP_EPSILON, VEHICLE_TURN_RATE,
    WHEEL_SPIN_RATE,
};
use crate::input::{axis, MoveFlags};
use crate::vector_math::{clamp_to_bounds, heading_vector};

/// Stable identifier of a vehicle within the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub u32);

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vehicle#{}", self.0)
    }
}

/// Every vehicle has exactly this many wheels.
pub const WHEEL_COUNT: usize = 4;

/// Wheel mount offsets in the vehicle's local frame: front pair then rear
/// pair, left before right.
pub const WHEEL_MOUNTS: [Vec3; WHEEL_COUNT] = [
    Vec3::new(1.1, 0.4, 1.6),
    Vec3::new(-1.1, 0.4, 1.6),
    Vec3::new(1.1, 0.4, -1.6),
    Vec3::new(-1.1, 0.4, -1.6),
];

/// A wheel fixed to its vehicle at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wheel {
    /// Offset from the vehicle origin in the vehicle's local frame.
    pub mount: Vec3,
    /// Accumulated rotation about the axle in radians.
    pub spin: f32,
}

/// Tuning values for the drive model, all per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Velocity gained or lost per frame of throttle.
    pub acceleration: f32,
    /// Forward speed cap.
    pub max_speed: f32,
    /// Reverse cap as a fraction of `max_speed`.
    pub reverse_ratio: f32,
    /// Heading change per frame of full steering, in radians.
    pub turn_rate: f32,
    /// Multiplier applied to velocity on coasting frames.
    pub friction: f32,
    /// Steering has no effect while `|velocity|` is at or below this.
    pub steer_threshold: f32,
    /// Coasting velocities below this magnitude snap to zero.
    pub stop_epsilon: f32,
    /// Wheel rotation per unit of velocity.
    pub wheel_spin_rate: f32,
    /// Distance within which a vehicle can be entered.
    pub activation_radius: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            acceleration: VEHICLE_ACCELERATION,
            max_speed: VEHICLE_MAX_SPEED,
            reverse_ratio: VEHICLE_REVERSE_RATIO,
            turn_rate: VEHICLE_TURN_RATE,
            friction: VEHICLE_FRICTION,
            steer_threshold: VEHICLE_STEER_THRESHOLD,
            stop_epsilon: VEHICLE_STOP_EPSILON,
            wheel_spin_rate: WHEEL_SPIN_RATE,
            activation_radius: VEHICLE_ACTIVATION_RADIUS,
        }
    }
}

impl VehicleTuning {
    /// Lowest velocity reachable by reversing.
    #[must_use]
    pub const fn reverse_cap(&self) -> f32 {
        -self.max_speed * self.reverse_ratio
    }
}

/// Longitudinal command for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Throttle {
    /// Gain speed up to the forward cap.
    Accelerate,
    /// Lose speed down to the reverse cap.
    Reverse,
    /// Let friction slow the vehicle.
    #[default]
    Coast,
}

/// Driver input reduced to what the dynamics model consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveControls {
    /// Longitudinal command.
    pub throttle: Throttle,
    /// `+1` steers left, `-1` right, `0` straight.
    pub steer: f32,
}

impl DriveControls {
    /// Maps held direction flags onto drive controls.
    ///
    /// Forward wins over back when both are held. Left and right cancel.
    #[must_use]
    pub const fn from_flags(flags: MoveFlags) -> Self {
        let throttle = if flags.forward {
            Throttle::Accelerate
        } else if flags.back {
            Throttle::Reverse
        } else {
            Throttle::Coast
        };
        Self {
            throttle,
            steer: axis(flags.right, flags.left),
        }
    }
}

/// A drivable vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Identifier unique within the fleet.
    pub id: VehicleId,
    /// Display name used in the prompt.
    pub label: String,
    /// Interaction prompt shown when the actor is close enough to drive.
    pub prompt: String,
    /// Ground position.
    pub position: Vec3,
    /// Yaw in radians; zero faces `+Z`.
    pub heading: f32,
    /// Signed speed along the heading, world units per frame.
    pub velocity: f32,
    /// Exclusive distance within which the vehicle can be entered.
    pub activation_radius: f32,
    /// Fixed wheels in [`WHEEL_MOUNTS`] order.
    pub wheels: [Wheel; WHEEL_COUNT],
}

impl Vehicle {
    /// Builds a parked vehicle with its four wheels attached.
    #[must_use]
    pub fn new(
        id: VehicleId,
        name: impl Into<String>,
        position: Vec3,
        heading: f32,
        activation_radius: f32,
    ) -> Self {
        let label = name.into();
        let prompt = format!("Press E to drive {label}");
        Self {
            id,
            label,
            prompt,
            position,
            heading,
            velocity: 0.0,
            activation_radius,
            wheels: WHEEL_MOUNTS.map(|mount| Wheel { mount, spin: 0.0 }),
        }
    }

    /// Unit vector the vehicle is facing.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        heading_vector(self.heading)
    }

    /// Brings the vehicle to an immediate stop.
    pub const fn halt(&mut self) {
        self.velocity = 0.0;
    }

    /// Integrates one frame of driving.
    ///
    /// Velocity is updated first, then heading (only while moving faster
    /// than the steering threshold, in the direction of travel), then
    /// position along the new heading, clamped to `bound`.
    pub fn integrate(&mut self, controls: DriveControls, tuning: &VehicleTuning, bound: f32) {
        self.velocity = match controls.throttle {
            Throttle::Accelerate => (self.velocity + tuning.acceleration).min(tuning.max_speed),
            Throttle::Reverse => (self.velocity - tuning.acceleration).max(tuning.reverse_cap()),
            Throttle::Coast => {
                let coasted = self.velocity * tuning.friction;
                if coasted.abs() < tuning.stop_epsilon {
                    0.0
                } else {
                    coasted
                }
            }
        };

        if self.velocity.abs() > tuning.steer_threshold {
            self.heading += controls.steer * tuning.turn_rate * self.velocity.signum();
        }

        self.position = clamp_to_bounds(self.position + self.forward() * self.velocity, bound);

        let spin = self.velocity * tuning.wheel_spin_rate;
        for wheel in &mut self.wheels {
            wheel.spin += spin;
        }
        trace!(
            "{} at {:?} heading {:.3} velocity {:.3}",
            self.id,
            self.position,
            self.heading,
            self.velocity
        );
    }
}

/// The fixed set of vehicles in the world.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
}

impl Fleet {
    /// Wraps vehicles in their scan order.
    #[must_use]
    pub const fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    /// Looks a vehicle up by id.
    #[must_use]
    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    /// Vehicles in scan order.
    pub fn iter(&self) -> std::slice::Iter<'_, Vehicle> {
        self.vehicles.iter()
    }

    /// Number of vehicles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// `true` for a world without vehicles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

impl<'a> IntoIterator for &'a Fleet {
    type Item = &'a Vehicle;
    type IntoIter = std::slice::Iter<'a, Vehicle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const BOUND: f32 = 140.0;

    #[fixture]
    fn car() -> Vehicle {
        Vehicle::new(VehicleId(1), "Red Racer", Vec3::ZERO, 0.0, 5.0)
    }

    fn drive(car: &mut Vehicle, flags: MoveFlags, frames: usize) {
        let tuning = VehicleTuning::default();
        for _ in 0..frames {
            car.integrate(DriveControls::from_flags(flags), &tuning, BOUND);
        }
    }

    #[rstest]
    fn prompt_names_the_vehicle(car: Vehicle) {
        assert_eq!(car.prompt, "Press E to drive Red Racer");
        assert_eq!(car.wheels.len(), WHEEL_COUNT);
    }

    #[rstest]
    fn forward_caps_at_max_speed_without_drift(mut car: Vehicle) {
        drive(&mut car, MoveFlags::forward(), 100);
        assert_relative_eq!(car.velocity, VEHICLE_MAX_SPEED);
        assert_relative_eq!(car.position.x, 0.0);
        assert!(car.position.z > 0.0);
    }

    #[rstest]
    fn reverse_caps_at_fraction_of_max(mut car: Vehicle) {
        drive(&mut car, MoveFlags::back(), 100);
        assert_relative_eq!(car.velocity, -0.32, epsilon = 1e-6);
    }

    #[rstest]
    fn coasting_converges_to_rest(mut car: Vehicle) {
        drive(&mut car, MoveFlags::forward(), 20);
        drive(&mut car, MoveFlags::default(), 400);
        assert_eq!(car.velocity, 0.0);
        let parked = car.position;
        drive(&mut car, MoveFlags::default(), 10);
        assert_eq!(car.position, parked);
    }

    #[rstest]
    fn stationary_vehicle_does_not_steer(mut car: Vehicle) {
        let left = MoveFlags {
            left: true,
            ..Default::default()
        };
        drive(&mut car, left, 30);
        assert_eq!(car.heading, 0.0);
        assert_eq!(car.position, Vec3::ZERO);
    }

    #[rstest]
    fn steering_inverts_in_reverse(mut car: Vehicle) {
        let tuning = VehicleTuning::default();
        let mut reversing = car.clone();
        car.velocity = 0.5;
        reversing.velocity = -0.3;
        let left = DriveControls {
            throttle: Throttle::Coast,
            steer: 1.0,
        };
        car.integrate(left, &tuning, BOUND);
        reversing.integrate(left, &tuning, BOUND);
        assert_relative_eq!(car.heading, VEHICLE_TURN_RATE);
        assert_relative_eq!(reversing.heading, -VEHICLE_TURN_RATE);
    }

    #[rstest]
    fn position_is_clamped_to_bounds() {
        let mut car = Vehicle::new(VehicleId(2), "Blue Cruiser", Vec3::new(0.0, 0.0, 139.9), 0.0, 5.0);
        drive(&mut car, MoveFlags::forward(), 10);
        assert_relative_eq!(car.position.z, BOUND);
    }

    #[rstest]
    fn wheels_spin_with_velocity(mut car: Vehicle) {
        drive(&mut car, MoveFlags::forward(), 1);
        for wheel in &car.wheels {
            assert_relative_eq!(wheel.spin, VEHICLE_ACCELERATION * WHEEL_SPIN_RATE);
        }
    }

    #[rstest]
    fn forward_beats_back_and_sides_cancel() {
        let all = MoveFlags {
            forward: true,
            back: true,
            left: true,
            right: true,
        };
        let controls = DriveControls::from_flags(all);
        assert_eq!(controls.throttle, Throttle::Accelerate);
        assert_eq!(controls.steer, 0.0);
    }

    #[rstest]
    fn fleet_finds_vehicles_by_id(car: Vehicle) {
        let mut fleet = Fleet::new(vec![car]);
        assert!(fleet.get(VehicleId(1)).is_some());
        assert!(fleet.get(VehicleId(9)).is_none());
        if let Some(v) = fleet.get_mut(VehicleId(1)) {
            v.velocity = 0.4;
        }
        assert_eq!(fleet.iter().map(|v| v.velocity).sum::<f32>(), 0.4);
    }
}
