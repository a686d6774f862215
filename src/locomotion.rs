//! Walking/driving state machine.
//!
//! Control moves between [`ControlState::Walking`] and
//! [`ControlState::Driving`] only through [`interact`]. Every frame
//! [`update`] routes movement input to the actor or the occupied vehicle.

use log::{debug, info};

use crate::events::{SoundCue, WorldEvent};
use crate::input::{compose_direction, MoveFlags};
use crate::interaction::{confirm, InteractAction};
use crate::vehicle::{DriveControls, VehicleId};
use crate::world::WorldState;

/// Who is being controlled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ControlState {
    /// Input moves the actor.
    #[default]
    Walking,
    /// Input drives the vehicle; the actor rides along hidden.
    Driving(VehicleId),
}

impl ControlState {
    /// `true` while a vehicle is occupied.
    #[must_use]
    pub const fn is_driving(self) -> bool {
        matches!(self, Self::Driving(_))
    }

    /// The occupied vehicle, if any.
    #[must_use]
    pub const fn vehicle(self) -> Option<VehicleId> {
        match self {
            Self::Driving(id) => Some(id),
            Self::Walking => None,
        }
    }
}

/// Result of an interact command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Control passed to the vehicle.
    Entered(VehicleId),
    /// The actor stepped out of the vehicle.
    Exited(VehicleId),
    /// A landmark panel was opened.
    Confirmed(InteractAction),
    /// Nothing was in range.
    Ignored,
}

/// Handles one interact command.
///
/// While driving this always leaves the vehicle. While walking it re-runs
/// the proximity scan and acts on the first interactable in range.
pub fn interact(world: &mut WorldState) -> InteractOutcome {
    if let ControlState::Driving(id) = world.control {
        return exit_vehicle(world, id);
    }
    let Some(action) = world
        .proximity
        .select(world.actor.position, &world.fleet)
        .map(|s| s.action)
    else {
        debug!("interact ignored: nothing in range");
        world.proximity.clear();
        return InteractOutcome::Ignored;
    };
    match action {
        InteractAction::EnterVehicle(id) => enter_vehicle(world, id),
        other => {
            confirm(other, &mut world.outbox);
            InteractOutcome::Confirmed(other)
        }
    }
}

fn enter_vehicle(world: &mut WorldState, id: VehicleId) -> InteractOutcome {
    debug_assert!(
        !world.control.is_driving(),
        "entered {id} while already driving"
    );
    let Some(vehicle) = world.fleet.get_mut(id) else {
        return InteractOutcome::Ignored;
    };
    vehicle.halt();
    world.actor.board(vehicle.position);
    world.control = ControlState::Driving(id);
    world.proximity.clear();
    world.outbox.push(WorldEvent::Sound(SoundCue::Click));
    world.outbox.push(WorldEvent::VehicleEntered { vehicle: id });
    info!("entered {id}");
    InteractOutcome::Entered(id)
}

fn exit_vehicle(world: &mut WorldState, id: VehicleId) -> InteractOutcome {
    let parked = world.fleet.get_mut(id).map_or(world.actor.position, |v| {
        v.halt();
        v.position
    });
    world
        .actor
        .alight(parked + world.config.exit_offset, world.config.world_bound);
    world.control = ControlState::Walking;
    world.outbox.push(WorldEvent::Sound(SoundCue::Click));
    world.outbox.push(WorldEvent::VehicleExited { vehicle: id });
    info!("exited {id}");
    InteractOutcome::Exited(id)
}

/// Applies one frame of movement input.
pub fn update(world: &mut WorldState, flags: MoveFlags) {
    let bound = world.config.world_bound;
    match world.control {
        ControlState::Walking => {
            let direction = compose_direction(flags, world.camera.ground_forward());
            let walked = world
                .actor
                .step(direction, world.clock.elapsed(), &world.config.walk, bound);
            if let Some(distance) = walked {
                world.outbox.push(WorldEvent::Walked { distance });
            }
        }
        ControlState::Driving(id) => {
            if let Some(vehicle) = world.fleet.get_mut(id) {
                vehicle.integrate(DriveControls::from_flags(flags), &world.config.vehicle, bound);
                world.actor.ride(vehicle.position);
            }
        }
    }
}
