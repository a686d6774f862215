//! Proximity-triggered interactions.
//!
//! Interactables are scanned in a fixed precedence order (vehicles, then the
//! dwelling, the dispenser and finally the signs) and the first one whose
//! activation radius strictly contains the actor is selected. Selection only
//! surfaces a prompt; nothing happens until an explicit interact command.

use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::events::{EventOutbox, Panel, SoundCue, WorldEvent};
use crate::vehicle::{Fleet, VehicleId};

/// Portfolio panels reachable from signposts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignPanel {
    /// Personal introduction.
    About,
    /// Game portfolio.
    Games,
}

/// What happens when an interactable is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractAction {
    /// Take control of the vehicle.
    EnterVehicle(VehicleId),
    /// Open the room panel.
    OpenDwelling,
    /// Open the vending panel.
    OpenDispenser,
    /// Open a portfolio panel.
    OpenSign(SignPanel),
}

impl InteractAction {
    /// Scan rank; lower ranks are checked first.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::EnterVehicle(_) => 0,
            Self::OpenDwelling => 1,
            Self::OpenDispenser => 2,
            Self::OpenSign(_) => 3,
        }
    }
}

/// Static landmark categories placed by the world layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    /// The house.
    Dwelling,
    /// The drink dispenser.
    Dispenser,
    /// Signpost for the about panel.
    AboutSign,
    /// Signpost for the games panel.
    GamesSign,
}

impl LandmarkKind {
    /// Action confirmed by interacting with this landmark.
    #[must_use]
    pub const fn action(self) -> InteractAction {
        match self {
            Self::Dwelling => InteractAction::OpenDwelling,
            Self::Dispenser => InteractAction::OpenDispenser,
            Self::AboutSign => InteractAction::OpenSign(SignPanel::About),
            Self::GamesSign => InteractAction::OpenSign(SignPanel::Games),
        }
    }

    /// Prompt shown while the actor stands within range.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Dwelling => "Press E to enter house",
            Self::Dispenser => "Press E to buy drinks",
            Self::AboutSign => "Press E - About Me",
            Self::GamesSign => "Press E - Games",
        }
    }
}

/// A fixed, non-vehicle interactable.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    /// Category, which fixes its action and prompt.
    pub kind: LandmarkKind,
    /// Centre of the activation circle.
    pub position: Vec3,
    /// Exclusive activation radius.
    pub radius: f32,
}

impl Landmark {
    /// Places a landmark.
    #[must_use]
    pub const fn new(kind: LandmarkKind, position: Vec3, radius: f32) -> Self {
        Self {
            kind,
            position,
            radius,
        }
    }
}

/// An interactable chosen by the proximity scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    /// What confirming the selection does.
    pub action: InteractAction,
    /// Text offered to the player.
    pub prompt: &'a str,
}

/// The ordered set of landmarks.
///
/// Vehicles are not stored here because their positions change; the scan
/// reads them from the [`Fleet`] before any landmark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionRegistry {
    landmarks: Vec<Landmark>,
}

impl InteractionRegistry {
    /// Builds a registry, stable-sorting landmarks into precedence order.
    #[must_use]
    pub fn new(mut landmarks: Vec<Landmark>) -> Self {
        landmarks.sort_by_key(|l| l.kind.action().precedence());
        Self { landmarks }
    }

    /// Landmarks in scan order.
    pub fn landmarks(&self) -> std::slice::Iter<'_, Landmark> {
        self.landmarks.iter()
    }

    /// Returns the first interactable whose radius strictly contains `actor`.
    #[must_use]
    pub fn select<'a>(&'a self, actor: Vec3, fleet: &'a Fleet) -> Option<Selection<'a>> {
        let vehicle = fleet
            .iter()
            .find(|v| actor.distance(v.position) < v.activation_radius)
            .map(|v| Selection {
                action: InteractAction::EnterVehicle(v.id),
                prompt: v.prompt.as_str(),
            });
        vehicle.or_else(|| {
            self.landmarks
                .iter()
                .find(|l| actor.distance(l.position) < l.radius)
                .map(|l| Selection {
                    action: l.kind.action(),
                    prompt: l.kind.prompt(),
                })
        })
    }

    /// Looks up the prompt for an action without rescanning distances.
    #[must_use]
    pub fn prompt_for<'a>(&'a self, action: InteractAction, fleet: &'a Fleet) -> Option<&'a str> {
        match action {
            InteractAction::EnterVehicle(id) => fleet.get(id).map(|v| v.prompt.as_str()),
            other => self
                .landmarks
                .iter()
                .find(|l| l.kind.action() == other)
                .map(|l| l.kind.prompt()),
        }
    }
}

/// Tracks which interactable, if any, is currently offered to the player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProximityTrigger {
    registry: InteractionRegistry,
    focus: Option<InteractAction>,
}

impl ProximityTrigger {
    /// Starts with nothing offered.
    #[must_use]
    pub const fn new(registry: InteractionRegistry) -> Self {
        Self {
            registry,
            focus: None,
        }
    }

    /// The landmarks this trigger scans.
    #[must_use]
    pub const fn registry(&self) -> &InteractionRegistry {
        &self.registry
    }

    /// Re-runs the scan. While driving nothing is offered.
    pub fn refresh(&mut self, actor: Vec3, fleet: &Fleet, driving: bool) {
        let next = if driving {
            None
        } else {
            self.registry.select(actor, fleet).map(|s| s.action)
        };
        if next != self.focus {
            debug!("interaction focus changed: {:?} -> {next:?}", self.focus);
        }
        self.focus = next;
    }

    /// Drops the current offer, for example after a failed interact.
    pub const fn clear(&mut self) {
        self.focus = None;
    }

    /// Prompt for the current offer, if any.
    #[must_use]
    pub fn prompt<'a>(&'a self, fleet: &'a Fleet) -> Option<&'a str> {
        self.focus
            .and_then(|action| self.registry.prompt_for(action, fleet))
    }

    /// Fresh scan used when the interact command arrives.
    #[must_use]
    pub fn select<'a>(&'a self, actor: Vec3, fleet: &'a Fleet) -> Option<Selection<'a>> {
        self.registry.select(actor, fleet)
    }
}

/// Emits the events for a confirmed landmark interaction.
///
/// Entering a vehicle is a control transition owned by the locomotion state
/// machine, so [`InteractAction::EnterVehicle`] emits nothing here.
pub fn confirm(action: InteractAction, outbox: &mut EventOutbox) {
    let panel = match action {
        InteractAction::EnterVehicle(_) => return,
        InteractAction::OpenDwelling => Panel::Room,
        InteractAction::OpenDispenser => Panel::Vending,
        InteractAction::OpenSign(sign) => Panel::Sign(sign),
    };
    debug!("confirmed {action:?}");
    outbox.push(WorldEvent::Sound(SoundCue::Click));
    outbox.push(WorldEvent::PanelOpened(panel));
    if let InteractAction::OpenSign(sign) = action {
        outbox.push(WorldEvent::SectionVisited(sign));
    }
    outbox.push(WorldEvent::InteractConfirmed { action });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::Vehicle;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> InteractionRegistry {
        InteractionRegistry::new(vec![
            Landmark::new(LandmarkKind::GamesSign, Vec3::new(-8.0, 0.0, 15.0), 4.0),
            Landmark::new(LandmarkKind::AboutSign, Vec3::new(-8.0, 0.0, -10.0), 4.0),
            Landmark::new(LandmarkKind::Dispenser, Vec3::new(-20.0, 0.0, 50.0), 5.0),
            Landmark::new(LandmarkKind::Dwelling, Vec3::new(35.0, 0.0, -20.0), 10.0),
        ])
    }

    #[fixture]
    fn fleet() -> Fleet {
        Fleet::new(vec![Vehicle::new(
            VehicleId(7),
            "Yellow Taxi",
            Vec3::new(-8.0, 0.0, -12.0),
            0.0,
            5.0,
        )])
    }

    #[rstest]
    fn registry_is_sorted_by_precedence(registry: InteractionRegistry) {
        let kinds: Vec<_> = registry.landmarks().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LandmarkKind::Dwelling,
                LandmarkKind::Dispenser,
                LandmarkKind::GamesSign,
                LandmarkKind::AboutSign,
            ]
        );
    }

    #[rstest]
    fn vehicle_beats_overlapping_sign(registry: InteractionRegistry, fleet: Fleet) {
        let selection = registry.select(Vec3::new(-8.0, 0.0, -10.5), &fleet);
        assert_eq!(
            selection.map(|s| s.action),
            Some(InteractAction::EnterVehicle(VehicleId(7)))
        );
        assert_eq!(selection.map(|s| s.prompt), Some("Press E to drive Yellow Taxi"));
    }

    #[rstest]
    fn radius_is_exclusive(registry: InteractionRegistry) {
        let empty = Fleet::default();
        assert!(registry.select(Vec3::new(-20.0, 0.0, 45.0), &empty).is_none());
        let inside = registry.select(Vec3::new(-20.0, 0.0, 45.01), &empty);
        assert_eq!(inside.map(|s| s.action), Some(InteractAction::OpenDispenser));
    }

    #[rstest]
    fn trigger_clears_while_driving(registry: InteractionRegistry, fleet: Fleet) {
        let mut trigger = ProximityTrigger::new(registry);
        trigger.refresh(Vec3::new(35.0, 0.0, -20.0), &fleet, false);
        assert_eq!(trigger.prompt(&fleet), Some("Press E to enter house"));
        trigger.refresh(Vec3::new(35.0, 0.0, -20.0), &fleet, true);
        assert!(trigger.prompt(&fleet).is_none());
    }

    #[rstest]
    fn sign_confirmation_records_section_visit() {
        let mut outbox = EventOutbox::default();
        let action = InteractAction::OpenSign(SignPanel::Games);
        confirm(action, &mut outbox);
        let events: Vec<_> = outbox.drain().collect();
        assert_eq!(
            events,
            vec![
                WorldEvent::Sound(SoundCue::Click),
                WorldEvent::PanelOpened(Panel::Sign(SignPanel::Games)),
                WorldEvent::SectionVisited(SignPanel::Games),
                WorldEvent::InteractConfirmed { action },
            ]
        );
    }

    #[rstest]
    fn dispenser_confirmation_opens_vending() {
        let mut outbox = EventOutbox::default();
        confirm(InteractAction::OpenDispenser, &mut outbox);
        assert!(outbox
            .drain()
            .any(|e| e == WorldEvent::PanelOpened(Panel::Vending)));
    }

    #[rstest]
    fn vehicle_confirmation_is_left_to_locomotion() {
        let mut outbox = EventOutbox::default();
        confirm(InteractAction::EnterVehicle(VehicleId(1)), &mut outbox);
        assert!(outbox.is_empty());
    }
}
