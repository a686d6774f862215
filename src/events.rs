//! Outbound contract between the simulation core and its collaborators.
//!
//! The core pushes data one way: discrete [`WorldEvent`]s for audio and
//! achievement bookkeeping, a [`HudSnapshot`] for the UI, and a
//! [`FrameSnapshot`] for the renderer. None of these calls return anything
//! the core depends on, and the core never reads collaborator state back.

use crate::clock::DayPhase;
use crate::frame::FrameSnapshot;
use crate::interaction::{InteractAction, SignPanel};
use crate::vehicle::VehicleId;

/// Sound cues the core asks the audio collaborator to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Short confirmation click used for every interaction.
    Click,
}

/// Modal panels the UI collaborator may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Interior view of the dwelling.
    Room,
    /// Drink dispenser menu.
    Vending,
    /// Panel behind a signpost.
    Sign(SignPanel),
}

/// Fire-and-forget notifications emitted during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// The actor took control of a vehicle.
    VehicleEntered {
        /// Vehicle now being driven.
        vehicle: VehicleId,
    },
    /// The actor left the vehicle it was driving.
    VehicleExited {
        /// Vehicle that was left behind.
        vehicle: VehicleId,
    },
    /// A landmark interaction was confirmed.
    InteractConfirmed {
        /// Action bound to the selected landmark.
        action: InteractAction,
    },
    /// The day/night cycle crossed into night on this frame.
    NightReached,
    /// Play a sound cue.
    Sound(SoundCue),
    /// Open a modal panel.
    PanelOpened(Panel),
    /// A portfolio section behind a sign was visited.
    SectionVisited(SignPanel),
    /// The actor walked some distance this frame.
    Walked {
        /// Scaled distance credited to walking achievements.
        distance: f32,
    },
}

/// Events buffered during a frame and drained by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct EventOutbox {
    events: Vec<WorldEvent>,
}

impl EventOutbox {
    /// Queues an event behind any already buffered this frame.
    pub fn push(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Removes buffered events in push order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, WorldEvent> {
        self.events.drain(..)
    }

    /// `true` when nothing is buffered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of buffered events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.events.len()
    }
}

/// Display values pushed to the UI collaborator once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    /// Interaction prompt for the selected interactable, if any.
    pub prompt: Option<String>,
    /// Whether the driving HUD should be visible.
    pub drive_hud: bool,
    /// Absolute speed of the active vehicle, zero while walking.
    pub speed: u32,
    /// Current half of the day/night cycle.
    pub time_of_day: DayPhase,
}

/// Receives discrete world events (audio, achievements, modals).
pub trait EventSink {
    /// Handles one event. Called in emission order.
    fn dispatch(&mut self, event: &WorldEvent);
}

/// Receives the per-frame HUD values.
pub trait HudSink {
    /// Shows the latest HUD values.
    fn present(&mut self, hud: &HudSnapshot);
}

/// Receives the per-frame render snapshot.
pub trait SceneRenderer {
    /// Draws one frame from the snapshot.
    fn render(&mut self, frame: &FrameSnapshot);
}

/// Bundle of collaborators handed to [`crate::frame::Simulation::tick`].
pub struct Collaborators<'a> {
    /// Audio, achievement and modal handling.
    pub events: &'a mut dyn EventSink,
    /// UI overlay.
    pub hud: &'a mut dyn HudSink,
    /// Scene drawing.
    pub renderer: &'a mut dyn SceneRenderer,
}

/// Collaborator that discards everything it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl EventSink for Detached {
    fn dispatch(&mut self, _event: &WorldEvent) {}
}

impl HudSink for Detached {
    fn present(&mut self, _hud: &HudSnapshot) {}
}

impl SceneRenderer for Detached {
    fn render(&mut self, _frame: &FrameSnapshot) {}
}

impl Detached {
    /// Borrows three detached collaborators as a bundle.
    pub const fn bundle<'a>(
        events: &'a mut Self,
        hud: &'a mut Self,
        renderer: &'a mut Self,
    ) -> Collaborators<'a> {
        Collaborators {
            events,
            hud,
            renderer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn outbox_drains_in_push_order() {
        let mut outbox = EventOutbox::default();
        outbox.push(WorldEvent::Sound(SoundCue::Click));
        outbox.push(WorldEvent::NightReached);
        assert_eq!(outbox.len(), 2);
        let drained: Vec<_> = outbox.drain().collect();
        assert_eq!(
            drained,
            vec![WorldEvent::Sound(SoundCue::Click), WorldEvent::NightReached]
        );
        assert!(outbox.is_empty());
    }

    #[rstest]
    fn hud_defaults_to_daytime_without_prompt() {
        let hud = HudSnapshot::default();
        assert!(hud.prompt.is_none());
        assert!(!hud.drive_hud);
        assert_eq!(hud.speed, 0);
        assert_eq!(hud.time_of_day, DayPhase::Day);
    }
}
