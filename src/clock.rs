//! World clock and day/night lighting driver.
//!
//! The clock is the single source of truth for simulation time. Phase, the
//! night flag and the night factor are derived from elapsed time on demand and
//! never stored independently. The only stored derivative is the previous
//! frame's night flag, which makes the "night reached" notification
//! edge-triggered.

use glam::Vec3;
use log::debug;

use crate::constants::{
    AMBIENT_DAY_INTENSITY, AMBIENT_NIGHT_DIMMING, DAWN_START, DUSK_START,
    HEMISPHERE_DAY_INTENSITY, HEMISPHERE_NIGHT_DIMMING, NIGHT_START, SKY_DAY_RGB, SKY_NIGHT_RGB,
    SUN_DAY_INTENSITY, SUN_DAY_RGB, SUN_NIGHT_DIMMING, SUN_NIGHT_RGB, WINDOW_GLOW_INTENSITY,
};
use crate::numeric::{expect_f32, finite_or_zero};

/// Errors raised when constructing a clock.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    /// The half-cycle length must be positive and finite.
    #[error("half-cycle length must be a positive number of seconds, got {0}")]
    InvalidHalfCycle(f64),
    /// The frame delta cap must be positive and finite.
    #[error("maximum frame delta must be a positive number of seconds, got {0}")]
    InvalidMaxDelta(f64),
}

/// Which half of the cycle the world is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayPhase {
    /// Phase up to and including one half.
    #[default]
    Day,
    /// Phase past one half.
    Night,
}

impl DayPhase {
    /// Human-readable label shown by the UI.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Night => "Night",
        }
    }
}

/// Lighting parameters derived from the night factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Sky and fog colour, linear blend of the day and night colours.
    pub sky: Vec3,
    /// Directional sun strength relative to full daylight.
    pub sun_intensity: f32,
    /// Warm by day, cool blue once the night factor passes one half.
    pub sun_color: Vec3,
    /// Uniform fill light strength.
    pub ambient_intensity: f32,
    /// Sky/ground hemisphere light strength.
    pub hemisphere_intensity: f32,
    /// Emissive strength of the dwelling's windows.
    pub window_emissive: f32,
}

impl Lighting {
    /// Computes lighting for a night factor in `[0, 1]`.
    #[must_use]
    pub fn for_night_factor(night_factor: f32) -> Self {
        let nf = night_factor.clamp(0.0, 1.0);
        let sun_color = if nf > 0.5 { SUN_NIGHT_RGB } else { SUN_DAY_RGB };
        Self {
            sky: rgb(SKY_DAY_RGB).lerp(rgb(SKY_NIGHT_RGB), nf),
            sun_intensity: SUN_DAY_INTENSITY - nf * SUN_NIGHT_DIMMING,
            sun_color: rgb(sun_color),
            ambient_intensity: AMBIENT_DAY_INTENSITY - nf * AMBIENT_NIGHT_DIMMING,
            hemisphere_intensity: HEMISPHERE_DAY_INTENSITY - nf * HEMISPHERE_NIGHT_DIMMING,
            window_emissive: nf * WINDOW_GLOW_INTENSITY,
        }
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::for_night_factor(0.0)
    }
}

/// Unpacks a `0xRRGGBB` colour into components in `[0, 1]`.
///
/// # Examples
/// ```
/// use roamer::clock::rgb;
/// let c = rgb(0xFF8000);
/// assert_eq!(c.x, 1.0);
/// assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
/// assert_eq!(c.z, 0.0);
/// ```
#[must_use]
pub fn rgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let byte = u8::try_from((hex >> shift) & 0xFF).unwrap_or(u8::MAX);
        f32::from(byte) / 255.0
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Night factor for a cycle phase in `[0, 1)`.
///
/// Zero before dusk, a linear ramp to one across dusk, one through the night
/// and a linear ramp back to zero across dawn.
#[must_use]
pub fn night_factor_at(phase: f64) -> f32 {
    let factor = if phase < DUSK_START {
        0.0
    } else if phase < NIGHT_START {
        (phase - DUSK_START) / (NIGHT_START - DUSK_START)
    } else if phase < DAWN_START {
        1.0
    } else {
        1.0 - (phase - DAWN_START) / (1.0 - DAWN_START)
    };
    expect_f32(factor.clamp(0.0, 1.0))
}

/// Result of advancing the clock by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockStep {
    /// Delta actually integrated after clamping.
    pub applied: f64,
    /// `true` only on the frame the night flag turned on.
    pub night_began: bool,
}

/// Monotonic simulation clock with a cyclical day/night phase.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldClock {
    elapsed: f64,
    half_cycle: f64,
    max_delta: f64,
    was_night: bool,
}

impl WorldClock {
    /// Creates a clock at time zero.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] when either duration is not a positive finite
    /// number.
    pub fn new(half_cycle: f64, max_delta: f64) -> Result<Self, ClockError> {
        if !(half_cycle.is_finite() && half_cycle > 0.0) {
            return Err(ClockError::InvalidHalfCycle(half_cycle));
        }
        if !(max_delta.is_finite() && max_delta > 0.0) {
            return Err(ClockError::InvalidMaxDelta(max_delta));
        }
        Ok(Self {
            elapsed: 0.0,
            half_cycle,
            max_delta,
            was_night: false,
        })
    }

    /// Moves the clock to `elapsed` seconds without emitting a transition.
    ///
    /// Intended for restoring a session or setting up a scenario; negative
    /// or non-finite values are treated as zero.
    #[must_use]
    pub fn at(mut self, elapsed: f64) -> Self {
        self.elapsed = finite_or_zero(elapsed).max(0.0);
        self.was_night = self.is_night();
        self
    }

    /// Advances elapsed time by `dt`, clamped to `[0, max_delta]`.
    pub fn advance(&mut self, dt: f64) -> ClockStep {
        let applied = finite_or_zero(dt).clamp(0.0, self.max_delta);
        self.elapsed += applied;

        let night = self.is_night();
        let night_began = night && !self.was_night;
        self.was_night = night;
        if night_began {
            debug!("night began at t={:.2}s", self.elapsed);
        }
        ClockStep {
            applied,
            night_began,
        }
    }

    /// Seconds simulated since the session started.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Position within the full day+night cycle, in `[0, 1)`.
    #[must_use]
    pub fn phase(&self) -> f64 {
        let cycle = self.half_cycle * 2.0;
        (self.elapsed % cycle) / cycle
    }

    /// `true` through the second half of the cycle.
    #[must_use]
    pub fn is_night(&self) -> bool {
        self.phase() > NIGHT_START
    }

    /// The night flag as a labelled phase.
    #[must_use]
    pub fn day_phase(&self) -> DayPhase {
        if self.is_night() {
            DayPhase::Night
        } else {
            DayPhase::Day
        }
    }

    /// Darkness in `[0, 1]` for the current phase.
    #[must_use]
    pub fn night_factor(&self) -> f32 {
        night_factor_at(self.phase())
    }

    /// Lighting for the current night factor.
    #[must_use]
    pub fn lighting(&self) -> Lighting {
        Lighting::for_night_factor(self.night_factor())
    }
}
