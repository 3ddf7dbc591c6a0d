//! Continuous, frame-driven shape motion.
//!
//! An [`AnimationSession`] turns elapsed frame time into per-shape transform
//! updates according to the active [`MotionProfile`]. It never touches
//! strokes or history; the editor decides when it runs.

mod frame_loop;

pub use frame_loop::{FrameClock, FrameControl, FrameHandle, FrameLoop};

use crate::shapes::Shape;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named rule governing how shapes move each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionProfile {
    /// Drift downwards, wrapping within the vertical band.
    #[default]
    Bounce,
    /// Pulse the visual scale of every shape.
    Breathe,
    /// Drift rightwards, wrapping within the horizontal band.
    Walk,
    /// Random jitter on both axes.
    Scatter,
    /// Spin in place.
    Rotate,
    /// A profile this version does not know; shapes stay put.
    #[serde(other)]
    Unknown,
}

impl MotionProfile {
    pub const KNOWN: [MotionProfile; 5] = [
        MotionProfile::Bounce,
        MotionProfile::Breathe,
        MotionProfile::Walk,
        MotionProfile::Scatter,
        MotionProfile::Rotate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MotionProfile::Bounce => "bounce",
            MotionProfile::Breathe => "breathe",
            MotionProfile::Walk => "walk",
            MotionProfile::Scatter => "scatter",
            MotionProfile::Rotate => "rotate",
            MotionProfile::Unknown => "unknown",
        }
    }

    /// Parse a profile name; unrecognized names map to [`MotionProfile::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::KNOWN
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .unwrap_or(MotionProfile::Unknown)
    }
}

impl fmt::Display for MotionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MotionProfile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Rates and bands for the motion profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Degrees per second at speed 1.
    pub angular_speed_base: f64,
    /// Canvas units per second at speed 1.
    pub movement_speed_base: f64,
    /// Height of the band `bounce` wraps within.
    pub bounce_band: f64,
    /// Width of the band `walk` wraps within.
    pub walk_band: f64,
    pub breathe_amplitude: f64,
    /// Elapsed milliseconds are divided by this before taking the sine.
    pub breathe_period: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            angular_speed_base: 30.0,
            movement_speed_base: 20.0,
            bounce_band: 600.0,
            walk_band: 800.0,
            breathe_amplitude: 0.01,
            breathe_period: 100.0,
            min_speed: 0.1,
            max_speed: 5.0,
        }
    }
}

/// Whether the session is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// The single active animation: profile, speed and frame time.
#[derive(Debug, Clone)]
pub struct AnimationSession {
    profile: MotionProfile,
    state: RunState,
    speed: f64,
    elapsed_ms: f64,
    last_frame_ms: Option<f64>,
    settings: MotionSettings,
}

impl Default for AnimationSession {
    fn default() -> Self {
        Self::new(MotionSettings::default())
    }
}

impl AnimationSession {
    pub fn new(settings: MotionSettings) -> Self {
        Self {
            profile: MotionProfile::default(),
            state: RunState::Stopped,
            speed: 1.0,
            elapsed_ms: 0.0,
            last_frame_ms: None,
            settings,
        }
    }

    pub fn profile(&self) -> MotionProfile {
        self.profile
    }

    /// Switch profile; takes effect on the next frame without touching shapes.
    pub fn set_profile(&mut self, profile: MotionProfile) {
        if profile == MotionProfile::Unknown {
            log::warn!("Unknown motion profile selected; shapes will not move");
        }
        self.profile = profile;
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Set the speed multiplier, clamped to the configured range.
    /// Non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !speed.is_finite() {
            log::warn!("Ignoring non-finite animation speed");
            return false;
        }
        self.speed = speed.clamp(self.settings.min_speed, self.settings.max_speed);
        true
    }

    pub fn settings(&self) -> &MotionSettings {
        &self.settings
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    /// Total frame time consumed while running, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Begin running from the current shape state.
    pub fn start(&mut self) {
        self.state = RunState::Running;
        self.last_frame_ms = None;
    }

    pub fn pause(&mut self) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        self.state = RunState::Paused;
        self.last_frame_ms = None;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != RunState::Paused {
            return false;
        }
        self.state = RunState::Running;
        true
    }

    /// Pause when running, run otherwise.
    pub fn toggle_pause(&mut self) -> RunState {
        match self.state {
            RunState::Running => {
                self.pause();
            }
            RunState::Paused => {
                self.resume();
            }
            RunState::Stopped => self.start(),
        }
        self.state
    }

    pub fn stop(&mut self) {
        self.state = RunState::Stopped;
        self.last_frame_ms = None;
    }

    /// Stop and rewind the frame time, so ephemeral effects return to rest.
    pub fn reset(&mut self) {
        self.stop();
        self.elapsed_ms = 0.0;
    }

    /// Visual scale applied to every shape this frame.
    pub fn scale(&self) -> f64 {
        match self.profile {
            MotionProfile::Breathe => {
                1.0 + self.settings.breathe_amplitude
                    * (self.elapsed_ms / self.settings.breathe_period).sin()
            }
            _ => 1.0,
        }
    }

    /// Advance using a frame timestamp from a monotonic clock.
    ///
    /// The first frame after start or resume only establishes the time base.
    /// Returns true if shapes were updated.
    /// Frames with a non-finite timestamp are ignored.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        shapes: &mut [Shape],
        rng: &mut R,
    ) -> bool {
        if !self.is_running() || !now_ms.is_finite() {
            return false;
        }
        let delta = match self.last_frame_ms {
            Some(previous) => (now_ms - previous).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        self.advance(delta, shapes, rng)
    }

    /// Advance by an explicit frame delta in milliseconds.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        delta_ms: f64,
        shapes: &mut [Shape],
        rng: &mut R,
    ) -> bool {
        if !self.is_running() || !delta_ms.is_finite() || delta_ms < 0.0 {
            return false;
        }
        self.elapsed_ms += delta_ms;

        let seconds = delta_ms / 1000.0;
        let angular = self.settings.angular_speed_base * self.speed * seconds;
        let movement = self.settings.movement_speed_base * self.speed * seconds;

        for shape in shapes.iter_mut() {
            self.apply(shape, angular, movement, rng);
        }
        true
    }

    fn apply<R: Rng + ?Sized>(&self, shape: &mut Shape, angular: f64, movement: f64, rng: &mut R) {
        match self.profile {
            MotionProfile::Rotate => shape.rotate_by(angular),
            MotionProfile::Scatter => {
                shape.position.x += rng.gen_range(-0.5..=0.5) * movement;
                shape.position.y += rng.gen_range(-0.5..=0.5) * movement;
            }
            MotionProfile::Bounce => {
                shape.position.y =
                    (shape.position.y + movement).rem_euclid(self.settings.bounce_band);
            }
            MotionProfile::Walk => {
                shape.position.x =
                    (shape.position.x + movement).rem_euclid(self.settings.walk_band);
            }
            // Scale is derived from elapsed time in `scale()`.
            MotionProfile::Breathe => {}
            MotionProfile::Unknown => {}
        }
    }
}
