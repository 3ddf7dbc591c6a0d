//! Cancelable frame scheduling.
//!
//! The host owns the real refresh callback (a browser animation frame, a
//! winit redraw, a sleep loop). Each callback presents the [`FrameHandle`] it
//! was started with; once the loop is stopped every outstanding handle is
//! rejected and the host is told to stop rescheduling.

// Use web-time on WASM, std::time otherwise
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Token authorizing frame callbacks for one run of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// What the host should do after delivering a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Schedule another frame.
    Continue,
    /// Do not schedule further frames.
    Stop,
}

/// Start/stop state of the frame loop.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    generation: u64,
    active: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop, or return the current handle if already running.
    pub fn start(&mut self) -> FrameHandle {
        if !self.active {
            self.generation += 1;
            self.active = true;
            log::debug!("Frame loop started (generation {})", self.generation);
        }
        FrameHandle(self.generation)
    }

    /// Stop the loop. Safe to call any number of times.
    /// Returns true if the loop was running.
    pub fn stop(&mut self) -> bool {
        let was_active = self.active;
        if was_active {
            log::debug!("Frame loop stopped (generation {})", self.generation);
        }
        self.active = false;
        was_active
    }

    pub fn is_running(&self) -> bool {
        self.active
    }

    /// Handle for the current run, if the loop is running.
    pub fn handle(&self) -> Option<FrameHandle> {
        self.active.then_some(FrameHandle(self.generation))
    }

    /// Whether a frame carrying `handle` may run.
    pub fn accepts(&self, handle: FrameHandle) -> bool {
        self.active && handle.0 == self.generation
    }
}

/// Monotonic millisecond clock for hosts without their own frame timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    origin: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since the clock was created.
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
