//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (milliseconds since an arbitrary epoch)
//! - Per-frame scheduling (requestAnimationFrame on web, a manual pump natively)

use std::cell::Cell;
use std::rc::Rc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Time source and frame scheduler for the spin engine
///
/// `schedule_frame` asks the host to call `SpinEngine::on_animation_frame`
/// once at its next display refresh.
pub trait Clock {
    /// Current time in milliseconds
    fn now(&self) -> f64;
    /// Request one animation frame
    fn schedule_frame(&self);
    /// Drop any outstanding frame request
    fn cancel_frame(&self) {}
}

/// Manually driven clock for tests and headless hosts
///
/// Clones share the same time and frame counters, so a test can keep a
/// handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
    pending: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Outstanding frame requests
    pub fn pending_frames(&self) -> u32 {
        self.pending.get()
    }

    /// Consume one frame request; returns false if none was pending
    pub fn take_frame(&self) -> bool {
        let pending = self.pending.get();
        if pending == 0 {
            return false;
        }
        self.pending.set(pending - 1);
        true
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn schedule_frame(&self) {
        self.pending.set(self.pending.get() + 1);
    }

    fn cancel_frame(&self) {
        self.pending.set(0);
    }
}

/// Wall-clock time for native hosts that pump frames in their own loop
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
    frame_requested: Rc<Cell<bool>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            frame_requested: Rc::new(Cell::new(false)),
        }
    }

    /// Consume the pending frame request, if any
    pub fn take_frame(&self) -> bool {
        self.frame_requested.replace(false)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn schedule_frame(&self) {
        self.frame_requested.set(true);
    }

    fn cancel_frame(&self) {
        self.frame_requested.set(false);
    }
}
