//! Spin engine
//!
//! Ties selection, planning, and animation together behind the host-facing
//! surface: `configure`, `spin`, `reset`, `set_angle`, and a frame callback.
//!
//! Everything runs on one logical thread. Mutual exclusion between spins is a
//! plain flag check; a second `spin` while one is in flight is a no-op.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::animator::{FrameStep, SpinAnimator};
use super::planner::{SpinPlan, plan_target_at};
use super::select::{RandomSource, WeightReport, WeightTable};
use super::wedge::{Wedge, WedgeId, WheelLayout};
use crate::error::SpinError;
use crate::normalize_degrees;
use crate::platform::Clock;
use crate::settings::{SpinOptions, SpinSettings};

/// Live engine state, mutated in place across spins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinState {
    pub is_spinning: bool,
    /// Unbounded rotation in degrees; normalize with `normalize_degrees` for display
    pub current_angle: f64,
    /// Absolute angle being animated toward (None when idle)
    pub target_angle: Option<f64>,
    /// Clock time the current animation began
    pub started_at: Option<f64>,
}

/// Outcome of a completed spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub wedge: Wedge,
    /// Target angle mod 360
    pub final_angle: f64,
    /// Clock time of the final frame
    pub timestamp: f64,
}

/// Answer to a spin request that was not an error
#[derive(Debug, Clone, PartialEq)]
pub enum SpinRequest {
    /// Animation started toward `plan.target_angle`
    Started { winner: WedgeId, plan: SpinPlan },
    /// A spin was already in flight; nothing changed
    Ignored,
}

impl SpinRequest {
    pub fn is_started(&self) -> bool {
        matches!(self, SpinRequest::Started { .. })
    }
}

/// Receives engine output
pub trait SpinListener {
    /// Fired on every animation frame while spinning
    fn on_frame(&mut self, _angle: f64) {}
    /// Fired exactly once per completed spin
    fn on_spin_complete(&mut self, _result: &SpinResult) {}
}

/// Engine output as data
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    Frame(f64),
    Completed(SpinResult),
}

/// Shared event buffer usable as a listener
///
/// Hosts that must not re-enter the engine from inside a callback queue events
/// here and dispatch them after the engine call returns.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Rc<RefCell<VecDeque<SpinEvent>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<SpinEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl SpinListener for EventQueue {
    fn on_frame(&mut self, angle: f64) {
        self.events.borrow_mut().push_back(SpinEvent::Frame(angle));
    }

    fn on_spin_complete(&mut self, result: &SpinResult) {
        self.events.borrow_mut().push_back(SpinEvent::Completed(result.clone()));
    }
}

/// Prize wheel spin engine
pub struct SpinEngine<C: Clock, R: RandomSource> {
    wedges: Vec<Wedge>,
    settings: SpinSettings,
    state: SpinState,
    animator: SpinAnimator,
    /// Winner of the in-flight spin
    winner: Option<Wedge>,
    last_result: Option<SpinResult>,
    frame_requested: bool,
    clock: C,
    rng: R,
    listener: Option<Box<dyn SpinListener>>,
}

impl<C: Clock, R: RandomSource> SpinEngine<C, R> {
    pub fn new(clock: C, rng: R) -> Self {
        Self::with_settings(SpinSettings::default(), clock, rng)
    }

    pub fn with_settings(settings: SpinSettings, clock: C, rng: R) -> Self {
        Self {
            wedges: Vec::new(),
            settings,
            state: SpinState::default(),
            animator: SpinAnimator::new(),
            winner: None,
            last_result: None,
            frame_requested: false,
            clock,
            rng,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: impl SpinListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning
    }

    pub fn current_angle(&self) -> f64 {
        self.state.current_angle
    }

    pub fn wedges(&self) -> &[Wedge] {
        &self.wedges
    }

    pub fn layout(&self) -> WheelLayout {
        WheelLayout::new(&self.wedges)
    }

    pub fn weights(&self) -> WeightTable {
        WeightTable::new(&self.layout())
    }

    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    /// Replace settings; takes effect on the next spin
    pub fn set_settings(&mut self, settings: SpinSettings) {
        self.settings = settings;
    }

    /// Result of the most recent completed spin (cleared when a new spin starts)
    pub fn last_result(&self) -> Option<&SpinResult> {
        self.last_result.as_ref()
    }

    /// Replace the working wedge set between spins
    ///
    /// Over-allocated prize weights are accepted; the returned report carries
    /// the warning for the host's validation layer.
    pub fn configure(&mut self, wedges: Vec<Wedge>) -> Result<WeightReport, SpinError> {
        if self.state.is_spinning {
            log::debug!("configure ignored: spin in progress");
            return Err(SpinError::AlreadySpinning);
        }

        self.wedges = wedges;
        let report = self.weights().report();
        if let Some(warning) = report.warning() {
            log::warn!("{warning}");
        }
        log::debug!(
            "Configured {} wedges ({} active)",
            self.wedges.len(),
            self.wedges.iter().filter(|w| w.is_active).count()
        );
        Ok(report)
    }

    /// Request a spin
    pub fn spin(&mut self, options: SpinOptions) -> Result<SpinRequest, SpinError> {
        if self.state.is_spinning {
            log::debug!("spin ignored: already spinning");
            return Ok(SpinRequest::Ignored);
        }

        let layout = self.layout();
        if layout.is_empty() {
            log::warn!("spin rejected: no active wedges");
            return Err(SpinError::NoActiveWedges);
        }

        let params = options.resolve(&self.settings);
        let table = WeightTable::new(&layout);
        // Carry the drawn slot through; ids are not guaranteed unique
        let index = table
            .pick_index(self.rng.next_unit())
            .ok_or(SpinError::NoActiveWedges)?;
        let winner = layout
            .get(index)
            .cloned()
            .ok_or(SpinError::NoActiveWedges)?;

        let plan = plan_target_at(
            &layout,
            index,
            self.state.current_angle,
            params.min_spins,
            params.max_spins,
            params.jitter_fraction,
            &mut self.rng,
        )
        .inspect_err(|e| log::error!("spin aborted: {e}"))?;

        let now = self.clock.now();
        self.animator
            .start(self.state.current_angle, plan.target_angle, params.duration_ms, now)?;

        self.state.is_spinning = true;
        self.state.target_angle = Some(plan.target_angle);
        self.state.started_at = Some(now);
        self.last_result = None;
        self.winner = Some(winner.clone());
        self.request_frame();

        log::info!(
            "Spin started: winner={} spins={} target={:.2}",
            winner.id,
            plan.spins,
            plan.target_angle
        );

        Ok(SpinRequest::Started {
            winner: winner.id,
            plan,
        })
    }

    /// Host frame callback
    ///
    /// Frames the engine did not request (for example one already queued by
    /// the host before a reset) are ignored.
    pub fn on_animation_frame(&mut self) {
        if !self.frame_requested {
            return;
        }
        self.frame_requested = false;

        let now = self.clock.now();
        match self.animator.advance(now) {
            FrameStep::Idle => {}
            FrameStep::Frame { angle } => {
                self.state.current_angle = angle;
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_frame(angle);
                }
                self.request_frame();
            }
            FrameStep::Finished { angle } => {
                self.state.current_angle = angle;
                if let Some(listener) = self.listener.as_mut() {
                    listener.on_frame(angle);
                }
                self.finish(angle, now);
            }
        }
    }

    fn finish(&mut self, target_angle: f64, now: f64) {
        self.state.is_spinning = false;
        self.state.target_angle = None;
        self.state.started_at = None;

        let Some(wedge) = self.winner.take() else {
            return;
        };
        let result = SpinResult {
            wedge,
            final_angle: normalize_degrees(target_angle),
            timestamp: now,
        };
        log::info!(
            "Spin complete: {} at {:.2}°",
            result.wedge.id,
            result.final_angle
        );

        if let Some(listener) = self.listener.as_mut() {
            listener.on_spin_complete(&result);
        }
        self.last_result = Some(result);
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
        self.clock.schedule_frame();
    }

    /// Cancel any in-flight spin and zero the rotation
    pub fn reset(&mut self) {
        self.reset_to(0.0);
    }

    /// Cancel any in-flight spin and set the rotation to `baseline`
    ///
    /// A cancelled spin never reports completion. A non-finite baseline
    /// resets to 0.
    pub fn reset_to(&mut self, baseline: f64) {
        if self.animator.cancel() {
            log::debug!("Spin cancelled by reset");
        }
        if self.frame_requested {
            self.clock.cancel_frame();
            self.frame_requested = false;
        }
        self.winner = None;
        self.state = SpinState {
            current_angle: if baseline.is_finite() { baseline } else { 0.0 },
            ..SpinState::default()
        };
    }

    /// Force the rotation directly; ignored while spinning or for non-finite angles
    pub fn set_angle(&mut self, angle: f64) -> bool {
        if self.state.is_spinning {
            log::debug!("set_angle ignored: spin in progress");
            return false;
        }
        if !angle.is_finite() {
            log::warn!("set_angle ignored: {angle} is not a finite angle");
            return false;
        }
        self.state.current_angle = angle;
        true
    }
}
