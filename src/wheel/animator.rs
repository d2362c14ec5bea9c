//! Time-based spin animation
//!
//! Progress is computed from absolute elapsed time on every frame, never from
//! accumulated deltas, so a stalled host simply jumps ahead on the next frame.

use serde::{Deserialize, Serialize};

use crate::error::SpinError;

/// Quartic ease-out: fast start, smooth deceleration into the result
#[inline]
pub fn ease_out_quartic(progress: f64) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

/// One in-flight rotation from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinAnimation {
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    pub started_at: f64,
}

impl SpinAnimation {
    /// Normalized time progress in [0, 1]
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Rotation at `now`; exactly `to` once complete
    pub fn angle_at(&self, now: f64) -> f64 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        let angle = self.from + (self.to - self.from) * ease_out_quartic(progress);
        angle.min(self.to)
    }
}

/// Result of advancing the animator by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// Nothing in flight
    Idle,
    /// Mid-spin frame; another frame is needed
    Frame { angle: f64 },
    /// Final frame; the animator is idle again
    Finished { angle: f64 },
}

/// Idle -> Spinning -> Idle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AnimatorPhase {
    #[default]
    Idle,
    Spinning(SpinAnimation),
}

/// Drives a single rotation value over wall-clock time
#[derive(Debug, Clone, Default)]
pub struct SpinAnimator {
    phase: AnimatorPhase,
    last_frame_at: Option<f64>,
}

impl SpinAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.phase, AnimatorPhase::Spinning(_))
    }

    pub fn animation(&self) -> Option<&SpinAnimation> {
        match &self.phase {
            AnimatorPhase::Spinning(animation) => Some(animation),
            AnimatorPhase::Idle => None,
        }
    }

    /// Begin animating; only one spin may run at a time
    pub fn start(&mut self, from: f64, to: f64, duration_ms: f64, now: f64) -> Result<(), SpinError> {
        if self.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        self.phase = AnimatorPhase::Spinning(SpinAnimation {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            started_at: now,
        });
        self.last_frame_at = None;
        Ok(())
    }

    /// Advance to `now`
    ///
    /// A host timestamp earlier than the previous frame is treated as the
    /// previous frame's time, keeping frames ordered.
    pub fn advance(&mut self, now: f64) -> FrameStep {
        let AnimatorPhase::Spinning(animation) = self.phase else {
            return FrameStep::Idle;
        };

        let now = self.last_frame_at.map_or(now, |last| now.max(last));
        self.last_frame_at = Some(now);

        let angle = animation.angle_at(now);
        if animation.progress(now) < 1.0 {
            FrameStep::Frame { angle }
        } else {
            self.phase = AnimatorPhase::Idle;
            self.last_frame_at = None;
            FrameStep::Finished { angle }
        }
    }

    /// Stop without finishing; returns whether a spin was in flight
    pub fn cancel(&mut self) -> bool {
        let was_spinning = self.is_spinning();
        self.phase = AnimatorPhase::Idle;
        self.last_frame_at = None;
        was_spinning
    }
}
