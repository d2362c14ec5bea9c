//! Spin engine errors
//!
//! `AlreadySpinning` is never surfaced by `SpinEngine::spin` itself (the engine
//! answers with `SpinRequest::Ignored`), but lower layers such as the animator
//! report it so the engine can decide.

use crate::wheel::WedgeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpinError {
    /// Spin requested with no active wedges; engine stays idle
    #[error("no active wedges to spin")]
    NoActiveWedges,
    /// Spin or angle change requested while a spin is in flight
    #[error("a spin is already in progress")]
    AlreadySpinning,
    /// Prize weights sum past 100; selection still proceeds
    #[error("prize weights sum to {total}, exceeding 100")]
    InvalidWeightConfiguration { total: f64 },
    /// Selector and planner disagree on the active wedge set
    #[error("wedge {0} is not part of the active layout")]
    WedgeNotFound(WedgeId),
    /// Planner asked for a layout slot that does not exist
    #[error("wedge index {index} is outside a layout of {len}")]
    WedgeIndexOutOfRange { index: usize, len: usize },
}

impl SpinError {
    /// Soft errors are warnings the caller may surface; the engine keeps working
    pub fn is_soft(&self) -> bool {
        matches!(self, SpinError::InvalidWeightConfiguration { .. })
    }
}
