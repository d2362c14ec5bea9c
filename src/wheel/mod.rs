//! Prize wheel core
//!
//! Pure and deterministic given its collaborators:
//! - Randomness only through an injected `RandomSource`
//! - Time and frame scheduling only through a `Clock`
//! - No rendering or persistence

pub mod animator;
pub mod engine;
pub mod planner;
pub mod select;
pub mod wedge;

pub use animator::{AnimatorPhase, FrameStep, SpinAnimation, SpinAnimator, ease_out_quartic};
pub use engine::{
    EventQueue, SpinEngine, SpinEvent, SpinListener, SpinRequest, SpinResult, SpinState,
};
pub use planner::{
    SpinPlan, draw_jitter, draw_spins, plan_rotation, plan_target_angle, plan_target_at,
};
pub use select::{
    RandomSource, SeededRandom, SequenceRandom, WeightReport, WeightTable, WeightedEntry,
    select_winner,
};
pub use wedge::{Wedge, WedgeId, WedgeSpan, WheelLayout};
