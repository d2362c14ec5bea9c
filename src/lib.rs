//! Spin Wheel - weighted prize-wheel spin engine
//!
//! Core modules:
//! - `wheel`: Wedge layout, outcome selection, angle planning, spin animation
//! - `platform`: Clock abstraction and browser host binding
//! - `settings`: Spin configuration and per-spin overrides
//! - `error`: Error taxonomy for engine requests

pub mod error;
pub mod platform;
pub mod settings;
pub mod wheel;

pub use error::SpinError;
pub use settings::{SettingsError, SpinOptions, SpinSettings};
pub use wheel::{SpinEngine, SpinResult, SpinState, Wedge, WedgeId};

/// Engine configuration constants
pub mod consts {
    /// Degrees in one full turn of the wheel
    pub const FULL_TURN: f64 = 360.0;
    /// Pointer position (degrees, "north")
    pub const POINTER_ANGLE: f64 = 0.0;
    /// Percentage points shared between prize and filler wedges
    pub const TOTAL_WEIGHT: f64 = 100.0;

    /// Default whole-turn range for a spin, [min, max)
    pub const DEFAULT_MIN_SPINS: u32 = 3;
    pub const DEFAULT_MAX_SPINS: u32 = 6;
    /// Default spin animation length
    pub const DEFAULT_DURATION_MS: f64 = 5000.0;
    /// Landing offset as a fraction of a wedge span (each side of center)
    pub const DEFAULT_JITTER_FRACTION: f64 = 0.4;
    /// Jitter must stay below half a span so the pointer never sits on a border
    pub const MAX_JITTER_FRACTION: f64 = 0.5;
}

/// Normalize an unbounded rotation to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let angle = angle.rem_euclid(consts::FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if angle >= consts::FULL_TURN { 0.0 } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(1215.0), 135.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }
}
