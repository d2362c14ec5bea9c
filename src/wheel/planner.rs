//! Target angle planning
//!
//! The pointer is fixed at 0° and the wheel turns clockwise. Landing wedge `i`
//! under the pointer means rotating until its center (plus jitter) sits at
//! 360°, then adding whole turns for show. The residual is measured from the
//! current angle mod 360 so every spin lands correctly, not only the first.

use serde::{Deserialize, Serialize};

use super::select::RandomSource;
use super::wedge::{WedgeId, WheelLayout};
use crate::consts::{FULL_TURN, POINTER_ANGLE};
use crate::error::SpinError;
use crate::normalize_degrees;

/// Rotation planned for one spin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinPlan {
    /// Layout index of the winning wedge
    pub index: usize,
    /// Whole turns added for effect
    pub spins: u32,
    /// Offset from the wedge center, degrees
    pub jitter: f64,
    /// Rotation to add to the current angle (always positive)
    pub total_rotation: f64,
    /// Absolute angle to animate toward
    pub target_angle: f64,
}

/// Draw a whole number of turns from [min, max), or `min` when the range is empty
pub fn draw_spins<R: RandomSource + ?Sized>(min_spins: u32, max_spins: u32, rng: &mut R) -> u32 {
    if max_spins <= min_spins {
        return min_spins;
    }
    let range = (max_spins - min_spins) as f64;
    let offset = (rng.next_unit().clamp(0.0, 1.0) * range).floor() as u32;
    min_spins + offset.min(max_spins - min_spins - 1)
}

/// Uniform offset in [-fraction, fraction] * span
pub fn draw_jitter<R: RandomSource + ?Sized>(angle_per_wedge: f64, fraction: f64, rng: &mut R) -> f64 {
    if fraction <= 0.0 {
        return 0.0;
    }
    (rng.next_unit().clamp(0.0, 1.0) * 2.0 - 1.0) * fraction * angle_per_wedge
}

/// Build the rotation plan for the wedge at layout `index`
pub fn plan_rotation(
    layout: &WheelLayout,
    index: usize,
    current_angle: f64,
    spins: u32,
    jitter: f64,
) -> Result<SpinPlan, SpinError> {
    let span = layout.span_of(index).ok_or(SpinError::WedgeIndexOutOfRange {
        index,
        len: layout.len(),
    })?;

    let rest = normalize_degrees(
        POINTER_ANGLE + FULL_TURN - span.center() + jitter - normalize_degrees(current_angle),
    );
    let total_rotation = spins as f64 * FULL_TURN + rest;

    Ok(SpinPlan {
        index,
        spins,
        jitter,
        total_rotation,
        target_angle: current_angle + total_rotation,
    })
}

/// Plan the absolute target angle that lands layout slot `index` under the pointer
///
/// Works on positions, so wedges sharing an id still land where they were drawn.
pub fn plan_target_at<R: RandomSource + ?Sized>(
    layout: &WheelLayout,
    index: usize,
    current_angle: f64,
    min_spins: u32,
    max_spins: u32,
    jitter_fraction: f64,
    rng: &mut R,
) -> Result<SpinPlan, SpinError> {
    // Reject before consuming randomness
    if index >= layout.len() {
        return Err(SpinError::WedgeIndexOutOfRange {
            index,
            len: layout.len(),
        });
    }
    let spins = draw_spins(min_spins, max_spins, rng);
    let jitter = draw_jitter(layout.angle_per_wedge(), jitter_fraction, rng);
    plan_rotation(layout, index, current_angle, spins, jitter)
}

/// Plan the absolute target angle that lands `winner` under the pointer
pub fn plan_target_angle<R: RandomSource + ?Sized>(
    layout: &WheelLayout,
    winner: &WedgeId,
    current_angle: f64,
    min_spins: u32,
    max_spins: u32,
    jitter_fraction: f64,
    rng: &mut R,
) -> Result<SpinPlan, SpinError> {
    let index = layout
        .index_of(winner)
        .ok_or_else(|| SpinError::WedgeNotFound(winner.clone()))?;
    plan_target_at(
        layout,
        index,
        current_angle,
        min_spins,
        max_spins,
        jitter_fraction,
        rng,
    )
}
