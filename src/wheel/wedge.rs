//! Wedge definitions and wheel layout
//!
//! Angles are degrees measured clockwise from the pointer (0°, "north").
//! Active wedges are laid out by ascending `order`, each taking an equal
//! span of `360 / N`:
//! - wedge 0 covers [0, span)
//! - wedge i covers [i * span, (i + 1) * span)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{FULL_TURN, POINTER_ANGLE};
use crate::normalize_degrees;

/// Stable wedge identifier (survives reordering)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WedgeId(String);

impl WedgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WedgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for WedgeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for WedgeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One slice of the wheel
///
/// Optional host fields are defaulted at deserialization so the rest of the
/// engine never checks for their presence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wedge {
    pub id: WedgeId,
    /// Display label (not used by the engine)
    #[serde(default)]
    pub label: String,
    /// Percentage points in [0, 100]; only meaningful for prize wedges
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub is_prize: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Angular position among active wedges (ascending = clockwise from pointer)
    #[serde(default)]
    pub order: i32,
}

fn default_active() -> bool {
    true
}

impl Wedge {
    /// A wedge carrying an explicit weight
    pub fn prize(id: impl Into<WedgeId>, weight: f64) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            weight,
            is_prize: true,
            is_active: true,
            order: 0,
        }
    }

    /// A wedge that shares the unallocated weight with other fillers
    pub fn filler(id: impl Into<WedgeId>) -> Self {
        Self {
            is_prize: false,
            weight: 0.0,
            ..Self::prize(id, 0.0)
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Parse a wedge list from the host's JSON records
    pub fn list_from_json(json: &str) -> Result<Vec<Wedge>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Angular extent of a wedge on the wheel, [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WedgeSpan {
    pub start: f64,
    pub end: f64,
}

impl WedgeSpan {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        self.start + self.width() / 2.0
    }

    /// Check if a wheel position (any rotation) falls inside the span
    pub fn contains_angle(&self, angle: f64) -> bool {
        let angle = normalize_degrees(angle);
        angle >= self.start && angle < self.end
    }
}

/// Active wedges in clockwise order from the pointer
///
/// Ties in `order` keep their configured sequence (stable sort).
#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    wedges: Vec<Wedge>,
}

impl WheelLayout {
    pub fn new(wedges: &[Wedge]) -> Self {
        let mut active: Vec<Wedge> = wedges.iter().filter(|w| w.is_active).cloned().collect();
        active.sort_by_key(|w| w.order);
        Self { wedges: active }
    }

    pub fn is_empty(&self) -> bool {
        self.wedges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.wedges.len()
    }

    pub fn wedges(&self) -> &[Wedge] {
        &self.wedges
    }

    pub fn get(&self, index: usize) -> Option<&Wedge> {
        self.wedges.get(index)
    }

    /// Degrees per wedge (0 for an empty wheel)
    pub fn angle_per_wedge(&self) -> f64 {
        if self.wedges.is_empty() {
            0.0
        } else {
            FULL_TURN / self.wedges.len() as f64
        }
    }

    pub fn index_of(&self, id: &WedgeId) -> Option<usize> {
        self.wedges.iter().position(|w| &w.id == id)
    }

    pub fn span_of(&self, index: usize) -> Option<WedgeSpan> {
        if index >= self.wedges.len() {
            return None;
        }
        let span = self.angle_per_wedge();
        Some(WedgeSpan {
            start: index as f64 * span,
            end: (index + 1) as f64 * span,
        })
    }

    /// Wheel position currently under the pointer after rotating by `rotation`
    pub fn pointer_position(rotation: f64) -> f64 {
        normalize_degrees(POINTER_ANGLE + FULL_TURN - normalize_degrees(rotation))
    }

    /// Index of the wedge under the pointer for an unbounded rotation
    pub fn index_at_angle(&self, rotation: f64) -> Option<usize> {
        if self.wedges.is_empty() {
            return None;
        }
        let position = Self::pointer_position(rotation);
        let index = (position / self.angle_per_wedge()).floor() as usize;
        Some(index.min(self.wedges.len() - 1))
    }

    /// Wedge under the pointer for an unbounded rotation
    pub fn wedge_at_angle(&self, rotation: f64) -> Option<&Wedge> {
        self.index_at_angle(rotation).and_then(|i| self.wedges.get(i))
    }
}
