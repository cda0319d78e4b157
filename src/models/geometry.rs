//! Normalized page geometry.

use serde::{Deserialize, Serialize};

/// Tolerance for comparing boxes that have round-tripped through JSON.
const COMPARISON_THRESHOLD: f64 = 1e-5;

/// A rectangle expressed as fractions of the page dimensions in `[0, 1]`,
/// with a top-left origin.
///
/// Width and height are non-negative. Serialized field names match the
/// upstream OCR engine's geometry output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    /// Fraction of the page width covered by the box.
    pub width: f64,
    /// Fraction of the page height covered by the box.
    pub height: f64,
    /// Distance of the left edge from the left of the page.
    pub left: f64,
    /// Distance of the top edge from the top of the page.
    pub top: f64,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(width: f64, height: f64, left: f64, top: f64) -> Self {
        Self {
            width,
            height,
            left,
            top,
        }
    }

    /// Distance of the right edge from the left of the page.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Distance of the bottom edge from the top of the page.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Returns the smallest box enclosing both `self` and `other`.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self {
            width: right - left,
            height: bottom - top,
            left,
            top,
        }
    }
}

/// Approximate equality: serialization round-trips through floating point,
/// so coordinates within [`COMPARISON_THRESHOLD`] compare equal.
impl PartialEq for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        (self.width - other.width).abs() < COMPARISON_THRESHOLD
            && (self.height - other.height).abs() < COMPARISON_THRESHOLD
            && (self.left - other.left).abs() < COMPARISON_THRESHOLD
            && (self.top - other.top).abs() < COMPARISON_THRESHOLD
    }
}
