//! Content extent resolver.
//!
//! The engine never inspects rendered content itself; it asks a
//! [`ContentExtentProvider`] how tall each card's body is and works out how
//! much of it overflows the open card's window.

use super::geometry::LayoutConstants;

/// Source of per-card intrinsic content extents, re-queried on every rebuild.
pub trait ContentExtentProvider {
    fn card_count(&self) -> usize;

    /// Full extent of card `index`'s inner content (e.g. body rows).
    fn intrinsic_extent(&self, index: usize) -> f64;
}

impl ContentExtentProvider for [f64] {
    fn card_count(&self) -> usize {
        self.len()
    }

    fn intrinsic_extent(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(0.0)
    }
}

impl ContentExtentProvider for Vec<f64> {
    fn card_count(&self) -> usize {
        self.len()
    }

    fn intrinsic_extent(&self, index: usize) -> f64 {
        self.as_slice().intrinsic_extent(index)
    }
}

/// How far a card's content can scroll once the card is fully open.
/// Zero when the content fits the window.
pub fn content_scrollable(constants: &LayoutConstants, intrinsic_extent: f64) -> f64 {
    (intrinsic_extent - constants.content_window()).max(0.0)
}
