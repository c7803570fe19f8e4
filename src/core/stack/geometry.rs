//! Geometry calculator — layout constants derived from the container size.
//!
//! [`StackConfig`] holds the fixed parameters chosen once at startup (tab
//! size, overlap, card count).  [`StackConfig::measure`] turns them plus the
//! current container extent into [`LayoutConstants`], which every other
//! engine component reads.  Re-measure on every resize.

use thiserror::Error;

// ───────────────────────────────────────── errors ────────────

/// Rejected stack parameters.  Only raised by [`StackConfig::configure`];
/// nothing downstream of a valid config can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StackError {
    #[error("a card stack needs at least one card")]
    NoCards,
    #[error("tab size must be a positive finite number (got {0})")]
    InvalidTabSize(f64),
    #[error("overlap must lie in [0, tab size {tab_size}) (got {overlap})")]
    InvalidOverlap { overlap: f64, tab_size: f64 },
}

// ───────────────────────────────────────── config ────────────

/// One-time stack parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackConfig {
    tab_size: f64,
    overlap: f64,
    card_count: usize,
}

impl StackConfig {
    /// Validate and freeze the stack parameters.
    pub fn configure(tab_size: f64, overlap: f64, card_count: usize) -> Result<Self, StackError> {
        if card_count == 0 {
            return Err(StackError::NoCards);
        }
        if !tab_size.is_finite() || tab_size <= 0.0 {
            return Err(StackError::InvalidTabSize(tab_size));
        }
        if !overlap.is_finite() || overlap < 0.0 || overlap >= tab_size {
            return Err(StackError::InvalidOverlap { overlap, tab_size });
        }
        Ok(Self {
            tab_size,
            overlap,
            card_count,
        })
    }

    pub fn tab_size(&self) -> f64 {
        self.tab_size
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Same parameters, different card count (used when a deck reload
    /// changes the number of cards).
    pub fn with_card_count(self, card_count: usize) -> Result<Self, StackError> {
        Self::configure(self.tab_size, self.overlap, card_count)
    }

    /// Derive the layout constants for a container of `container_extent`.
    ///
    /// A container too small for the card count yields degenerate constants
    /// (see [`LayoutConstants::is_degenerate`]); this is logged, not refused.
    pub fn measure(&self, container_extent: f64) -> LayoutConstants {
        let n = self.card_count as f64;
        let net_step = self.tab_size - self.overlap;
        let constants = LayoutConstants {
            tab_size: self.tab_size,
            overlap: self.overlap,
            net_step,
            card_count: self.card_count,
            container_extent,
            transition_distance: container_extent - self.overlap - n * net_step,
            open_extent: container_extent - (n - 1.0) * net_step,
        };
        if constants.is_degenerate() {
            tracing::warn!(
                container_extent,
                cards = self.card_count,
                "container too small for the card stack; layout is undefined"
            );
        }
        constants
    }
}

// ───────────────────────────────────────── constants ─────────

/// Layout constants for one container size.  Immutable; rebuilt on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    pub tab_size: f64,
    pub overlap: f64,
    /// `tab_size - overlap`: the visible slice of each collapsed tab.
    pub net_step: f64,
    pub card_count: usize,
    /// Total stack extent.
    pub container_extent: f64,
    /// Scroll distance consumed while one card slides over another.
    pub transition_distance: f64,
    /// Extent of the fully open card.
    pub open_extent: f64,
}

impl LayoutConstants {
    /// Visible window for inner content once a card is fully open.
    pub fn content_window(&self) -> f64 {
        self.open_extent - self.tab_size
    }

    /// Resting position of card `i` when it sits below the active card.
    pub fn below_position(&self, i: usize) -> f64 {
        self.container_extent - self.overlap - (self.card_count - i) as f64 * self.net_step
    }

    pub fn last_index(&self) -> usize {
        self.card_count.saturating_sub(1)
    }

    pub fn is_degenerate(&self) -> bool {
        self.transition_distance < 0.0 || self.open_extent < self.tab_size
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_reference_stack() {
        let config = StackConfig::configure(56.0, 20.0, 3).unwrap();
        let c = config.measure(400.0);
        assert_eq!(c.net_step, 36.0);
        assert_eq!(c.open_extent, 328.0);
        assert_eq!(c.transition_distance, 272.0);
        assert_eq!(c.content_window(), 272.0);
        assert_eq!(c.below_position(2), 344.0);
        assert!(!c.is_degenerate());
    }

    #[test]
    fn single_card_opens_to_full_container() {
        let c = StackConfig::configure(3.0, 1.0, 1).unwrap().measure(30.0);
        assert_eq!(c.open_extent, 30.0);
        assert_eq!(c.last_index(), 0);
    }

    #[test]
    fn tiny_container_is_degenerate_but_measured() {
        let c = StackConfig::configure(56.0, 20.0, 10).unwrap().measure(100.0);
        assert!(c.is_degenerate());
        assert!(c.transition_distance < 0.0);
    }

    #[test]
    fn configure_rejects_bad_parameters() {
        assert_eq!(StackConfig::configure(3.0, 1.0, 0), Err(StackError::NoCards));
        assert_eq!(
            StackConfig::configure(0.0, 0.0, 2),
            Err(StackError::InvalidTabSize(0.0))
        );
        assert!(matches!(
            StackConfig::configure(3.0, 3.0, 2),
            Err(StackError::InvalidOverlap { .. })
        ));
        assert!(matches!(
            StackConfig::configure(3.0, -1.0, 2),
            Err(StackError::InvalidOverlap { .. })
        ));
    }

    #[test]
    fn with_card_count_keeps_tab_geometry() {
        let config = StackConfig::configure(3.0, 1.0, 4).unwrap();
        let grown = config.with_card_count(7).unwrap();
        assert_eq!(grown.card_count(), 7);
        assert_eq!(grown.tab_size(), 3.0);
        assert_eq!(grown.overlap(), 1.0);
    }
}
