//! Pinned positions — where each card rests for a given active card.

use super::geometry::LayoutConstants;

/// Position (distance from the stack's top edge) and extent of one card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardRect {
    pub position: f64,
    pub size: f64,
}

impl CardRect {
    pub fn new(position: f64, size: f64) -> Self {
        Self { position, size }
    }

    pub fn end(&self) -> f64 {
        self.position + self.size
    }
}

/// Resting geometry of card `i` when `active` is the open card.
///
/// Cards before `active` stack at the top edge, cards after it stack at the
/// bottom edge, both showing only their tabs.  Transitions interpolate
/// between two of these states.
pub fn pinned_position(constants: &LayoutConstants, i: usize, active: usize) -> CardRect {
    if i < active {
        CardRect::new(i as f64 * constants.net_step, constants.tab_size)
    } else if i == active {
        CardRect::new(active as f64 * constants.net_step, constants.open_extent)
    } else {
        CardRect::new(constants.below_position(i), constants.tab_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stack::geometry::StackConfig;

    #[test]
    fn reference_pins_around_middle_card() {
        let c = StackConfig::configure(56.0, 20.0, 3).unwrap().measure(400.0);
        assert_eq!(pinned_position(&c, 0, 1), CardRect::new(0.0, 56.0));
        assert_eq!(pinned_position(&c, 1, 1), CardRect::new(36.0, 328.0));
        assert_eq!(pinned_position(&c, 2, 1), CardRect::new(344.0, 56.0));
    }

    #[test]
    fn open_card_ends_where_next_tab_begins_minus_overlap() {
        let c = StackConfig::configure(3.0, 1.0, 5).unwrap().measure(40.0);
        for active in 0..4 {
            let open = pinned_position(&c, active, active);
            let next = pinned_position(&c, active + 1, active);
            assert_eq!(open.end() - c.overlap, next.position);
        }
    }

    #[test]
    fn last_tab_touches_container_edge() {
        let c = StackConfig::configure(3.0, 1.0, 4).unwrap().measure(30.0);
        let last = pinned_position(&c, 3, 0);
        assert_eq!(last.position, 30.0 - 1.0 - 2.0);
    }
}
