//! Index locator — card index ↔ scroll offset.

use super::segment::{Segment, SegmentTable};

/// Direction of a discrete card step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
}

/// Offset at which the transition into card `idx` has just completed (its
/// content, if any, starts here).  Card 0 — or any index without an
/// incoming transition — maps to 0.
pub fn target_offset_for(table: &SegmentTable, idx: usize) -> f64 {
    table
        .segments()
        .iter()
        .find_map(|s| match *s {
            Segment::Transition { to, end, .. } if to == idx => Some(end),
            _ => None,
        })
        .unwrap_or(0.0)
}

/// Last card whose incoming transition is complete at `offset`.
///
/// Partially completed transitions are ignored so discrete navigation
/// always steps from a fully settled card.
pub fn settled_active_index(table: &SegmentTable, offset: f64) -> usize {
    table.segments().iter().fold(0, |active, s| match *s {
        Segment::Transition { to, end, .. } if offset >= end => to,
        _ => active,
    })
}

/// Target offset for one discrete step from the settled card at `offset`.
pub fn step_target(table: &SegmentTable, offset: f64, card_count: usize, step: Step) -> f64 {
    let settled = settled_active_index(table, offset);
    let target = match step {
        Step::Next => (settled + 1).min(card_count.saturating_sub(1)),
        Step::Prev => settled.saturating_sub(1),
    };
    target_offset_for(table, target)
}
