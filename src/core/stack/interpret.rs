//! Layout interpreter — offset in, full stack geometry out.
//!
//! [`interpret`] is a pure function of the offset, the segment table, the
//! layout constants, and the carried inner-scroll offsets.  The owning
//! segment selects one of three phases:
//!
//! * **Terminal** — past the last segment: last card open, its content
//!   scrolled to the end.
//! * **Content** — one card open and pinned, its content following the
//!   offset 1:1.
//! * **Transition** — the `from` card collapses while the `to` card slides
//!   up and grows, both linearly in the offset.
//!
//! Inner offsets of cards not touched by the current phase are carried
//! forward unchanged; that [`InnerOffsets`] map is the only state that
//! survives between calls, and it is passed in and returned explicitly.

use super::geometry::LayoutConstants;
use super::pinned::{pinned_position, CardRect};
use super::segment::{Segment, SegmentTable};

// ───────────────────────────────────────── inner offsets ─────

/// Per-card inner content scroll offsets carried between frames.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InnerOffsets(Vec<f64>);

impl InnerOffsets {
    pub fn new(card_count: usize) -> Self {
        Self(vec![0.0; card_count])
    }

    pub fn get(&self, card: usize) -> f64 {
        self.0.get(card).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, card: usize, value: f64) {
        if let Some(slot) = self.0.get_mut(card) {
            *slot = value;
        }
    }

    /// Grow or shrink to `card_count`, keeping surviving values.
    pub fn resize(&mut self, card_count: usize) {
        self.0.resize(card_count, 0.0);
    }
}

// ───────────────────────────────────────── frame ─────────────

/// Which segment kind owns the current offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Offset at or beyond the total length; `card` is the last card.
    Terminal { card: usize },
    Content { card: usize },
    Transition {
        from: usize,
        to: usize,
        /// Offset into the transition segment.
        delta: f64,
        /// `delta / transition_distance`, in `[0, 1]`.
        progress: f64,
    },
}

impl Phase {
    /// The card that is visually open.  Mid-transition, focus passes to
    /// `to` once it has covered half the distance.
    pub fn active_index(&self) -> usize {
        match *self {
            Phase::Terminal { card } | Phase::Content { card } => card,
            Phase::Transition {
                from, to, progress, ..
            } => {
                if progress >= 0.5 {
                    to
                } else {
                    from
                }
            }
        }
    }
}

/// What the renderer should do with a card's inner scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InnerScroll {
    /// Scroll content to exactly this offset.
    Set(f64),
    /// Scroll content back to the top.
    Reset,
    /// Scroll content fully to the end.
    ToEnd,
}

/// Geometry and paint order of one card in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardLayout {
    pub index: usize,
    pub rect: CardRect,
    /// Paint order; higher paints above lower.  Always `index + 1`.
    pub z_order: usize,
    /// Effective inner scroll offset after this frame.
    pub inner_offset: f64,
    /// Set for the cards whose inner scroll this frame drives.
    pub instruction: Option<InnerScroll>,
}

/// Complete visual state of the stack for one offset.
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    /// The (clamped) offset this frame was computed for.
    pub offset: f64,
    pub phase: Phase,
    pub cards: Vec<CardLayout>,
    /// Carried inner offsets to feed into the next call.
    pub inner: InnerOffsets,
}

impl StackFrame {
    pub fn active_index(&self) -> usize {
        self.phase.active_index()
    }

    /// Cards in paint order (lowest `z_order` first).
    pub fn paint_order(&self) -> impl Iterator<Item = &CardLayout> {
        let mut order: Vec<&CardLayout> = self.cards.iter().collect();
        order.sort_by_key(|c| c.z_order);
        order.into_iter()
    }
}

// ───────────────────────────────────────── interpreter ───────

/// Compute the stack layout for `offset`.
///
/// Negative (and NaN) offsets are treated as 0.  Offsets at or beyond
/// `table.total_length()` produce the terminal phase.
pub fn interpret(
    offset: f64,
    table: &SegmentTable,
    constants: &LayoutConstants,
    carried: &InnerOffsets,
) -> StackFrame {
    let offset = if offset > 0.0 { offset } else { 0.0 };
    let n = constants.card_count;

    let mut inner = carried.clone();
    inner.resize(n);
    let mut instructions: Vec<Option<InnerScroll>> = vec![None; n];
    let mut rects: Vec<CardRect> = Vec::with_capacity(n);

    let phase = match table.locate(offset) {
        None => {
            let last = constants.last_index();
            inner.set(last, table.content_len(last));
            mark(&mut instructions, last, InnerScroll::ToEnd);
            rects.extend((0..n).map(|i| pinned_position(constants, i, last)));
            Phase::Terminal { card: last }
        }
        Some(&Segment::Content { card, start, end }) => {
            let scrolled = (offset - start).clamp(0.0, end - start);
            inner.set(card, scrolled);
            mark(&mut instructions, card, InnerScroll::Set(scrolled));
            rects.extend((0..n).map(|i| pinned_position(constants, i, card)));
            Phase::Content { card }
        }
        Some(&Segment::Transition {
            from, to, start, ..
        }) => {
            let delta = offset - start;
            for i in 0..n {
                let rect = if i == from {
                    CardRect::new(
                        from as f64 * constants.net_step,
                        (constants.open_extent - delta).max(constants.tab_size),
                    )
                } else if i == to {
                    CardRect::new(
                        constants.below_position(to) - delta,
                        (constants.tab_size + delta).min(constants.open_extent),
                    )
                } else {
                    // Cards past `to` stay pinned relative to `from` until the
                    // transition completes.
                    pinned_position(constants, i, from)
                };
                rects.push(rect);
            }
            inner.set(from, 0.0);
            inner.set(to, 0.0);
            mark(&mut instructions, from, InnerScroll::Reset);
            mark(&mut instructions, to, InnerScroll::Reset);

            let progress = if constants.transition_distance > 0.0 {
                (delta / constants.transition_distance).clamp(0.0, 1.0)
            } else {
                1.0
            };
            Phase::Transition {
                from,
                to,
                delta,
                progress,
            }
        }
    };

    let cards = rects
        .into_iter()
        .zip(instructions)
        .enumerate()
        .map(|(index, (rect, instruction))| CardLayout {
            index,
            rect,
            z_order: index + 1,
            inner_offset: inner.get(index),
            instruction,
        })
        .collect();

    StackFrame {
        offset,
        phase,
        cards,
        inner,
    }
}

fn mark(instructions: &mut [Option<InnerScroll>], card: usize, scroll: InnerScroll) {
    if let Some(slot) = instructions.get_mut(card) {
        *slot = Some(scroll);
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stack::geometry::StackConfig;
    use crate::core::stack::segment::build_segments;
    use proptest::prelude::*;

    fn reference(extents: Vec<f64>) -> (LayoutConstants, SegmentTable) {
        let c = StackConfig::configure(56.0, 20.0, extents.len())
            .unwrap()
            .measure(400.0);
        let table = build_segments(&c, &extents);
        (c, table)
    }

    fn run(offset: f64, c: &LayoutConstants, table: &SegmentTable) -> StackFrame {
        interpret(offset, table, c, &InnerOffsets::new(c.card_count))
    }

    #[test]
    fn midpoint_of_first_transition() {
        let (c, table) = reference(vec![0.0, 0.0, 0.0]);
        let frame = run(136.0, &c, &table);
        assert_eq!(
            frame.phase,
            Phase::Transition { from: 0, to: 1, delta: 136.0, progress: 0.5 }
        );
        assert_eq!(frame.cards[0].rect, CardRect::new(0.0, 192.0));
        assert_eq!(frame.cards[1].rect, CardRect::new(172.0, 192.0));
        // Card 2 rests below, relative to `from`.
        assert_eq!(frame.cards[2].rect, CardRect::new(344.0, 56.0));
    }

    #[test]
    fn transition_boundaries_are_continuous() {
        let (c, table) = reference(vec![0.0, 0.0, 0.0]);

        let at_start = run(272.0, &c, &table);
        assert_eq!(at_start.cards[1].rect.size, c.open_extent);
        assert_eq!(at_start.cards[2].rect.size, c.tab_size);
        assert_eq!(at_start.cards[1].rect, pinned_position(&c, 1, 1));
        assert_eq!(at_start.cards[2].rect, pinned_position(&c, 2, 1));

        let just_before_end = run(543.999, &c, &table);
        assert!((just_before_end.cards[1].rect.size - c.tab_size).abs() < 0.01);
        assert!((just_before_end.cards[2].rect.size - c.open_extent).abs() < 0.01);

        let terminal = run(544.0, &c, &table);
        assert_eq!(terminal.phase, Phase::Terminal { card: 2 });
        assert_eq!(terminal.cards[1].rect, CardRect::new(36.0, 56.0));
        assert_eq!(terminal.cards[2].rect, CardRect::new(72.0, 328.0));
    }

    #[test]
    fn far_cards_pin_relative_to_from_during_transition() {
        let c = StackConfig::configure(3.0, 1.0, 5).unwrap().measure(40.0);
        let table = build_segments(&c, &vec![0.0; 5]);
        // Transition 1 → 2 is the second segment.
        let seg = table.segments()[1];
        let frame = run(seg.start() + seg.len() * 0.75, &c, &table);
        assert!(matches!(frame.phase, Phase::Transition { from: 1, to: 2, .. }));
        for i in 3..5 {
            assert_eq!(frame.cards[i].rect, pinned_position(&c, i, 1));
        }
        assert_eq!(frame.cards[0].rect, pinned_position(&c, 0, 1));
    }

    #[test]
    fn content_phase_scrolls_open_card_one_to_one() {
        let (c, table) = reference(vec![300.0, 0.0, 0.0]);
        let frame = run(10.5, &c, &table);
        assert_eq!(frame.phase, Phase::Content { card: 0 });
        assert_eq!(frame.active_index(), 0);
        assert_eq!(frame.cards[0].inner_offset, 10.5);
        assert_eq!(frame.cards[0].instruction, Some(InnerScroll::Set(10.5)));
        assert_eq!(frame.cards[0].rect, pinned_position(&c, 0, 0));
    }

    #[test]
    fn content_phase_leaves_other_inner_offsets_untouched() {
        let (c, table) = reference(vec![300.0, 0.0, 400.0]);
        let mut carried = InnerOffsets::new(3);
        carried.set(2, 7.0);
        let frame = interpret(5.0, &table, &c, &carried);
        assert_eq!(frame.inner.get(2), 7.0);
        assert_eq!(frame.cards[2].instruction, None);
    }

    #[test]
    fn transition_resets_both_moving_cards() {
        let (c, table) = reference(vec![300.0, 400.0, 0.0]);
        let mut carried = InnerOffsets::new(3);
        carried.set(0, 28.0);
        carried.set(1, 12.0);
        let frame = interpret(100.0, &table, &c, &carried);
        assert_eq!(frame.inner.get(0), 0.0);
        assert_eq!(frame.inner.get(1), 0.0);
        assert_eq!(frame.cards[0].instruction, Some(InnerScroll::Reset));
        assert_eq!(frame.cards[1].instruction, Some(InnerScroll::Reset));
    }

    #[test]
    fn terminal_scrolls_last_card_to_end() {
        let (c, table) = reference(vec![0.0, 0.0, 372.0]);
        let frame = run(table.total_length() + 50.0, &c, &table);
        assert_eq!(frame.phase, Phase::Terminal { card: 2 });
        assert_eq!(frame.cards[2].inner_offset, 100.0);
        assert_eq!(frame.cards[2].instruction, Some(InnerScroll::ToEnd));
    }

    #[test]
    fn negative_and_nan_offsets_clamp_to_zero() {
        let (c, table) = reference(vec![0.0, 0.0, 0.0]);
        assert_eq!(run(-40.0, &c, &table), run(0.0, &c, &table));
        assert_eq!(run(f64::NAN, &c, &table).offset, 0.0);
    }

    #[test]
    fn paint_order_is_index_plus_one() {
        let (c, table) = reference(vec![0.0, 500.0, 0.0]);
        for offset in [0.0, 136.0, 300.0, 600.0, 10_000.0] {
            let frame = run(offset, &c, &table);
            for card in &frame.cards {
                assert_eq!(card.z_order, card.index + 1);
            }
            let order: Vec<usize> = frame.paint_order().map(|c| c.index).collect();
            assert_eq!(order, vec![0, 1, 2]);
        }
    }

    #[test]
    fn single_card_stack_is_always_terminal() {
        let c = StackConfig::configure(3.0, 1.0, 1).unwrap().measure(20.0);
        let table = build_segments(&c, &vec![4.0]);
        let frame = run(0.0, &c, &table);
        assert_eq!(frame.phase, Phase::Terminal { card: 0 });
        assert_eq!(frame.cards[0].rect, CardRect::new(0.0, 20.0));
    }

    #[test]
    fn focus_passes_to_incoming_card_at_half_way() {
        let (c, table) = reference(vec![0.0, 0.0, 0.0]);
        assert_eq!(run(135.0, &c, &table).active_index(), 0);
        assert_eq!(run(136.0, &c, &table).active_index(), 1);
    }

    proptest! {
        #[test]
        fn repeated_calls_are_idempotent(offset in 0.0f64..2000.0) {
            let (c, table) = reference(vec![300.0, 120.0, 500.0]);
            let carried = InnerOffsets::new(3);
            let a = interpret(offset, &table, &c, &carried);
            let b = interpret(offset, &table, &c, &a.inner);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn content_offset_stays_within_scrollable_range(offset in 0.0f64..2000.0) {
            let (c, table) = reference(vec![300.0, 120.0, 500.0]);
            let frame = run(offset, &c, &table);
            if let Phase::Content { card } = frame.phase {
                let seg = table.locate(offset).copied().unwrap();
                prop_assert_eq!(frame.active_index(), card);
                prop_assert_eq!(frame.cards[card].inner_offset, offset - seg.start());
                prop_assert!(frame.cards[card].inner_offset <= table.content_len(card));
            }
        }

        #[test]
        fn sizes_stay_between_tab_and_open(offset in 0.0f64..2000.0) {
            let (c, table) = reference(vec![300.0, 120.0, 500.0]);
            for card in run(offset, &c, &table).cards {
                prop_assert!(card.rect.size >= c.tab_size);
                prop_assert!(card.rect.size <= c.open_extent);
            }
        }
    }
}
