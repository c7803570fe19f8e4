//! Range builder — partitions the scroll coordinate into segments.
//!
//! Walking the cards in order, each card contributes a transition segment
//! (sliding it over its predecessor; none for card 0) followed by a content
//! segment if its body overflows the open window.  The segments tile
//! `[0, total_length)` with no gaps and no overlaps, so any offset maps to
//! exactly one segment (or past the end, to the terminal state).

use super::extent::{content_scrollable, ContentExtentProvider};
use super::geometry::LayoutConstants;

// ───────────────────────────────────────── segment ───────────

/// One interval of the scroll coordinate and the layout behaviour it drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Card `to` slides over card `from` (`to == from + 1`).
    Transition {
        from: usize,
        to: usize,
        start: f64,
        end: f64,
    },
    /// Card `card` is open and its inner content scrolls.
    Content { card: usize, start: f64, end: f64 },
}

impl Segment {
    pub fn start(&self) -> f64 {
        match *self {
            Segment::Transition { start, .. } | Segment::Content { start, .. } => start,
        }
    }

    pub fn end(&self) -> f64 {
        match *self {
            Segment::Transition { end, .. } | Segment::Content { end, .. } => end,
        }
    }

    pub fn len(&self) -> f64 {
        self.end() - self.start()
    }
}

// ───────────────────────────────────────── table ─────────────

/// Ordered, contiguous segment sequence plus the total scroll length the
/// scroll surface must expose.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentTable {
    segments: Vec<Segment>,
    total_length: f64,
}

impl SegmentTable {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// The segment owning `offset`: the first one with `offset < end`.
    ///
    /// Segments are sorted and contiguous, so this is a binary search,
    /// O(log n).  `None` means `offset` is at or past the total length.
    pub fn locate(&self, offset: f64) -> Option<&Segment> {
        let idx = self.segments.partition_point(|s| s.end() <= offset);
        self.segments.get(idx)
    }

    /// Length of card `card`'s content segment (0 if it has none).
    pub fn content_len(&self, card: usize) -> f64 {
        self.segments
            .iter()
            .find(|s| matches!(s, Segment::Content { card: c, .. } if *c == card))
            .map_or(0.0, Segment::len)
    }
}

/// Build the segment table.  Pure: identical inputs give an identical table.
///
/// The table always has `constants.card_count` cards; a provider that knows
/// fewer reports the rest as empty.
pub fn build_segments(
    constants: &LayoutConstants,
    provider: &(impl ContentExtentProvider + ?Sized),
) -> SegmentTable {
    if provider.card_count() != constants.card_count {
        tracing::warn!(
            provider = provider.card_count(),
            stack = constants.card_count,
            "extent provider and stack disagree on card count"
        );
    }
    let mut segments = Vec::with_capacity(constants.card_count * 2);
    let mut pos = 0.0;

    for i in 0..constants.card_count {
        if i > 0 {
            let end = pos + constants.transition_distance;
            segments.push(Segment::Transition {
                from: i - 1,
                to: i,
                start: pos,
                end,
            });
            pos = end;
        }

        let cs = content_scrollable(constants, provider.intrinsic_extent(i));
        if cs > 0.0 {
            let end = pos + cs;
            segments.push(Segment::Content {
                card: i,
                start: pos,
                end,
            });
            pos = end;
        }
    }

    SegmentTable {
        segments,
        total_length: pos,
    }
}

// ───────────────────────────────────────── tests ─────────────
