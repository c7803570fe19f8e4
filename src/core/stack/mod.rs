//! Scroll-offset → stacked-card layout engine.
//!
//! ## Pipeline
//!
//! * [`geometry`] — layout constants from container extent and card count.
//! * [`extent`] — how far each card's content overflows its open window.
//! * [`segment`] — the ordered segment table tiling the scroll range.
//! * [`interpret`] — offset → every card's position, size, inner scroll and
//!   paint order.
//! * [`pinned`] — resting geometry for a given active card.
//! * [`locate`] — card index ↔ offset, for jumps and discrete steps.
//!
//! [`CardStack`] ties these together for one scroll session and owns the
//! only state carried across frames (inner content offsets).

pub mod extent;
pub mod geometry;
pub mod interpret;
pub mod locate;
pub mod pinned;
pub mod segment;

pub use extent::ContentExtentProvider;
pub use geometry::{LayoutConstants, StackConfig};
pub use interpret::{interpret, CardLayout, InnerOffsets, StackFrame};
pub use locate::{settled_active_index, step_target, target_offset_for, Step};
pub use segment::{build_segments, Segment, SegmentTable};

// ───────────────────────────────────────── resize policy ─────

/// What happens to the raw scroll offset when the segment table is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Keep the raw offset; the visually active card may jump.
    KeepOffset,
    /// Re-anchor on the settled card: move to its target offset in the new
    /// table.
    #[default]
    Reanchor,
}

impl ResizePolicy {
    pub fn label(self) -> &'static str {
        match self {
            ResizePolicy::KeepOffset => "keep offset",
            ResizePolicy::Reanchor => "re-anchor",
        }
    }

    pub fn config_key(self) -> &'static str {
        match self {
            ResizePolicy::KeepOffset => "keep",
            ResizePolicy::Reanchor => "reanchor",
        }
    }

    pub fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "keep" => Some(ResizePolicy::KeepOffset),
            "reanchor" => Some(ResizePolicy::Reanchor),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── session ───────────

/// Engine state for one scroll session: constants, segment table and the
/// carried inner offsets.  Rebuilt on resize or content change; the most
/// recent rebuild wins.
#[derive(Debug, Clone)]
pub struct CardStack {
    config: StackConfig,
    constants: LayoutConstants,
    table: SegmentTable,
    inner: InnerOffsets,
}

impl CardStack {
    /// Measure and build for an initial container extent.
    pub fn new(
        config: StackConfig,
        container_extent: f64,
        provider: &(impl ContentExtentProvider + ?Sized),
    ) -> Self {
        let constants = config.measure(container_extent);
        let table = build_segments(&constants, provider);
        Self {
            config,
            constants,
            table,
            inner: InnerOffsets::new(config.card_count()),
        }
    }

    /// Re-measure and rebuild the segment table.
    ///
    /// Returns the offset the scroll surface should adopt, according to
    /// `policy`, clamped to the new total length.  If `config` changed its
    /// card count, pass the new config via [`CardStack::reconfigure`] first.
    pub fn rebuild(
        &mut self,
        container_extent: f64,
        provider: &(impl ContentExtentProvider + ?Sized),
        offset: f64,
        policy: ResizePolicy,
    ) -> f64 {
        let settled = self.settled_active_index(offset);

        self.constants = self.config.measure(container_extent);
        self.table = build_segments(&self.constants, provider);
        self.inner.resize(self.config.card_count());

        let next = match policy {
            ResizePolicy::KeepOffset => offset,
            ResizePolicy::Reanchor => {
                let anchored = settled.min(self.constants.last_index());
                target_offset_for(&self.table, anchored)
            }
        };
        let next = self.clamp_offset(next);

        tracing::debug!(
            container_extent,
            total_length = self.table.total_length(),
            segments = self.table.segments().len(),
            from = offset,
            to = next,
            policy = policy.label(),
            "stack rebuilt"
        );
        next
    }

    /// Swap in a new config (e.g. a different card count after a reload).
    /// Carried inner offsets are reset; call [`CardStack::rebuild`] next.
    pub fn reconfigure(&mut self, config: StackConfig) {
        self.config = config;
        self.inner = InnerOffsets::new(config.card_count());
    }

    /// Interpret `offset` and keep the returned inner offsets for next time.
    pub fn frame(&mut self, offset: f64) -> StackFrame {
        let frame = interpret(offset, &self.table, &self.constants, &self.inner);
        self.inner = frame.inner.clone();
        frame
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    pub fn segments(&self) -> &SegmentTable {
        &self.table
    }

    pub fn total_length(&self) -> f64 {
        self.table.total_length()
    }

    pub fn card_count(&self) -> usize {
        self.config.card_count()
    }

    pub fn target_offset_for(&self, idx: usize) -> f64 {
        target_offset_for(&self.table, idx)
    }

    pub fn settled_active_index(&self, offset: f64) -> usize {
        settled_active_index(&self.table, offset)
    }

    pub fn step_target(&self, offset: f64, step: Step) -> f64 {
        step_target(&self.table, offset, self.card_count(), step)
    }

    /// Clamp to the scrollable range `[0, total_length]`.
    pub fn clamp_offset(&self, offset: f64) -> f64 {
        if offset > 0.0 {
            offset.min(self.total_length())
        } else {
            0.0
        }
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stack::interpret::Phase;

    fn stack(container: f64, extents: &[f64]) -> CardStack {
        let config = StackConfig::configure(56.0, 20.0, extents.len()).unwrap();
        CardStack::new(config, container, extents)
    }

    #[test]
    fn frame_carries_inner_offsets_between_calls() {
        let extents = [300.0, 0.0, 400.0];
        let mut s = stack(400.0, &extents);
        s.frame(20.0);
        let later = s.frame(s.target_offset_for(2) + 5.0);
        // Jumping straight into card 2's content leaves card 0 where it was.
        assert_eq!(later.inner.get(0), 20.0);
        assert_eq!(later.cards[2].inner_offset, 5.0);

        let back = s.frame(s.target_offset_for(1));
        assert_eq!(back.phase, Phase::Transition { from: 1, to: 2, delta: 0.0, progress: 0.0 });
        assert_eq!(back.inner.get(2), 0.0);
        assert_eq!(back.inner.get(0), 20.0);
    }

    #[test]
    fn keep_offset_policy_leaves_raw_offset() {
        let extents = [0.0, 0.0, 0.0];
        let mut s = stack(400.0, &extents);
        let next = s.rebuild(300.0, &extents[..], 272.0, ResizePolicy::KeepOffset);
        assert_eq!(next, 272.0);
        // Transition distance shrank to 172, so 272 is now inside 1 → 2.
        assert_eq!(s.settled_active_index(next), 1);
        assert!(matches!(s.frame(next).phase, Phase::Transition { from: 1, to: 2, .. }));
    }

    #[test]
    fn reanchor_policy_keeps_settled_card_open() {
        let extents = [0.0, 0.0, 0.0];
        let mut s = stack(400.0, &extents);
        let next = s.rebuild(300.0, &extents[..], 300.0, ResizePolicy::Reanchor);
        assert_eq!(next, 172.0);
        assert_eq!(s.frame(next).active_index(), 1);
        assert_eq!(s.settled_active_index(next), 1);
    }

    #[test]
    fn rebuild_clamps_to_new_total_length() {
        let extents = [0.0, 0.0, 0.0];
        let mut s = stack(400.0, &extents);
        let next = s.rebuild(300.0, &extents[..], 10_000.0, ResizePolicy::KeepOffset);
        assert_eq!(next, s.total_length());
        assert_eq!(s.clamp_offset(-3.0), 0.0);
    }

    #[test]
    fn reconfigure_changes_card_count() {
        let mut s = stack(400.0, &[0.0, 0.0, 0.0]);
        let grown = [0.0, 0.0];
        s.reconfigure(s.config().with_card_count(2).unwrap());
        let next = s.rebuild(400.0, &grown[..], 544.0, ResizePolicy::Reanchor);
        assert_eq!(s.card_count(), 2);
        assert_eq!(s.frame(next).cards.len(), 2);
        assert_eq!(next, s.target_offset_for(1));
    }

    #[test]
    fn step_target_walks_settled_cards() {
        let s = stack(400.0, &[0.0, 0.0, 0.0]);
        assert_eq!(s.step_target(0.0, Step::Next), 272.0);
        assert_eq!(s.step_target(300.0, Step::Next), 544.0);
        assert_eq!(s.step_target(300.0, Step::Prev), 0.0);
    }

    #[test]
    fn resize_policy_config_keys_round_trip() {
        for p in [ResizePolicy::Reanchor, ResizePolicy::KeepOffset] {
            assert_eq!(ResizePolicy::from_config_key(p.config_key()), Some(p));
        }
        assert_eq!(ResizePolicy::from_config_key("bogus"), None);
    }
}
