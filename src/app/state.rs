//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).
//! The scroll surface (raw offset + animation) lives here too; the engine in
//! `core::stack` only ever sees the offset it is handed.

use anyhow::{bail, Context, Result};
use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::deck::Deck;
use crate::core::stack::{CardStack, StackConfig, StackFrame, Step};
use crate::ui::smooth_scroll::SmoothScroll;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Stack,
    ControlsMenu,
}

/// Top-level application state.
pub struct AppState {
    /// Cards currently shown.
    pub deck: Deck,
    /// Layout engine session (constants, segments, carried inner offsets).
    pub stack: CardStack,
    /// Scroll surface: target offset and its animated display offset.
    pub scroll: SmoothScroll,
    /// Frame interpreted for the displayed offset; reused for hit-testing.
    pub frame: StackFrame,
    /// User configuration (bindings + stack settings).
    pub config: AppConfig,
    /// Area the stack was last laid out in.
    pub stack_area: Rect,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Currently highlighted item in the controls menu.
    pub controls_selected: usize,
    /// When `true`, the controls menu is waiting for the user to press a key
    /// to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
    /// Flag set by event handlers to trigger a background deck reload.
    pub needs_reload: bool,
    /// Monotonic generation id used to ignore stale reload results.
    pub reload_generation: u64,
    /// `true` while a reload is in flight.
    pub loading: bool,
    /// Frame counter (drives the loading spinner).
    pub tick: u64,
}

impl AppState {
    pub fn new(deck: Deck, config: AppConfig, stack_area: Rect) -> Result<Self> {
        let stack_config = StackConfig::configure(
            f64::from(config.tab_size),
            f64::from(config.overlap),
            deck.len(),
        )
        .context("invalid stack configuration")?;
        let mut stack = CardStack::new(
            stack_config,
            f64::from(stack_area.height),
            &deck.extents(stack_config.overlap()),
        );
        let frame = stack.frame(0.0);
        let scroll = SmoothScroll::new(config.smooth_speed);

        Ok(Self {
            deck,
            stack,
            scroll,
            frame,
            config,
            stack_area,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            controls_selected: 0,
            awaiting_rebind: false,
            needs_reload: false,
            reload_generation: 0,
            loading: false,
            tick: 0,
        })
    }

    // ── scroll surface ──────────────────────────────────────────

    /// Animate toward `target`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, target: f64) {
        let target = self.stack.clamp_offset(target);
        self.scroll.set_target(target);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll.target() + delta);
    }

    /// Scroll so that card `idx` has just finished opening.
    pub fn jump_to_card(&mut self, idx: usize) {
        if idx >= self.stack.card_count() {
            return;
        }
        self.scroll_to(self.stack.target_offset_for(idx));
    }

    /// Step to the next / previous settled card.
    pub fn step_card(&mut self, step: Step) {
        let target = self.stack.step_target(self.scroll.target(), step);
        self.scroll_to(target);
    }

    /// Rows scrolled by a page: the open card's content window.
    pub fn page_size(&self) -> f64 {
        self.stack.constants().content_window().max(1.0)
    }

    // ── rebuilds ────────────────────────────────────────────────

    /// Re-layout for a new stack area.  No-op if the height is unchanged.
    pub fn resize(&mut self, stack_area: Rect) {
        let height_changed = stack_area.height != self.stack_area.height;
        self.stack_area = stack_area;
        if height_changed {
            self.rebuild();
        }
    }

    /// Swap in a freshly loaded deck and rebuild.
    pub fn replace_deck(&mut self, deck: Deck) -> Result<()> {
        if deck.is_empty() {
            bail!("deck has no cards");
        }
        if deck.len() != self.stack.card_count() {
            let config = self.stack.config().with_card_count(deck.len())?;
            self.stack.reconfigure(config);
        }
        self.deck = deck;
        self.rebuild();
        Ok(())
    }

    fn rebuild(&mut self) {
        let extents = self.deck.extents(self.stack.config().overlap());
        let offset = self.stack.rebuild(
            f64::from(self.stack_area.height),
            &extents,
            self.scroll.target(),
            self.config.resize_policy,
        );
        self.scroll.jump_to(offset);
        self.refresh_frame();
    }

    // ── per-frame ───────────────────────────────────────────────

    /// Rows of each card's tab, as the engine lays them out.
    pub fn tab_rows(&self) -> f64 {
        self.stack.config().tab_size()
    }

    /// Whether the event loop should keep sending frame ticks: the scroll
    /// is still easing or the reload spinner is showing.
    pub fn wants_frames(&self) -> bool {
        self.scroll.is_animating() || self.loading
    }

    /// Advance the scroll animation and re-interpret the displayed offset.
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.scroll.tick();
        self.refresh_frame();
    }

    pub fn refresh_frame(&mut self) {
        self.frame = self.stack.frame(self.scroll.offset());
    }
}
