//! Card stack widget — paints a [`StackFrame`] into the terminal.
//!
//! ## Architecture
//!
//! * **Row mapping** (`RowSpan`, `card_span`) — engine units are terminal
//!   rows; positions and extents are rounded to whole rows, ends rounded
//!   independently so adjacent cards never leave a gap.
//! * **Hit-testing** (`hit_test_tab`) — shared between the widget and the
//!   mouse handler.
//! * **Widget** (`StackWidget`) — paints cards in paint order, then the
//!   scrollbar.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::core::deck::Deck;
use crate::core::stack::{CardLayout, StackFrame};
use crate::ui::theme::Theme;

// ─── row mapping ────────────────────────────────────────────────

/// Rows a card covers on screen, before clipping (absolute `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub top: i32,
    pub bottom: i32,
}

pub fn card_span(card: &CardLayout, area: Rect) -> RowSpan {
    let base = i32::from(area.y);
    RowSpan {
        top: base + card.rect.position.round() as i32,
        bottom: base + card.rect.end().round() as i32,
    }
}

fn tab_rows(tab_size: f64) -> i32 {
    tab_size.round().max(1.0) as i32
}

fn clip(span: RowSpan, area: Rect) -> Option<(u16, u16)> {
    let top = span.top.max(i32::from(area.y));
    let bottom = span.bottom.min(i32::from(area.bottom()));
    (bottom > top).then(|| (top as u16, (bottom - top) as u16))
}

/// The card whose tab is drawn at (`column`, `row`), if any.
///
/// Cards are tested from the top of the paint order down, so a tab covered
/// by a later card never receives the click.
pub fn hit_test_tab(
    frame: &StackFrame,
    area: Rect,
    tab_size: f64,
    column: u16,
    row: u16,
) -> Option<usize> {
    if !area.contains(Position::new(column, row)) {
        return None;
    }
    let row = i32::from(row);
    let mut cards: Vec<&CardLayout> = frame.paint_order().collect();
    cards.reverse();

    let owner = cards.into_iter().find(|c| {
        let span = card_span(c, area);
        row >= span.top && row < span.bottom
    })?;
    let span = card_span(owner, area);
    (row < span.top + tab_rows(tab_size)).then_some(owner.index)
}

// ─── widget ─────────────────────────────────────────────────────

pub struct StackWidget<'a> {
    pub deck: &'a Deck,
    pub frame: &'a StackFrame,
    /// Tab extent from the stack config.
    pub tab_size: f64,
    pub total_length: f64,
}

impl<'a> Widget for StackWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height == 0 {
            return;
        }
        let cards_area = Rect::new(area.x, area.y, area.width - 1, area.height);
        let active = self.frame.active_index();

        for layout in self.frame.paint_order() {
            let Some(card) = self.deck.cards.get(layout.index) else {
                continue;
            };
            let span = card_span(layout, cards_area);
            let Some((y, h)) = clip(span, cards_area) else {
                continue;
            };
            let is_active = layout.index == active;
            let vis = Rect::new(cards_area.x, y, cards_area.width, h);
            Clear.render(vis, buf);

            let top_clipped = span.top < i32::from(y);
            let borders = if top_clipped {
                Borders::LEFT | Borders::RIGHT
            } else {
                Borders::TOP | Borders::LEFT | Borders::RIGHT
            };
            let mut block = Block::default()
                .borders(borders)
                .border_style(Theme::card_border_style(layout.index, is_active));
            if !top_clipped {
                block = block.title(Span::styled(
                    format!(" {} ", card.title),
                    Theme::tab_title_style(layout.index, is_active),
                ));
            }
            let inner = block.inner(vis);
            block.render(vis, buf);
            if inner.width == 0 {
                continue;
            }

            // Subtitle on the first row under the title border.
            let subtitle_y = span.top + 1;
            if !top_clipped && subtitle_y < i32::from(vis.bottom()) {
                Paragraph::new(Line::from(Span::styled(
                    card.subtitle.clone(),
                    Theme::subtitle_style(),
                )))
                .render(Rect::new(inner.x, subtitle_y as u16, inner.width, 1), buf);
            }

            // Body below the tab, scrolled by the card's inner offset.
            let body_top = span.top + tab_rows(self.tab_size);
            let body_span = RowSpan {
                top: body_top,
                bottom: span.bottom,
            };
            let Some((body_y, body_h)) = clip(body_span, vis) else {
                continue;
            };
            let skipped = (i32::from(body_y) - body_top).max(0);
            let scroll = layout.inner_offset.max(0.0).round() as i32 + skipped;
            let lines: Vec<Line> = card
                .body
                .iter()
                .map(|l| Line::from(Span::styled(l.as_str(), Theme::body_style())))
                .collect();
            Paragraph::new(lines)
                .scroll((scroll.min(i32::from(u16::MAX)) as u16, 0))
                .render(Rect::new(inner.x, body_y, inner.width, body_h), buf);
        }

        render_scrollbar(
            Rect::new(area.right() - 1, area.y, 1, area.height),
            self.frame.offset,
            self.total_length,
            f64::from(area.height),
            buf,
        );
    }
}

// ─── scrollbar ──────────────────────────────────────────────────

fn render_scrollbar(area: Rect, offset: f64, total: f64, viewport: f64, buf: &mut Buffer) {
    if total <= 0.0 || area.height < 2 {
        return;
    }
    let h = f64::from(area.height);
    let thumb_sz = ((viewport / (total + viewport)) * h).ceil().clamp(1.0, h) as u16;
    let progress = (offset / total).clamp(0.0, 1.0);
    let thumb_pos = (progress * (h - f64::from(thumb_sz))).round() as u16;

    for row in 0..area.height {
        let is_thumb = row >= thumb_pos && row < thumb_pos + thumb_sz;
        let (ch, fg) = if is_thumb {
            ('█', Theme::scrollbar_thumb())
        } else {
            ('│', Theme::scrollbar_track())
        };
        if let Some(cell) = buf.cell_mut(Position::new(area.x, area.y + row)) {
            cell.set_char(ch).set_fg(fg);
        }
    }
}

// ─── tests ──────────────────────────────────────────────────────
