//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

/// Tab accent colours, cycled by card index.
const ACCENTS: &[Color] = &[
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightBlue,
    Color::LightRed,
];

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    pub fn accent(index: usize) -> Color {
        ACCENTS[index % ACCENTS.len()]
    }

    pub fn tab_title_style(index: usize, active: bool) -> Style {
        let style = Style::default().fg(Self::accent(index));
        if active {
            style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            style.add_modifier(Modifier::BOLD)
        }
    }

    pub fn card_border_style(index: usize, active: bool) -> Style {
        if active {
            Style::default().fg(Self::accent(index))
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    pub fn subtitle_style() -> Style {
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn body_style() -> Style {
        Style::default().fg(Color::White)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn scrollbar_thumb() -> Color {
        Color::LightBlue
    }

    pub fn scrollbar_track() -> Color {
        Color::DarkGray
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
