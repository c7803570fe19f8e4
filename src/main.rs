//! A stacked-cards reader for the terminal.
//!
//! Run with a directory to open every file in it as a card, or with
//! `--demo N` for a sample deck.  `--dump-segments` prints the scroll
//! layout for a given height without entering the TUI.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::Paragraph, Terminal};

use crate::app::{
    deck_runtime::{spawn_deck_reload, DeckReload},
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::deck::{self as deck_io, Deck};
use crate::core::stack::{CardStack, Segment, StackConfig};
use crate::ui::{
    layout::AppLayout, popup::ControlsPopup, spinner::LoadIndicator, stack_widget::StackWidget,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Stacked-cards reader")]
struct Cli {
    /// Directory whose files become cards.
    path: Option<PathBuf>,

    /// Use a built-in sample deck of N cards instead of a directory.
    #[arg(long, value_name = "N", conflicts_with = "path")]
    demo: Option<usize>,

    /// Rows of each card's tab (overrides the config file).
    #[arg(long)]
    tab_size: Option<u16>,

    /// Rows of each tab hidden under the next card (overrides the config file).
    #[arg(long)]
    overlap: Option<u16>,

    /// Print the segment table and exit.
    #[arg(long)]
    dump_segments: bool,

    /// Container height used by `--dump-segments`.
    #[arg(long, default_value_t = 40)]
    height: u16,

    /// With `--dump-segments`, also print the frame at this offset.
    #[arg(long)]
    offset: Option<f64>,
}

const DEFAULT_DEMO_CARDS: usize = 6;

/// Frame pacing for scroll easing (~30 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

fn load_initial_deck(cli: &Cli) -> Result<Deck> {
    match (&cli.path, cli.demo) {
        (Some(dir), _) => deck_io::load_deck(dir),
        (None, n) => Ok(Deck::demo(n.unwrap_or(DEFAULT_DEMO_CARDS))),
    }
}

// ───────────────────────────────────────── dump mode ────────

fn dump_segments(
    deck: &Deck,
    settings: &config::AppConfig,
    height: u16,
    offset: Option<f64>,
) -> Result<()> {
    let stack_config = StackConfig::configure(
        f64::from(settings.tab_size),
        f64::from(settings.overlap),
        deck.len(),
    )?;
    let mut stack = CardStack::new(
        stack_config,
        f64::from(height),
        &deck.extents(stack_config.overlap()),
    );
    let c = stack.constants();
    println!(
        "cards={} container={} tab={} overlap={} open={} transition={} total={}",
        c.card_count,
        c.container_extent,
        c.tab_size,
        c.overlap,
        c.open_extent,
        c.transition_distance,
        stack.total_length(),
    );
    for segment in stack.segments().segments() {
        match *segment {
            Segment::Transition { from, to, start, end } => {
                println!("  transition {from} -> {to}  [{start}, {end})");
            }
            Segment::Content { card, start, end } => {
                println!("  content    {card}       [{start}, {end})");
            }
        }
    }

    if let Some(offset) = offset {
        let frame = stack.frame(offset);
        println!("offset={} phase={:?}", frame.offset, frame.phase);
        for card in &frame.cards {
            println!(
                "  card {} pos={} size={} z={} inner={} {:?}",
                card.index,
                card.rect.position,
                card.rect.size,
                card.z_order,
                card.inner_offset,
                card.instruction,
            );
        }
    }
    Ok(())
}

// ───────────────────────────────────────── reloads ──────────

fn kick_off_reload(state: &mut AppState, tx: &tokio::sync::mpsc::UnboundedSender<DeckReload>) {
    state.needs_reload = false;
    let Some(dir) = state.deck.source.clone() else {
        return;
    };
    state.reload_generation = state.reload_generation.wrapping_add(1);
    state.loading = true;
    tracing::debug!(generation = state.reload_generation, dir = %dir.display(), "reloading deck");
    spawn_deck_reload(tx.clone(), state.reload_generation, dir);
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only emits when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut user_config = config::AppConfig::load();
    if let Some(tab_size) = cli.tab_size {
        user_config.tab_size = tab_size;
    }
    if let Some(overlap) = cli.overlap {
        user_config.overlap = overlap;
    }
    user_config.clamp_stack_settings();

    let deck = load_initial_deck(&cli)?;

    // ── dump mode ─────────────────────────────────────────────
    if cli.dump_segments {
        return dump_segments(&deck, &user_config, cli.height, cli.offset);
    }

    // ── state (validated before the terminal is touched) ─────
    let (width, height) = crossterm::terminal::size().context("reading terminal size")?;
    let layout = AppLayout::from_area(Rect::new(0, 0, width, height));
    let mut state = AppState::new(deck, user_config, layout.stack_area)?;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    // ── async channels ────────────────────────────────────────
    let frames_wanted = Arc::new(AtomicBool::new(false));
    let mut events = spawn_event_reader(FRAME_INTERVAL, Arc::clone(&frames_wanted));
    let (reload_tx, mut reload_rx) = tokio::sync::mpsc::unbounded_channel::<DeckReload>();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal
            .draw(|frame| {
                let layout = AppLayout::from_area(frame.area());
                if layout.stack_area != state.stack_area {
                    state.resize(layout.stack_area);
                }

                frame.render_widget(
                    StackWidget {
                        deck: &state.deck,
                        frame: &state.frame,
                        tab_size: state.tab_rows(),
                        total_length: state.stack.total_length(),
                    },
                    layout.stack_area,
                );
                frame.render_widget(
                    LoadIndicator {
                        visible: state.loading,
                        tick: state.tick,
                    },
                    layout.stack_area,
                );

                let hint = state.config.status_bar_hint();
                let status_text = match state.active_view {
                    ActiveView::Stack => state.status_message.as_deref().unwrap_or(&hint),
                    ActiveView::ControlsMenu => "",
                };
                let status = Paragraph::new(status_text).style(Theme::status_bar_style());
                frame.render_widget(status, layout.status_area);

                if state.active_view == ActiveView::ControlsMenu {
                    frame.render_widget(
                        ControlsPopup {
                            config: &state.config,
                            selected: state.controls_selected,
                            awaiting_rebind: state.awaiting_rebind,
                        },
                        frame.area(),
                    );
                }
            })
            .context("drawing frame")?;

        // ── reload AFTER draw ─────────────────────────────────────
        if state.needs_reload {
            kick_off_reload(state, &reload_tx);
        }
        frames_wanted.store(state.wants_frames(), Ordering::Relaxed);

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Wheel(n) => handler::handle_wheel(state, n),
                    AppEvent::Resize(w, h) => handler::handle_resize(state, w, h),
                    AppEvent::Tick => state.on_tick(),
                }
            }

            Some(reload) = reload_rx.recv() => {
                handler::handle_deck_reload(state, reload);
            }
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
