//! Terminal event abstraction.
//!
//! A background task polls crossterm and forwards events over a channel so
//! the main loop stays non-blocking.  Two things are shaped for the stack:
//!
//! * Wheel notches that arrive back to back are merged into one
//!   [`AppEvent::Wheel`], so a fast flick retargets the scroll once instead
//!   of once per notch.
//! * [`AppEvent::Tick`] is only sent while the app asks for frames (scroll
//!   easing or the reload spinner); an idle stack sends nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Net wheel movement in notches; positive scrolls down.
    Wheel(i32),
    Resize(u16, u16),
    Tick,
}

/// Signed notch count for a wheel event, `None` for any other mouse event.
pub fn wheel_notches(kind: MouseEventKind) -> Option<i32> {
    match kind {
        MouseEventKind::ScrollDown => Some(1),
        MouseEventKind::ScrollUp => Some(-1),
        _ => None,
    }
}

fn translate(ev: CtEvent) -> Option<AppEvent> {
    match ev {
        // Release events only arrive on terminals with keyboard
        // enhancement; nothing acts on them.
        CtEvent::Key(k) if k.kind == KeyEventKind::Release => None,
        CtEvent::Key(k) => Some(AppEvent::Key(k)),
        CtEvent::Mouse(m) => Some(match wheel_notches(m.kind) {
            Some(n) => AppEvent::Wheel(n),
            None => AppEvent::Mouse(m),
        }),
        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Merge consecutive wheel events; any other event ends the run.
///
/// Returns the merged events in arrival order.  Zero-sum wheel runs are
/// dropped.
pub fn coalesce(events: impl IntoIterator<Item = AppEvent>) -> Vec<AppEvent> {
    let mut out = Vec::new();
    let mut pending = 0;
    for ev in events {
        match ev {
            AppEvent::Wheel(n) => pending += n,
            other => {
                if pending != 0 {
                    out.push(AppEvent::Wheel(pending));
                    pending = 0;
                }
                out.push(other);
            }
        }
    }
    if pending != 0 {
        out.push(AppEvent::Wheel(pending));
    }
    out
}

/// Spawns a background task that polls the terminal and sends events
/// through the returned channel.  `frames_wanted` is read before every
/// poll timeout to decide whether a [`AppEvent::Tick`] goes out.
pub fn spawn_event_reader(
    frame_interval: Duration,
    frames_wanted: Arc<AtomicBool>,
) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            if !event::poll(frame_interval).unwrap_or(false) {
                if frames_wanted.load(Ordering::Relaxed) && tx.send(AppEvent::Tick).is_err() {
                    break; // receiver dropped
                }
                continue;
            }

            // Drain whatever is already queued so wheel bursts merge.
            let mut batch = Vec::new();
            while let Ok(ev) = event::read() {
                batch.extend(translate(ev));
                if !event::poll(Duration::ZERO).unwrap_or(false) {
                    break;
                }
            }

            let closed = coalesce(batch).into_iter().any(|ev| tx.send(ev).is_err());
            if closed {
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn wheels(events: &[AppEvent]) -> Vec<Option<i32>> {
        events
            .iter()
            .map(|e| match e {
                AppEvent::Wheel(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn wheel_runs_merge_between_other_events() {
        let key = || AppEvent::Key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        let merged = coalesce(vec![
            AppEvent::Wheel(1),
            AppEvent::Wheel(1),
            AppEvent::Wheel(1),
            key(),
            AppEvent::Wheel(-1),
        ]);
        assert_eq!(wheels(&merged), vec![Some(3), None, Some(-1)]);
    }

    #[test]
    fn cancelling_wheel_run_is_dropped() {
        let merged = coalesce(vec![AppEvent::Wheel(1), AppEvent::Wheel(-1), AppEvent::Tick]);
        assert_eq!(wheels(&merged), vec![None]);
    }

    #[test]
    fn only_wheel_kinds_have_notches() {
        assert_eq!(wheel_notches(MouseEventKind::ScrollDown), Some(1));
        assert_eq!(wheel_notches(MouseEventKind::ScrollUp), Some(-1));
        assert_eq!(wheel_notches(MouseEventKind::Moved), None);
    }
}
