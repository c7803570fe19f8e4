//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::{Action, KeyBind};
use crate::core::stack::Step;
use crate::ui::layout::AppLayout;
use crate::ui::stack_widget::hit_test_tab;

use super::deck_runtime::DeckReload;
use super::state::{ActiveView, AppState};

/// Total selectable rows in the controls menu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Stack => handle_stack_key(state, key),
        ActiveView::ControlsMenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

// ── Stack view (configurable bindings) ──────────────────────────

fn handle_stack_key(state: &mut AppState, key: KeyEvent) {
    state.status_message = None;

    if let Some(action) = state.config.match_key(key) {
        apply_action(state, action);
        return;
    }

    // Digits jump straight to a card; not rebindable.
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        if key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            let idx = (c as usize) - ('1' as usize);
            state.jump_to_card(idx);
        }
    }
}

fn apply_action(state: &mut AppState, action: Action) {
    let step = f64::from(state.config.scroll_step);
    match action {
        Action::NextCard => state.step_card(Step::Next),
        Action::PrevCard => state.step_card(Step::Prev),
        Action::ScrollDown => state.scroll_by(step),
        Action::ScrollUp => state.scroll_by(-step),
        Action::PageDown => state.scroll_by(state.page_size()),
        Action::PageUp => state.scroll_by(-state.page_size()),
        Action::FirstCard => state.scroll_to(0.0),
        Action::LastCard => state.scroll_to(state.stack.total_length()),
        Action::Reload => request_reload(state),
        Action::OpenControls => {
            state.active_view = ActiveView::ControlsMenu;
            state.controls_selected = 0;
        }
        Action::Quit => state.should_quit = true,
    }
}

fn request_reload(state: &mut AppState) {
    if state.deck.source.is_some() {
        state.needs_reload = true;
    } else {
        state.status_message = Some("Demo deck has no source to reload".into());
    }
}

// ── Controls menu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Stack;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                state.awaiting_rebind = true;
            } else {
                state.config.reset_defaults();
                save_config(state);
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&action) = Action::ALL.get(state.controls_selected) {
                state.config.bindings.insert(action, Vec::new());
                save_config(state);
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }

    // Ctrl+C stays reserved for quitting.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return;
    }

    let Some(&action) = Action::ALL.get(state.controls_selected) else {
        state.awaiting_rebind = false;
        return;
    };
    state.config.add_binding(action, KeyBind::from_key_event(key));
    save_config(state);
    state.awaiting_rebind = false;
}

fn save_config(state: &mut AppState) {
    if let Err(err) = state.config.save() {
        tracing::warn!("saving config failed: {err:#}");
        state.status_message = Some(format!("Could not save config: {err}"));
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Scroll by `notches` wheel steps (already merged by the event reader).
pub fn handle_wheel(state: &mut AppState, notches: i32) {
    if state.active_view != ActiveView::Stack {
        return;
    }
    state.scroll_by(f64::from(notches) * f64::from(state.config.scroll_step));
}

/// Process a (non-wheel) mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Stack {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = hit_test_tab(
                &state.frame,
                cards_area(state.stack_area),
                state.tab_rows(),
                mouse.column,
                mouse.row,
            );
            if let Some(idx) = hit {
                state.jump_to_card(idx);
            }
        }
        _ => {}
    }
}

/// The stack widget keeps its last column for the scrollbar.
fn cards_area(stack_area: Rect) -> Rect {
    Rect {
        width: stack_area.width.saturating_sub(1),
        ..stack_area
    }
}

// ── Resize / reload ─────────────────────────────────────────────

pub fn handle_resize(state: &mut AppState, width: u16, height: u16) {
    let layout = AppLayout::from_area(Rect::new(0, 0, width, height));
    state.resize(layout.stack_area);
}

/// Apply a finished background reload.  Results from superseded
/// generations are dropped.
pub fn handle_deck_reload(state: &mut AppState, reload: DeckReload) {
    if reload.generation != state.reload_generation {
        tracing::debug!(
            generation = reload.generation,
            current = state.reload_generation,
            "dropping stale reload"
        );
        return;
    }
    state.loading = false;

    match reload.result {
        Ok(deck) => {
            let count = deck.len();
            match state.replace_deck(deck) {
                Ok(()) => {
                    state.status_message =
                        Some(format!("Reloaded {count} cards from {}", reload.dir.display()));
                }
                Err(err) => {
                    tracing::warn!("reloaded deck rejected: {err:#}");
                    state.status_message = Some(format!("Reload failed: {err}"));
                }
            }
        }
        Err(err) => {
            tracing::warn!("reload of {} failed: {err:#}", reload.dir.display());
            state.status_message = Some(format!("Reload failed: {err}"));
        }
    }
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::deck::Deck;
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::new(Deck::demo(4), AppConfig::default(), Rect::new(0, 0, 40, 30)).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn ctrl_c_quits_from_any_view() {
        let mut s = state();
        s.active_view = ActiveView::ControlsMenu;
        s.awaiting_rebind = true;
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(s.should_quit);
    }

    #[test]
    fn next_and_prev_card_target_transition_ends() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.scroll.target(), s.stack.target_offset_for(1));
        handle_key(&mut s, press(KeyCode::Char('j')));
        assert_eq!(s.scroll.target(), s.stack.target_offset_for(2));
        handle_key(&mut s, press(KeyCode::Up));
        assert_eq!(s.scroll.target(), s.stack.target_offset_for(1));
    }

    #[test]
    fn line_and_page_scrolling() {
        let mut s = state();
        handle_key(&mut s, KeyEvent::new(KeyCode::Down, KeyModifiers::CONTROL));
        assert_eq!(s.scroll.target(), 3.0);
        handle_key(&mut s, press(KeyCode::PageDown));
        assert_eq!(s.scroll.target(), 3.0 + s.page_size());
        handle_key(&mut s, press(KeyCode::Home));
        assert_eq!(s.scroll.target(), 0.0);
        handle_key(&mut s, press(KeyCode::End));
        assert_eq!(s.scroll.target(), s.stack.total_length());
        handle_key(&mut s, press(KeyCode::PageDown));
        assert_eq!(s.scroll.target(), s.stack.total_length());
    }

    #[test]
    fn digits_jump_to_cards() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('3')));
        assert_eq!(s.scroll.target(), s.stack.target_offset_for(2));
        handle_key(&mut s, press(KeyCode::Char('9')));
        assert_eq!(s.scroll.target(), s.stack.target_offset_for(2));
        handle_key(&mut s, press(KeyCode::Char('1')));
        assert_eq!(s.scroll.target(), 0.0);
    }

    #[test]
    fn reload_without_source_reports_status() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('r')));
        assert!(!s.needs_reload);
        assert!(s.status_message.is_some());

        s.deck.source = Some(PathBuf::from("/tmp/deck"));
        handle_key(&mut s, press(KeyCode::Char('r')));
        assert!(s.needs_reload);
    }

    #[test]
    fn controls_menu_navigation_and_rebind_cancel() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::ControlsMenu);

        handle_key(&mut s, press(KeyCode::Down));
        assert_eq!(s.controls_selected, 1);
        // Navigation keys inside the menu don't scroll the stack.
        assert_eq!(s.scroll.target(), 0.0);

        handle_key(&mut s, press(KeyCode::Enter));
        assert!(s.awaiting_rebind);
        handle_key(&mut s, press(KeyCode::Esc));
        assert!(!s.awaiting_rebind);
        assert_eq!(s.active_view, ActiveView::ControlsMenu);

        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Stack);
    }

    #[test]
    fn wheel_scrolls_by_step_per_notch() {
        let mut s = state();
        handle_wheel(&mut s, 2);
        assert_eq!(s.scroll.target(), 6.0);
        // Input only retargets; the displayed offset moves on frame ticks.
        assert_eq!(s.scroll.offset(), 0.0);
        s.on_tick();
        assert!(s.scroll.offset() > 0.0);
        handle_wheel(&mut s, -1);
        assert_eq!(s.scroll.target(), 3.0);
        handle_wheel(&mut s, -10);
        assert_eq!(s.scroll.target(), 0.0);

        s.active_view = ActiveView::ControlsMenu;
        handle_wheel(&mut s, 4);
        assert_eq!(s.scroll.target(), 0.0);
    }

    #[test]
    fn clicking_a_tab_jumps_to_its_card() {
        let mut s = state();
        // Height 30, tab 3, overlap 1, 4 cards: card 3 rests at 30 - 1 - 2 = 27.
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 5, 27));
        assert_eq!(s.scroll.target(), s.stack.target_offset_for(3));

        // Clicking the open card's body does nothing.
        let mut s = state();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 5, 8));
        assert_eq!(s.scroll.target(), 0.0);
    }

    #[test]
    fn stale_reloads_are_dropped() {
        let mut s = state();
        s.reload_generation = 2;
        s.loading = true;
        handle_deck_reload(
            &mut s,
            DeckReload {
                generation: 1,
                dir: PathBuf::from("/tmp/deck"),
                result: Ok(Deck::demo(7)),
            },
        );
        assert!(s.loading);
        assert_eq!(s.stack.card_count(), 4);

        handle_deck_reload(
            &mut s,
            DeckReload {
                generation: 2,
                dir: PathBuf::from("/tmp/deck"),
                result: Ok(Deck::demo(7)),
            },
        );
        assert!(!s.loading);
        assert_eq!(s.stack.card_count(), 7);
    }

    #[test]
    fn failed_reload_keeps_current_deck() {
        let mut s = state();
        handle_deck_reload(
            &mut s,
            DeckReload {
                generation: 0,
                dir: PathBuf::from("/nope"),
                result: Err(anyhow::anyhow!("gone")),
            },
        );
        assert_eq!(s.stack.card_count(), 4);
        assert!(s.status_message.as_deref().is_some_and(|m| m.contains("gone")));
    }

    #[test]
    fn resize_recomputes_stack_area() {
        let mut s = state();
        handle_resize(&mut s, 40, 25);
        assert_eq!(s.stack_area.height, 24);
        assert_eq!(s.stack.constants().container_extent, 24.0);
    }
}
