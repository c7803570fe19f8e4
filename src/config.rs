//! User configuration — keybindings, stack geometry, and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/card-stack/config.toml` (default `~/.config/card-stack/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::stack::ResizePolicy;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the stack view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NextCard,
    PrevCard,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    FirstCard,
    LastCard,
    Reload,
    OpenControls,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::NextCard,
        Action::PrevCard,
        Action::ScrollDown,
        Action::ScrollUp,
        Action::PageDown,
        Action::PageUp,
        Action::FirstCard,
        Action::LastCard,
        Action::Reload,
        Action::OpenControls,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::NextCard => "Next Card",
            Action::PrevCard => "Previous Card",
            Action::ScrollDown => "Scroll Down",
            Action::ScrollUp => "Scroll Up",
            Action::PageDown => "Page Down",
            Action::PageUp => "Page Up",
            Action::FirstCard => "First Card",
            Action::LastCard => "End of Stack",
            Action::Reload => "Reload Deck",
            Action::OpenControls => "Open Controls",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::NextCard => "next_card",
            Action::PrevCard => "prev_card",
            Action::ScrollDown => "scroll_down",
            Action::ScrollUp => "scroll_up",
            Action::PageDown => "page_down",
            Action::PageUp => "page_up",
            Action::FirstCard => "first_card",
            Action::LastCard => "last_card",
            Action::Reload => "reload",
            Action::OpenControls => "open_controls",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

fn significant_modifiers(code: KeyCode) -> KeyModifiers {
    match code {
        KeyCode::Char(_) => MODIFIER_MASK.difference(KeyModifiers::SHIFT),
        _ => MODIFIER_MASK,
    }
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared; SHIFT is ignored for characters, whose case already
    /// carries it.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = significant_modifiers(event.code);
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & significant_modifiers(event.code),
        }
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Ctrl+↓"`, `"PgDn"`, `"q"`).
    pub fn display(&self) -> String {
        let key: String = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            _ => key_name(self.code),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Ctrl+Down"`, `"PageDown"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), key_name(self.code))
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
            _ => {
                // Single characters keep their case ("G" ≠ "g").
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

pub const DEFAULT_TAB_SIZE: u16 = 3;
pub const DEFAULT_OVERLAP: u16 = 1;
pub const DEFAULT_SCROLL_STEP: u16 = 3;
pub const DEFAULT_SMOOTH_SPEED: f64 = 0.35;

/// Application configuration — keybindings and stack settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Rows of each card's tab (title border + subtitle + hidden overlap).
    pub tab_size: u16,
    /// Rows of each tab covered by the next card.
    pub overlap: u16,
    /// Rows scrolled per wheel notch / line-scroll key.
    pub scroll_step: u16,
    /// Smooth-scroll damping per tick (0.05–0.95; higher settles faster).
    pub smooth_speed: f64,
    /// How the scroll offset follows a resize or deck reload.
    pub resize_policy: ResizePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            tab_size: DEFAULT_TAB_SIZE,
            overlap: DEFAULT_OVERLAP,
            scroll_step: DEFAULT_SCROLL_STEP,
            smooth_speed: DEFAULT_SMOOTH_SPEED,
            resize_policy: ResizePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Built-in key bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::{
            FirstCard, LastCard, NextCard, OpenControls, PrevCard, Quit, Reload, ScrollDown,
            ScrollUp,
        };
        use KeyCode::{Char, Down, End, Home, Up};
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let mut m = HashMap::new();

        m.insert(NextCard, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(PrevCard, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, ctrl), KeyBind::new(Char('e'), n)]);
        m.insert(ScrollUp, vec![KeyBind::new(Up, ctrl), KeyBind::new(Char('y'), n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(
            Action::PageUp,
            vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)],
        );
        m.insert(FirstCard, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(LastCard, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), n)]);
        m.insert(Reload, vec![KeyBind::new(Char('r'), n)]);
        m.insert(OpenControls, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<(Action, u32)> = None;

        for (&action, binds) in &self.bindings {
            for bind in binds.iter().filter(|b| b.matches(event)) {
                let mc = bind.modifiers.bits().count_ones();
                if best.map_or(true, |(_, best_mc)| mc > best_mc) {
                    best = Some((action, mc));
                }
            }
        }
        best.map(|(action, _)| action)
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"↓/j"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(KeyBind::display).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action).and_then(|b| b.first()) {
            Some(bind) => bind.display(),
            None => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: card | {}: scroll | 1-9/click tab: jump | {}: reload | {}: controls",
            self.short_binding(Action::NextCard),
            self.short_binding(Action::PrevCard),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::Reload),
            self.short_binding(Action::OpenControls),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(err) => {
                tracing::debug!("no config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, self.serialise())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            // Stack settings.
            match key {
                "tab_size" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.tab_size = v;
                    }
                    continue;
                }
                "overlap" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.overlap = v;
                    }
                    continue;
                }
                "scroll_step" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.scroll_step = v.clamp(1, 20);
                    }
                    continue;
                }
                "smooth_speed" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.smooth_speed = v.clamp(0.05, 0.95);
                    }
                    continue;
                }
                "resize_policy" => {
                    if let Some(p) = ResizePolicy::from_config_key(value) {
                        config.resize_policy = p;
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config.clamp_stack_settings();
        config
    }

    /// Pull tab size into `2..=8` and keep at least one tab row visible
    /// past the overlap.  Applied to the file and to CLI overrides alike.
    pub fn clamp_stack_settings(&mut self) {
        self.tab_size = self.tab_size.clamp(2, 8);
        self.overlap = self.overlap.min(self.tab_size - 1);
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# card-stack configuration".to_string(),
            String::new(),
            "# Stack settings".to_string(),
            format!("tab_size = {}", self.tab_size),
            format!("overlap = {}", self.overlap),
            format!("scroll_step = {}", self.scroll_step),
            format!("smooth_speed = {}", self.smooth_speed),
            "# keep | reanchor".to_string(),
            format!("resize_policy = {}", self.resize_policy.config_key()),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/card-stack/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("card-stack").join("config.toml")
}

// ───────────────────────────────────────── tests ─────────────
