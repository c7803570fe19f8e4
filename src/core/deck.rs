//! Card deck — the ordered list of cards shown in the stack.
//!
//! A deck is read from a directory: every regular, non-hidden file directly
//! inside it becomes one card, ordered by file name.  A leading `# Title`
//! line names the card; otherwise the file stem does.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

use super::stack::ContentExtentProvider;

// ───────────────────────────────────────── card ──────────────

/// One card: a tab label plus body lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    /// Secondary tab line (size, modification time).
    pub subtitle: String,
    pub body: Vec<String>,
    /// Source file, `None` for generated cards.
    pub path: Option<PathBuf>,
}

impl Card {
    /// Build a card from file contents.
    pub fn from_text(stem: &str, text: &str, modified: Option<SystemTime>) -> Self {
        let mut lines: Vec<String> = text.lines().map(|l| l.replace('\t', "    ")).collect();

        let title = match lines.first().and_then(|l| l.strip_prefix("# ")) {
            Some(heading) => {
                let heading = heading.trim().to_string();
                lines.remove(0);
                if lines.first().is_some_and(|l| l.trim().is_empty()) {
                    lines.remove(0);
                }
                heading
            }
            None => stem.to_string(),
        };

        let mut subtitle = format!("{} lines", lines.len());
        if let Some(m) = modified {
            subtitle.push_str(" · ");
            subtitle.push_str(&format_modified(m));
        }

        Self {
            title,
            subtitle,
            body: lines,
            path: None,
        }
    }

    /// Body extent in rows (lines are clipped, never wrapped).
    pub fn extent(&self) -> usize {
        self.body.len()
    }
}

fn format_modified(time: SystemTime) -> String {
    use chrono::{DateTime, Local};
    let dt: DateTime<Local> = time.into();
    dt.format("%Y/%m/%d %H:%M").to_string()
}

// ───────────────────────────────────────── deck ──────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Deck {
    pub cards: Vec<Card>,
    /// Directory the deck was read from (`None` for the demo deck).
    pub source: Option<PathBuf>,
}

impl Deck {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Built-in sample deck: `n` cards with a mix of short bodies and bodies
    /// long enough to scroll.
    pub fn demo(n: usize) -> Self {
        const TOPICS: &[&str] = &[
            "Inbox", "Projects", "Notes", "Archive", "Drafts", "Reading", "Ideas", "Journal",
        ];
        let cards = (0..n.max(1))
            .map(|i| {
                let topic = TOPICS[i % TOPICS.len()];
                let rows = match i % 3 {
                    0 => 6,
                    1 => 40 + i * 4,
                    _ => 14,
                };
                let body = (1..=rows)
                    .map(|r| format!("{topic} · entry {r:>3}"))
                    .collect::<Vec<_>>();
                Card {
                    title: format!("{} {}", i + 1, topic),
                    subtitle: format!("{rows} lines · demo"),
                    body,
                    path: None,
                }
            })
            .collect();
        Self {
            cards,
            source: None,
        }
    }
}

impl Deck {
    /// Body extents as the stack engine sees them.
    ///
    /// The tab of the card after an open card covers the open card's last
    /// `overlap` rows, so every card but the last reports that many extra
    /// rows; at full inner scroll its final line then sits just above the
    /// next tab.
    pub fn extents(&self, overlap: f64) -> DeckExtents<'_> {
        DeckExtents {
            deck: self,
            trailing_pad: overlap.max(0.0),
        }
    }
}

/// [`ContentExtentProvider`] view of a deck; see [`Deck::extents`].
#[derive(Debug, Clone, Copy)]
pub struct DeckExtents<'a> {
    deck: &'a Deck,
    trailing_pad: f64,
}

impl ContentExtentProvider for DeckExtents<'_> {
    fn card_count(&self) -> usize {
        self.deck.len()
    }

    fn intrinsic_extent(&self, index: usize) -> f64 {
        let Some(card) = self.deck.cards.get(index) else {
            return 0.0;
        };
        let rows = card.extent() as f64;
        if index + 1 < self.deck.len() {
            rows + self.trailing_pad
        } else {
            rows
        }
    }
}

/// Read every regular, non-hidden file directly inside `dir` as a card.
pub fn load_deck(dir: &Path) -> Result<Deck> {
    let mut cards = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.with_context(|| format!("reading deck directory {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(err) => {
                tracing::debug!("skipping {}: {err}", path.display());
                continue;
            }
        };
        let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.into_owned());

        let mut card = Card::from_text(&stem, &text, modified);
        card.path = Some(path.to_path_buf());
        cards.push(card);
    }

    if cards.is_empty() {
        bail!("no readable cards in {}", dir.display());
    }

    tracing::info!(cards = cards.len(), dir = %dir.display(), "deck loaded");
    Ok(Deck {
        cards,
        source: Some(dir.to_path_buf()),
    })
}

// ───────────────────────────────────────── tests ─────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "card-stack-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn heading_becomes_title() {
        let card = Card::from_text("notes", "# Shopping\n\nmilk\neggs\n", None);
        assert_eq!(card.title, "Shopping");
        assert_eq!(card.body, vec!["milk", "eggs"]);
        assert_eq!(card.subtitle, "2 lines");
    }

    #[test]
    fn stem_is_fallback_title() {
        let card = Card::from_text("todo", "a\n\tb\n", None);
        assert_eq!(card.title, "todo");
        assert_eq!(card.body, vec!["a", "    b"]);
    }

    #[test]
    fn demo_mixes_short_and_long_cards() {
        let deck = Deck::demo(4);
        assert_eq!(deck.len(), 4);
        let extents = deck.extents(0.0);
        assert_eq!(extents.card_count(), 4);
        assert_eq!(extents.intrinsic_extent(0), 6.0);
        assert_eq!(extents.intrinsic_extent(1), 44.0);
        assert_eq!(extents.intrinsic_extent(9), 0.0);
        assert_eq!(Deck::demo(0).len(), 1);
    }

    #[test]
    fn extents_leave_room_under_the_next_tab() {
        let deck = Deck::demo(3);
        let extents = deck.extents(1.0);
        assert_eq!(extents.intrinsic_extent(0), 7.0);
        assert_eq!(extents.intrinsic_extent(1), 45.0);
        // Nothing covers the last card.
        assert_eq!(extents.intrinsic_extent(2), 14.0);
    }

    #[test]
    fn load_deck_sorts_and_skips_hidden_files() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("b.txt"), "# Second\nx\n").unwrap();
        std::fs::write(dir.join("a.md"), "first line\n").unwrap();
        std::fs::write(dir.join(".hidden"), "nope").unwrap();
        std::fs::create_dir(dir.join("nested")).unwrap();

        let deck = load_deck(&dir).unwrap();
        let titles: Vec<&str> = deck.cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "Second"]);
        assert_eq!(deck.source.as_deref(), Some(dir.as_path()));
        assert!(deck.cards[0].subtitle.starts_with("1 lines · "));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = scratch_dir("empty");
        assert!(load_deck(&dir).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
