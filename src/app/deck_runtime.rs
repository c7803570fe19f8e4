//! Background deck reloads to keep the UI thread responsive.

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::core::deck::{self, Deck};

/// Result of a background reload, tagged with the generation that asked for it.
pub struct DeckReload {
    pub generation: u64,
    pub dir: PathBuf,
    pub result: anyhow::Result<Deck>,
}

pub fn spawn_deck_reload(tx: mpsc::UnboundedSender<DeckReload>, generation: u64, dir: PathBuf) {
    std::thread::spawn(move || {
        let result = deck::load_deck(&dir);
        let _ = tx.send(DeckReload {
            generation,
            dir,
            result,
        });
    });
}
