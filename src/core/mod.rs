//! Core algorithms – the stack layout engine and the deck model.
//!
//! Nothing in this module depends on any TUI or rendering crate.
//! Every type is `Send + Sync` so it can be moved across threads.

pub mod deck;
pub mod stack;
