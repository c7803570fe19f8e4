//! Application orchestration — state management, event loop, and input handling.

pub mod deck_runtime;
pub mod event;
pub mod handler;
pub mod state;
