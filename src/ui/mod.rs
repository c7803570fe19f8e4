//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the engine's [`StackFrame`](crate::core::stack::StackFrame)
//! and the deck and turns them into cells on the terminal.  No layout math
//! beyond row rounding happens here.

pub mod layout;
pub mod popup;
pub mod smooth_scroll;
pub mod spinner;
pub mod stack_widget;
pub mod theme;
