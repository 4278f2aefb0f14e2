// ABOUTME: TUI module — ratatui full-screen interface for voicedesk.
// ABOUTME: Conversation view, activity panel, key handling, and the connected-only refresh timer.

pub mod input;
pub mod refresh;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
