// ABOUTME: TUI widget sub-modules for the conversation, side panel, and status bar.
// ABOUTME: Each widget is a pure rendering function over the render-pass data.

pub mod chat;
pub mod panel;
pub mod status;
