// ABOUTME: Library root for voicedesk — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod session;
pub mod tools;
pub mod tui;
pub mod voice;
