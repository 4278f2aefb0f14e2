// ABOUTME: Session module — the shared message log and the voice session lifecycle.
// ABOUTME: The log is the single source the UI renders; the controller narrates into it.

pub mod controller;
pub mod log;

pub use controller::{LogCallbacks, SessionController, SessionStatus};
pub use log::{EntryKind, LogEntry, MessageLog};
