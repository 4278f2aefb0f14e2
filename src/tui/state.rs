// ABOUTME: TUI state types — the per-pass log snapshot and the persistent input/scroll/notice state.
// ABOUTME: A Snapshot is rebuilt from the message log on every render pass; TuiState survives between passes.

use crate::config::Credentials;
use crate::context::AppContext;
use crate::session::{EntryKind, LogEntry, SessionStatus};

/// Everything one render pass shows, read fresh from the log and controller.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entries: Vec<LogEntry>,
    /// Most recent activity entries, oldest first.
    pub activities: Vec<LogEntry>,
    pub status: SessionStatus,
    pub last_activity: Option<String>,
    pub agent_id_set: bool,
    pub api_key_set: bool,
    /// `(signature, description)` of each tool offered to the agent.
    pub tools: Vec<(String, String)>,
}

impl Snapshot {
    /// Re-read the log and collect the controller state.
    pub fn capture(ctx: &AppContext, credentials: &Credentials) -> Self {
        let controller = ctx.controller();
        Self::from_parts(
            ctx.log().read_all(),
            controller.status(),
            controller.last_activity().map(str::to_string),
            credentials,
            ctx.tools().summaries(),
            ctx.config().ui.activity_tail,
        )
    }

    pub fn from_parts(
        entries: Vec<LogEntry>,
        status: SessionStatus,
        last_activity: Option<String>,
        credentials: &Credentials,
        tools: Vec<(String, String)>,
        activity_tail: usize,
    ) -> Self {
        let activities = recent_activities(&entries, activity_tail);
        Self {
            entries,
            activities,
            status,
            last_activity,
            agent_id_set: credentials.has_agent_id(),
            api_key_set: credentials.has_api_key(),
            tools,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    pub fn message_count(&self) -> usize {
        self.entries.len()
    }
}

/// The last `n` activity entries in append order.
pub fn recent_activities(entries: &[LogEntry], n: usize) -> Vec<LogEntry> {
    let activities: Vec<&LogEntry> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Activity)
        .collect();
    let skip = activities.len().saturating_sub(n);
    activities.into_iter().skip(skip).cloned().collect()
}

/// A one-line message shown in the status bar until the next action.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Error(String),
}

/// UI state that persists across render passes.
#[derive(Debug, Default)]
pub struct TuiState {
    pub input: String,
    pub cursor_pos: usize,
    /// Lines scrolled up from the bottom of the conversation (0 = at bottom).
    pub scroll_offset: u16,
    pub notice: Option<Notice>,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit the current input buffer. Returns the trimmed text if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        self.input.clear();
        self.cursor_pos = 0;
        Some(trimmed)
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::Info(text.into()));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::Error(text.into()));
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
