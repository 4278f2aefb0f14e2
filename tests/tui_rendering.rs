// ABOUTME: E2E tests for TUI rendering using ratatui's TestBackend.
// ABOUTME: Verifies the conversation, side panel, status bar, scrolling, and cursor placement.

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use voicedesk::config::Credentials;
use voicedesk::session::{EntryKind, LogEntry, SessionStatus};
use voicedesk::tui::state::{Notice, Snapshot, TuiState};
use voicedesk::tui::ui;

/// Extract a single row of text from the terminal buffer as a String.
fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
    let buf = terminal.backend().buffer();
    let width = buf.area.width;
    (0..width)
        .map(|x| {
            buf.cell((x, y))
                .map(|c| c.symbol().chars().next().unwrap_or(' '))
                .unwrap_or(' ')
        })
        .collect()
}

/// Extract all text from the terminal buffer as a single string (rows joined by newlines).
fn all_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let height = buf.area.height;
    (0..height)
        .map(|y| row_text(terminal, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn entry(kind: EntryKind, message: &str) -> LogEntry {
    LogEntry {
        kind,
        message: message.to_string(),
        timestamp: "14:02:11".to_string(),
    }
}

fn snapshot(status: SessionStatus, entries: Vec<LogEntry>) -> Snapshot {
    Snapshot::from_parts(
        entries,
        status,
        None,
        &Credentials {
            agent_id: Some("agent_123".to_string()),
            api_key: None,
        },
        vec![(
            "searchweb".to_string(),
            "Search the web for current information".to_string(),
        )],
        5,
    )
}

fn draw(terminal: &mut Terminal<TestBackend>, snapshot: &Snapshot, state: &mut TuiState) {
    terminal
        .draw(|frame| ui::render(frame, snapshot, state))
        .unwrap();
}

/// An empty, disconnected log shows the header, the placeholder, and the
/// getting-started help.
#[test]
fn renders_empty_disconnected_state() {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut state = TuiState::new();

    draw(&mut terminal, &snapshot(SessionStatus::NotConnected, vec![]), &mut state);

    let header = row_text(&terminal, 0);
    assert!(header.contains("voicedesk"), "header: {:?}", header);

    let text = all_text(&terminal);
    assert!(text.contains("No conversation yet"), "got:\n{}", text);
    assert!(text.contains("Getting Started"), "got:\n{}", text);
    assert!(text.contains("searchweb"), "got:\n{}", text);
}

/// The side panel reports connection and credential presence.
#[test]
fn renders_side_panel() {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut state = TuiState::new();

    draw(&mut terminal, &snapshot(SessionStatus::NotConnected, vec![]), &mut state);

    let text = all_text(&terminal);
    assert!(text.contains("Disconnected"), "got:\n{}", text);
    assert!(text.contains("Agent ID: Set"), "got:\n{}", text);
    assert!(text.contains("API Key: Missing"), "got:\n{}", text);
    assert!(text.contains("No activities yet"), "got:\n{}", text);
    assert!(text.contains("Not connected"), "got:\n{}", text);
}

/// Conversation entries and recent activities render while connected.
#[test]
fn renders_conversation_and_activities() {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut state = TuiState::new();
    let entries = vec![
        entry(EntryKind::Activity, "Connected to Voice Assistant!"),
        entry(EntryKind::User, "Hello agent!"),
        entry(EntryKind::Agent, "Hi, how can I help?"),
    ];

    draw(&mut terminal, &snapshot(SessionStatus::Connected, entries), &mut state);

    let text = all_text(&terminal);
    assert!(text.contains("Hello agent!"), "got:\n{}", text);
    assert!(text.contains("Hi, how can I help?"), "got:\n{}", text);
    assert!(text.contains("14:02:11"), "got:\n{}", text);
    assert!(text.contains("Listening..."), "got:\n{}", text);
    assert!(text.contains("Total messages: 3"), "got:\n{}", text);
    assert!(!text.contains("No conversation yet"), "got:\n{}", text);
}

/// The status bar (last row) shows connection state, count, and the notice.
#[test]
fn renders_status_bar_with_notice() {
    let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();
    let mut state = TuiState::new();
    state.notice = Some(Notice::Error("Configuration error: AGENT_ID is not set".to_string()));

    draw(
        &mut terminal,
        &snapshot(SessionStatus::NotConnected, vec![entry(EntryKind::User, "hi")]),
        &mut state,
    );

    let status = row_text(&terminal, 23);
    assert!(status.contains("disconnected"), "status: {:?}", status);
    assert!(status.contains("1 message"), "status: {:?}", status);
    assert!(status.contains("AGENT_ID is not set"), "status: {:?}", status);
}

/// Wrapped conversation lines should contribute to scroll bounds.
#[test]
fn scroll_clamp_accounts_for_wrapped_height() {
    let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
    let mut state = TuiState::new();
    state.scroll_offset = 100;
    let entries = vec![entry(
        EntryKind::Agent,
        "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron pi rho sigma tau upsilon phi chi psi omega",
    )];

    draw(&mut terminal, &snapshot(SessionStatus::Connected, entries), &mut state);

    assert!(
        state.scroll_offset > 0 && state.scroll_offset < 100,
        "scroll offset should clamp to the wrapped content, got {}",
        state.scroll_offset,
    );
}

/// With scroll_offset at 0 the viewport follows the newest entries as the log grows.
#[test]
fn view_stays_pinned_to_bottom_as_log_grows() {
    let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
    let mut state = TuiState::new();

    let mut entries = vec![entry(EntryKind::Agent, "line1\nline2\nline3")];
    draw(&mut terminal, &snapshot(SessionStatus::Connected, entries.clone()), &mut state);

    entries.push(entry(EntryKind::Agent, "line4\nline5\nline6\nline7\nline8"));
    draw(&mut terminal, &snapshot(SessionStatus::Connected, entries), &mut state);

    let text = all_text(&terminal);
    assert!(text.contains("line8"), "got:\n{}", text);
    assert!(!text.contains("line1"), "got:\n{}", text);
}

/// A long-lived log still shows its newest entry at the bottom of the view.
#[test]
fn long_log_still_follows_newest_entry() {
    let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
    let mut state = TuiState::new();
    let entries: Vec<LogEntry> = (0..ui::MAX_RENDERED_ENTRIES * 3)
        .map(|i| entry(EntryKind::Agent, &format!("reply number {}", i)))
        .collect();
    let newest = format!("reply number {}", entries.len() - 1);

    draw(&mut terminal, &snapshot(SessionStatus::Connected, entries), &mut state);

    let text = all_text(&terminal);
    assert!(text.contains(&newest), "got:\n{}", text);
    assert_eq!(state.scroll_offset, 0);
}

/// Cursor should be clamped to the input viewport when the input exceeds the width.
#[test]
fn cursor_is_clamped_inside_input_viewport_for_long_input() {
    let mut terminal = Terminal::new(TestBackend::new(12, 8)).unwrap();
    let mut state = TuiState::new();
    state.input = "abcdefghijklmnopqrstuvwxyz".to_string();
    state.cursor_pos = state.input.chars().count();

    draw(&mut terminal, &snapshot(SessionStatus::NotConnected, vec![]), &mut state);

    let cursor = terminal.get_cursor_position().unwrap();
    assert!(cursor.x < 12, "cursor x should stay within terminal width, got {:?}", cursor);
}
