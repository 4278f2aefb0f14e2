// ABOUTME: Conversation widget — renders message log entries into styled ratatui Lines.
// ABOUTME: User, agent, and activity entries each get their own prefix and styling.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::{EntryKind, LogEntry};

pub const EMPTY_PLACEHOLDER: &str =
    "No conversation yet. Connect and start speaking to see the conversation here!";

/// Render log entries into styled Lines, one blank line between entries.
pub fn render_chat_lines(entries: &[LogEntry]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let stamp = Span::styled(
            format!("[{}] ", entry.timestamp),
            Style::default().fg(Color::DarkGray),
        );

        match entry.kind {
            EntryKind::User => {
                push_prefixed(&mut lines, stamp, "👤 You: ", Color::Green, &entry.message);
            }
            EntryKind::Agent => {
                push_prefixed(&mut lines, stamp, "🤖 Agent: ", Color::Cyan, &entry.message);
            }
            EntryKind::Activity => {
                lines.push(Line::from(vec![
                    stamp,
                    Span::styled(
                        entry.message.clone(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]));
            }
        }
    }

    lines
}

// First line carries the timestamp and prefix, continuation lines are plain.
fn push_prefixed(
    lines: &mut Vec<Line<'static>>,
    stamp: Span<'static>,
    prefix: &'static str,
    color: Color,
    message: &str,
) {
    for (i, text) in message.split('\n').enumerate() {
        if i == 0 {
            lines.push(Line::from(vec![
                stamp.clone(),
                Span::styled(
                    prefix,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(text.to_string()),
            ]));
        } else {
            lines.push(Line::from(Span::raw(format!("   {}", text))));
        }
    }
}

/// Shown in place of the conversation when the log is empty.
pub fn placeholder_lines(connected: bool, tools: &[(String, String)]) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled(EMPTY_PLACEHOLDER, dim))];
    if connected {
        return lines;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Getting Started", bold)));
    lines.push(Line::from("1. Set AGENT_ID and ELEVENLABS_API_KEY (environment or .env)"));
    lines.push(Line::from("2. Press Ctrl+K to connect to the voice assistant"));
    lines.push(Line::from("3. Speak, or type a message and press Enter"));
    lines.push(Line::from("4. Watch the conversation and tool activity appear here"));

    if !tools.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("The assistant can:", bold)));
        for (name, description) in tools {
            lines.push(Line::from(vec![
                Span::styled(format!("  • {}", name), Style::default().fg(Color::Cyan)),
                Span::styled(format!(": {}", description), dim),
            ]));
        }
    }

    lines
}
