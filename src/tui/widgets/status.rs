// ABOUTME: Status bar widget — connection state, message count, key hints, and the current notice.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::Notice;

const KEY_HINTS: &str = "^K connect  ^D disconnect  ^L clear  ^R refresh  Esc quit ";

/// Render the status bar line.
pub fn status_line(connected: bool, message_count: usize, notice: Option<&Notice>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let state = if connected {
        Span::styled(" connected ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" disconnected ", Style::default().fg(Color::Red))
    };

    let mut spans = vec![
        state,
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", format_count(message_count)),
            Style::default().fg(Color::White),
        ),
        Span::styled("| ", dim),
    ];

    match notice {
        Some(Notice::Info(text)) => {
            spans.push(Span::styled(format!("{} ", text), Style::default().fg(Color::Cyan)));
            spans.push(Span::styled("| ", dim));
        }
        Some(Notice::Error(text)) => {
            spans.push(Span::styled(format!("{} ", text), Style::default().fg(Color::Red)));
            spans.push(Span::styled("| ", dim));
        }
        None => {}
    }

    spans.push(Span::styled(KEY_HINTS, dim));
    Line::from(spans)
}

fn format_count(n: usize) -> String {
    if n == 1 {
        "1 message".to_string()
    } else {
        format!("{} messages", n)
    }
}
