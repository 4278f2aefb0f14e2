// ABOUTME: Side panel widget — connection status, credential presence, and recent activities.
// ABOUTME: Pure function of the render-pass Snapshot.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::Snapshot;

pub fn panel_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled("Status", bold)));
    let status = if snapshot.is_connected() {
        Span::styled("● Connected", Style::default().fg(Color::Green))
    } else {
        Span::styled("○ Disconnected", Style::default().fg(Color::Red))
    };
    lines.push(Line::from(status));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Environment", bold)));
    lines.push(presence_line("Agent ID", snapshot.agent_id_set));
    lines.push(presence_line("API Key", snapshot.api_key_set));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Last Activity", bold)));
    lines.push(Line::from(Span::styled(
        snapshot
            .last_activity
            .clone()
            .unwrap_or_else(|| "None".to_string()),
        dim,
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled("Recent Activities", bold)));
    if snapshot.activities.is_empty() {
        lines.push(Line::from(Span::styled("No activities yet", dim)));
    } else {
        for activity in &snapshot.activities {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", activity.timestamp), dim),
                Span::raw(activity.message.clone()),
            ]));
        }
    }
    lines.push(Line::from(""));

    if snapshot.is_connected() {
        lines.push(Line::from(Span::styled(
            "🎤 Listening...",
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            format!("Total messages: {}", snapshot.message_count()),
            dim,
        )));
    } else {
        lines.push(Line::from(Span::styled("Not connected", dim)));
    }

    lines
}

fn presence_line(label: &str, set: bool) -> Line<'static> {
    let value = if set {
        Span::styled("Set", Style::default().fg(Color::Green))
    } else {
        Span::styled("Missing", Style::default().fg(Color::Red))
    };
    Line::from(vec![Span::raw(format!("{}: ", label)), value])
}
