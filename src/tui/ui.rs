// ABOUTME: Main TUI rendering function — assembles header, conversation, side panel, input, and status bar.
// ABOUTME: Splits the terminal frame into layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::session::LogEntry;
use crate::tui::state::{Snapshot, TuiState};
use crate::tui::widgets::chat::{placeholder_lines, render_chat_lines};
use crate::tui::widgets::panel::panel_lines;
use crate::tui::widgets::status::status_line;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, snapshot: &Snapshot, state: &mut TuiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Conversation + panel
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let header = Line::from(Span::styled(
        " voicedesk",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(chunks[1]);

    render_conversation(frame, snapshot, state, body[0]);

    let panel = Paragraph::new(panel_lines(snapshot))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Controls "));
    frame.render_widget(panel, body[1]);

    let input_chunk = chunks[2];
    let input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .title(Span::styled(
            " type a message ",
            Style::default().fg(Color::DarkGray),
        ));
    let input = Paragraph::new(state.input.clone()).block(input_block);
    frame.render_widget(input, input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();
        let prefix = &state.input[..state.cursor_byte_index()];
        let visual_col = UnicodeWidthStr::width(prefix);
        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col) as u16);
        // +1 for the top border.
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    let status = status_line(
        snapshot.is_connected(),
        snapshot.message_count(),
        state.notice.as_ref(),
    );
    frame.render_widget(Paragraph::new(status), chunks[3]);
}

fn render_conversation(
    frame: &mut Frame,
    snapshot: &Snapshot,
    state: &mut TuiState,
    area: ratatui::layout::Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Conversation ");
    let inner = block.inner(area);

    let lines = if snapshot.entries.is_empty() {
        placeholder_lines(snapshot.is_connected(), &snapshot.tools)
    } else {
        render_chat_lines(rendered_tail(&snapshot.entries))
    };

    // line_count() matches ratatui's own wrapping, so the bottom is never hidden.
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total_lines = paragraph.line_count(inner.width);
    let scroll = scroll_top(total_lines, inner.height, &mut state.scroll_offset);

    frame.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}

/// Most entries the conversation view renders; older ones remain in the log
/// and are printed by `voicedesk dump`.
pub const MAX_RENDERED_ENTRIES: usize = 1000;

/// The newest entries, at most [`MAX_RENDERED_ENTRIES`].
pub fn rendered_tail(entries: &[LogEntry]) -> &[LogEntry] {
    &entries[entries.len().saturating_sub(MAX_RENDERED_ENTRIES)..]
}

/// First visible row for a view `height` rows tall over `total_lines`.
/// `offset` counts lines scrolled up from the bottom (0 = at bottom) and is
/// clamped so it cannot pass the top of the content.
pub fn scroll_top(total_lines: usize, height: u16, offset: &mut u16) -> u16 {
    let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(height);
    if *offset > max_scroll {
        *offset = max_scroll;
    }
    max_scroll.saturating_sub(*offset)
}
