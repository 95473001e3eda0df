//! Status bar: log line and keybindings footer.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use ecboard_proto::protocol::DashboardStatus;

use crate::theme::{C_ERROR, C_LIVE, C_LOADING, C_MODE, C_MUTED, C_SECONDARY, C_SEPARATOR};

/// Dot and color summarising the data status.
pub fn status_dot(status: &DashboardStatus) -> Span<'static> {
    match status {
        DashboardStatus::Live => Span::styled("●", Style::default().fg(C_LIVE)),
        DashboardStatus::Loading => Span::styled("◌", Style::default().fg(C_LOADING)),
        DashboardStatus::ErrorWithFallback(_) => Span::styled("○", Style::default().fg(C_ERROR)),
    }
}

/// Draw the log bar: status dot and last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, status: &DashboardStatus) {
    let log_span = Span::styled(last_log.unwrap_or(""), Style::default().fg(C_SECONDARY));
    let line = Line::from(vec![status_dot(status), Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " PROJECTOR ",
            Style::default().fg(C_MODE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " 1/2 view  Tab toggle view  r refresh  s sidebar  q quit",
            Style::default().fg(C_MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
