//! Header component: 2-row top bar.
//!
//! Row 1: dashboard title, data status badge.
//! Row 2: view tabs and the countdown to the next rotation.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use ecboard_proto::protocol::{DashboardStatus, ViewState};

use crate::{
    app_state::AppState,
    component::Component,
    theme::{C_ERROR, C_GOLD, C_LIVE, C_LOADING, C_MUTED, C_PRIMARY, C_SECONDARY},
};

pub const TITLE: &str = "🏆 EC Results Live Dashboard 2025-2026";

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }
}

fn status_badge(status: &DashboardStatus) -> Span<'static> {
    let (text, color) = match status {
        DashboardStatus::Live => ("LIVE", C_LIVE),
        DashboardStatus::Loading => ("LOADING", C_LOADING),
        DashboardStatus::ErrorWithFallback(_) => ("OFFLINE", C_ERROR),
    };
    Span::styled(
        format!(" {} ", text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn view_tab(key: char, view: ViewState, active: ViewState) -> Span<'static> {
    let style = if view == active {
        Style::default().fg(C_GOLD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_MUTED)
    };
    Span::styled(format!(" [{}] {} ", key, view.label()), style)
}

pub fn countdown_text(secs: u64) -> String {
    format!("next switch in {}s", secs)
}

fn build_row1(state: &AppState) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {} ", TITLE),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        status_badge(&state.snapshot.status()),
    ])
}

fn build_row2(state: &AppState) -> Line<'static> {
    let snap = &state.snapshot;
    Line::from(vec![
        view_tab('1', ViewState::Leaders, snap.view),
        view_tab('2', ViewState::Remaining, snap.view),
        Span::styled("│ ", Style::default().fg(C_MUTED)),
        Span::styled(
            countdown_text(snap.countdown_secs),
            Style::default().fg(C_SECONDARY),
        ),
    ])
}

impl Component for Header {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height < 2 {
            frame.render_widget(Paragraph::new(build_row1(state)), area);
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        frame.render_widget(Paragraph::new(build_row1(state)), rows[0]);
        frame.render_widget(Paragraph::new(build_row2(state)), rows[1]);
    }
}
