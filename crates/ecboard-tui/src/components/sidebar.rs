//! Sidebar component: connection status, totals, rotation and refresh info.
//!
//! Collapses to a one-column strip with `s`.

use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use ecboard_proto::photos::PhotoDirectory;
use ecboard_proto::protocol::DashboardStatus;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    theme::{style_heading, style_secondary, C_ERROR, C_LIVE, C_LOADING, C_PANEL_BORDER},
    widgets::{
        pane_chrome::{draw_collapsed_pane, pane_chrome},
        text::{ellipsize_chars, truncate_to_width},
    },
};

const EXPANDED_WIDTH: u16 = 36;
const COLLAPSED_WIDTH: u16 = 2;
/// Characters of an error message shown before it is cut.
const ERROR_PREVIEW_CHARS: usize = 50;

pub struct Sidebar {
    pub expanded: bool,
}

impl Sidebar {
    pub fn new() -> Self {
        Self { expanded: true }
    }

    pub fn width(&self) -> u16 {
        if self.expanded {
            EXPANDED_WIDTH
        } else {
            COLLAPSED_WIDTH
        }
    }
}

/// `every 1 minute`, `every 90 seconds`.
pub fn every(period: Duration) -> String {
    let secs = period.as_secs();
    let (n, unit) = if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    if n == 1 {
        format!("every 1 {}", unit)
    } else {
        format!("every {} {}s", n, unit)
    }
}

fn photos_on_file(photos: &PhotoDirectory) -> String {
    if photos.is_empty() {
        "none".to_string()
    } else {
        photos.len().to_string()
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(title.to_string(), style_heading()))
}

fn item(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {}: ", label), style_secondary()),
        Span::raw(value),
    ])
}

pub fn sidebar_lines(state: &AppState, width: usize) -> Vec<Line<'static>> {
    let snap = &state.snapshot;
    let mut lines = vec![section("Data source")];

    match snap.status() {
        DashboardStatus::Loading => lines.push(Line::from(Span::styled(
            "  ⏳ Loading data...",
            Style::default().fg(C_LOADING),
        ))),
        DashboardStatus::ErrorWithFallback(err) => {
            lines.push(Line::from(Span::styled(
                "  ✘ Connection error",
                Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("  {}", ellipsize_chars(&err, ERROR_PREVIEW_CHARS)),
                Style::default().fg(C_ERROR),
            )));
        }
        DashboardStatus::Live => lines.push(Line::from(Span::styled(
            "  ✔ Connected",
            Style::default().fg(C_LIVE),
        ))),
    }
    lines.push(Line::from(Span::styled(
        format!("  {}", truncate_to_width(&state.source_label, width.saturating_sub(2))),
        style_secondary(),
    )));
    lines.push(item("Total candidates", snap.candidates.len().to_string()));
    lines.push(item("Top 10 by value", snap.leading_set().len().to_string()));
    lines.push(item("Remaining by value", snap.remaining_set().len().to_string()));
    lines.push(item("Photos on file", photos_on_file(&state.photos)));
    if let Some(at) = snap.last_refresh {
        lines.push(item("Last updated", at.format("%H:%M:%S").to_string()));
    }

    lines.push(Line::raw(""));
    lines.push(section("View rotation"));
    lines.push(item("Current view", snap.view.label().to_string()));
    lines.push(item("Next switch in", format!("{} seconds", snap.countdown_secs)));
    lines.push(item("Rotates", every(state.rotation_period)));

    lines.push(Line::raw(""));
    lines.push(section("Refresh"));
    lines.push(item("Refresh count", snap.refresh_count.to_string()));
    lines.push(item("Auto-refresh", every(state.refresh_period)));

    lines
}

impl Component for Sidebar {
    fn on_action(&mut self, action: &Action, _state: &AppState) {
        if *action == Action::ToggleSidebar {
            self.expanded = !self.expanded;
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if !self.expanded {
            draw_collapsed_pane(frame, area, "▸");
            return;
        }
        let block = pane_chrome("Configuration", C_PANEL_BORDER, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let lines = sidebar_lines(state, inner.width as usize);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}
