//! CandidateGrid component: the main pane.
//!
//! Shows the candidates of the current view as a grid of cards, or a loading
//! or empty-state message. When the data is the fallback list an error banner
//! sits above the grid.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use ecboard_proto::photos::{initials, PhotoDirectory};
use ecboard_proto::protocol::{CandidateRecord, DashboardStatus, ViewState, VoteBuckets};

use crate::{
    app_state::AppState,
    component::Component,
    theme::{
        style_default, style_heading, style_muted, style_secondary, C_BADGE_BG, C_ERROR,
        C_LEADER, C_LOADING, C_TRAILING,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        text::truncate_to_width,
    },
};

pub const CARD_MIN_WIDTH: u16 = 30;
/// Four content rows plus borders.
pub const CARD_HEIGHT: u16 = 6;

pub struct CandidateGrid;

impl CandidateGrid {
    pub fn new() -> Self {
        Self
    }
}

/// Columns and visible rows of cards that fit in `width` x `height`.
pub fn grid_shape(width: u16, height: u16, count: usize) -> (usize, usize) {
    let cols = (width / CARD_MIN_WIDTH).max(1) as usize;
    let needed_rows = count.div_ceil(cols);
    let fit_rows = (height / CARD_HEIGHT) as usize;
    (cols, needed_rows.min(fit_rows))
}

pub fn view_heading(view: ViewState, count: usize) -> String {
    match view {
        ViewState::Leaders => "🏆 TOP 10 LEADING CANDIDATES".to_string(),
        ViewState::Remaining => format!("TRAILING CANDIDATES - {}", count),
    }
}

/// Title and detail for a view with nothing to show.
pub fn empty_message(view: ViewState) -> (&'static str, &'static str) {
    match view {
        ViewState::Leaders => ("No candidates found", "No candidate data available"),
        ViewState::Remaining => (
            "No remaining candidates to display",
            "All candidates are in the top 10!",
        ),
    }
}

pub fn bucket_summary(votes: &VoteBuckets) -> String {
    votes
        .entries()
        .iter()
        .map(|(label, n)| format!("{}:{}", label, n))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Badge text: initials, marked when a photo is on file.
pub fn photo_badge(photos: &PhotoDirectory, name: &str) -> String {
    let letters = initials(name).to_uppercase();
    match photos.lookup(name) {
        Some(_) => format!("◉ {}", letters),
        None => letters,
    }
}

pub fn card_lines(candidate: &CandidateRecord, width: usize) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            truncate_to_width(&candidate.name.to_uppercase(), width),
            style_heading(),
        )),
        Line::from(vec![
            Span::styled("Flat ", style_secondary()),
            Span::styled(candidate.flat.clone(), style_default()),
        ]),
        Line::from(vec![
            Span::styled("Count ", style_secondary()),
            Span::styled(candidate.total_count.to_string(), style_default()),
            Span::styled("  Value ", style_secondary()),
            Span::styled(candidate.total_value.to_string(), style_default()),
        ]),
        Line::from(Span::styled(
            truncate_to_width(&bucket_summary(&candidate.votes), width),
            style_muted(),
        )),
    ]
}

fn draw_card(
    frame: &mut Frame,
    area: Rect,
    candidate: &CandidateRecord,
    photos: &PhotoDirectory,
    leading: bool,
) {
    let border = if leading { C_LEADER } else { C_TRAILING };
    let title = format!("#{}", candidate.rank);
    let badge_text = photo_badge(photos, &candidate.name);
    let block = pane_chrome(
        &title,
        border,
        Some(Badge {
            text: &badge_text,
            color: border,
        }),
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(card_lines(candidate, inner.width as usize)),
        inner,
    );
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, detail: &str, color: Style) {
    let top = area.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::raw("")).collect();
    lines.push(Line::from(Span::styled(
        title.to_string(),
        color.add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(detail.to_string(), style_secondary())));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

impl Component for CandidateGrid {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let snap = &state.snapshot;
        let status = snap.status();

        if status == DashboardStatus::Loading && snap.candidates.is_empty() {
            draw_message(
                frame,
                area,
                "⏳ Loading candidate data...",
                "Fetching latest results",
                Style::default().fg(C_LOADING),
            );
            return;
        }

        let mut y = area.y;
        let bottom = area.y + area.height;

        if let DashboardStatus::ErrorWithFallback(err) = &status {
            let banner = Line::from(vec![
                Span::styled(
                    " ✘ Error loading data: ",
                    Style::default().fg(C_ERROR).add_modifier(Modifier::BOLD),
                ),
                Span::styled(err.clone(), Style::default().fg(C_ERROR)),
                Span::styled("  (r to retry)", style_muted()),
            ]);
            frame.render_widget(
                Paragraph::new(banner),
                Rect::new(area.x, y, area.width, 1),
            );
            y += 1;
        }

        let visible = snap.visible();
        let leading = snap.view == ViewState::Leaders;
        let heading_color = if leading { C_LEADER } else { C_TRAILING };
        if y < bottom {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    view_heading(snap.view, visible.len()),
                    Style::default()
                        .fg(heading_color)
                        .bg(C_BADGE_BG)
                        .add_modifier(Modifier::BOLD),
                )))
                .alignment(Alignment::Center),
                Rect::new(area.x, y, area.width, 1),
            );
            y += 1;
        }

        let body = Rect::new(area.x, y, area.width, bottom - y);
        if visible.is_empty() {
            let (title, detail) = empty_message(snap.view);
            draw_message(frame, body, title, detail, style_default());
            return;
        }

        let (cols, rows) = grid_shape(body.width, body.height, visible.len());
        let card_w = body.width / cols as u16;
        let shown = (cols * rows).min(visible.len());
        for (i, candidate) in visible.iter().take(shown).enumerate() {
            let (col, row) = ((i % cols) as u16, (i / cols) as u16);
            let card = Rect::new(
                body.x + col * card_w,
                body.y + row * CARD_HEIGHT,
                card_w,
                CARD_HEIGHT,
            );
            draw_card(frame, card, candidate, &state.photos, leading);
        }

        let hidden = visible.len() - shown;
        let used = rows as u16 * CARD_HEIGHT;
        if hidden > 0 && used < body.height {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("… {} more", hidden),
                    style_muted(),
                ))),
                Rect::new(body.x, body.y + used, body.width, 1),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::test_support::candidate;
    use std::collections::BTreeMap;

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(120, 60, 10), (4, 3));
        assert_eq!(grid_shape(120, 12, 10), (4, 2));
        assert_eq!(grid_shape(20, 60, 3), (1, 3));
        assert_eq!(grid_shape(120, 60, 0), (4, 0));
    }

    #[test]
    fn test_headings() {
        assert_eq!(view_heading(ViewState::Remaining, 5), "TRAILING CANDIDATES - 5");
        assert!(view_heading(ViewState::Leaders, 10).contains("TOP 10"));
        assert_eq!(empty_message(ViewState::Remaining).1, "All candidates are in the top 10!");
    }

    #[test]
    fn test_card_lines() {
        let c = candidate(1, "Vipin Kumar Singh");
        let lines: Vec<String> = card_lines(&c, 40)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(lines[0], "VIPIN KUMAR SINGH");
        assert_eq!(lines[1], "Flat 1725");
        assert_eq!(lines[2], "Count 14  Value 25.41");
        assert_eq!(lines[3], "920:0 1005:0 1165:0 1285:0 1670:14");
    }

    #[test]
    fn test_photo_badge() {
        let mut map = BTreeMap::new();
        map.insert("KAVITA GUPTA".to_string(), "/c/KAVITA_GUPTA.png".to_string());
        let photos = PhotoDirectory::new(map);
        assert_eq!(photo_badge(&photos, "Kavita Gupta"), "◉ KG");
        assert_eq!(photo_badge(&photos, "vipin kumar singh"), "VK");
    }
}
