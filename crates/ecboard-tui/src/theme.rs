//! Projector palette: dark background, green for the leading set, orange for
//! the rest.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(12, 14, 20);
pub const C_LIVE: Color = Color::Rgb(92, 214, 130);
pub const C_LOADING: Color = Color::Rgb(240, 190, 90);
pub const C_ERROR: Color = Color::Rgb(235, 87, 87);
pub const C_MUTED: Color = Color::Rgb(78, 82, 98);
pub const C_SEPARATOR: Color = Color::Rgb(36, 40, 54);
pub const C_SECONDARY: Color = Color::Rgb(128, 134, 156);
pub const C_PRIMARY: Color = Color::Rgb(226, 228, 238);
pub const C_PANEL_BORDER: Color = Color::Rgb(48, 52, 68);
pub const C_GOLD: Color = Color::Rgb(255, 196, 40);
/// Card border for the leading set.
pub const C_LEADER: Color = Color::Rgb(46, 139, 87);
/// Card border for the remaining set.
pub const C_TRAILING: Color = Color::Rgb(255, 167, 38);
pub const C_BADGE_BG: Color = Color::Rgb(24, 28, 38);
pub const C_MODE: Color = Color::Rgb(120, 100, 200);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_heading() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}
