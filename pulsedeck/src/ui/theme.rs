//! Shared UI theme constants.

use ratatui::style::Color;

// Scrollbar colors
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);

pub const ACCENT: Color = Color::Rgb(52, 211, 153);
pub const MUTED: Color = Color::Rgb(100, 116, 139);
pub const TEXT: Color = Color::Rgb(226, 232, 240);
pub const DIR: Color = Color::Rgb(52, 211, 153);
pub const ERROR: Color = Color::Rgb(248, 113, 113);

/// Green under 70, yellow under 90, red above.
pub fn load_color(pct: u16) -> Color {
    if pct < 70 {
        Color::Green
    } else if pct < 90 {
        Color::Yellow
    } else {
        Color::Red
    }
}
