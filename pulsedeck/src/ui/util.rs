//! Small UI helpers: human-readable sizes, truncation, icons, scrollbar.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::{SB_ARROW, SB_THUMB, SB_TRACK};

pub fn human(b: u64) -> String {
    const K: f64 = 1024.0;
    let b = b as f64;
    if b < K { return format!("{b:.0}B"); }
    let kb = b / K;
    if kb < K { return format!("{kb:.1}KB"); }
    let mb = kb / K;
    if mb < K { return format!("{mb:.1}MB"); }
    let gb = mb / K;
    format!("{gb:.1}GB")
}

/// Cut to at most `max` chars, ending in "..." when shortened.
pub fn truncate_end(s: &str, max: usize) -> String {
    if s.chars().count() <= max { return s.to_string(); }
    if max <= 3 { return ".".repeat(max); }
    let head: String = s.chars().take(max - 3).collect();
    format!("{head}...")
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let n = s.chars().count();
    if n <= max { return s.to_string(); }
    if max <= 3 { return "...".into(); }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(n - right).collect();
    format!("{head}...{tail}")
}

pub fn file_icon(name: &str, is_dir: bool) -> &'static str {
    if is_dir { return "📁"; }
    let n = name.to_ascii_lowercase();
    if n.ends_with(".md") || n.ends_with(".txt") { "📝" }
    else if n.ends_with(".json") || n.ends_with(".toml") || n.ends_with(".yaml") || n.ends_with(".yml") { "⚙️" }
    else if n.ends_with(".zip") || n.ends_with(".tar") || n.ends_with(".gz") { "📦" }
    else { "📄" }
}

/// Visible window start so `selected` stays on screen.
pub fn scroll_for(selected: usize, viewport: usize) -> usize {
    if viewport == 0 { return 0; }
    selected.saturating_sub(viewport - 1)
}

/// One-column scrollbar: arrows, track, proportional thumb.
pub fn draw_scrollbar(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    total_rows: usize,
    viewport_rows: usize,
    offset: usize,
) {
    if area.height < 3 || total_rows <= viewport_rows { return; }
    let track = (area.height - 2) as usize;
    let total = total_rows.max(1);
    let view = viewport_rows.clamp(1, total);
    let max_off = total.saturating_sub(view);
    let offset = offset.min(max_off);

    let thumb_len = (track * view).div_ceil(total).max(1).min(track);
    let thumb_top = if max_off == 0 {
        0
    } else {
        ((track - thumb_len) * offset + max_off / 2) / max_off
    };

    let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
    lines.push(Line::from(Span::styled("▲", Style::default().fg(SB_ARROW))));
    for i in 0..track {
        if i >= thumb_top && i < thumb_top + thumb_len {
            lines.push(Line::from(Span::styled("█", Style::default().fg(SB_THUMB))));
        } else {
            lines.push(Line::from(Span::styled("│", Style::default().fg(SB_TRACK))));
        }
    }
    lines.push(Line::from(Span::styled("▼", Style::default().fg(SB_ARROW))));
    f.render_widget(Paragraph::new(lines), area);
}

/// Inner rect of a bordered block.
pub fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

/// Centered popup covering `pct_x` x `pct_y` percent of `area`.
pub fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let w = area.width * pct_x / 100;
    let h = area.height * pct_y / 100;
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_char_safe() {
        assert_eq!(truncate_end("привет мир", 7), "прив...");
        assert_eq!(truncate_end("short", 10), "short");
        assert_eq!(truncate_middle("abcdefghij", 7), "ab...ij");
    }

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_for(3, 10), 0);
        assert_eq!(scroll_for(15, 10), 6);
    }
}
