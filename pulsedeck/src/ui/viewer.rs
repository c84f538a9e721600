//! Full-screen file viewer with pager and translate state.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::theme::{ACCENT, ERROR, MUTED, TEXT};
use crate::viewer::{Body, FileViewer};

pub fn draw_viewer(f: &mut ratatui::Frame<'_>, area: Rect, v: &FileViewer, scroll: u16) {
    let Some(s) = v.session() else { return };
    f.render_widget(Clear, area);

    let mut title = format!("📄 {}", s.path());
    if s.is_translated() {
        title.push_str("  [translated]");
    } else if s.is_translating() {
        title.push_str("  [translating…]");
    }
    let mut hints = String::from(" Esc close ");
    if v.can_translate() {
        hints.push_str("· t translate ");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(title)
        .title_bottom(Line::from(Span::styled(hints, Style::default().fg(MUTED))));

    let pager = v.pager();
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(if pager.is_some() { 1 } else { 0 }),
        ])
        .split(area);

    let style = match s.body() {
        Body::Error(_) => Style::default().fg(ERROR),
        Body::Loading => Style::default().fg(MUTED),
        Body::Content(_) => Style::default().fg(TEXT),
    };
    let text = v.visible_text().unwrap_or_default().to_string();
    f.render_widget(
        Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(block),
        parts[0],
    );

    if let Some(p) = pager {
        let on = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        let off = Style::default().fg(MUTED).add_modifier(Modifier::DIM);
        let line = Line::from(vec![
            Span::styled("◀ PgUp", if p.has_prev { on } else { off }),
            Span::styled(format!("   page {} / {}   ", p.page, p.total), Style::default().fg(TEXT)),
            Span::styled("PgDn ▶", if p.has_next { on } else { off }),
        ]);
        f.render_widget(
            Paragraph::new(line).alignment(ratatui::layout::Alignment::Center),
            parts[1],
        );
    }
}
