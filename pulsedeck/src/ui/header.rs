//! Top header: title, view tabs and the next-sync countdown.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::router::Tab;
use crate::scheduler::Countdown;
use crate::ui::theme::{ACCENT, MUTED, TEXT};

pub fn draw_header(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    active: Option<Tab>,
    countdown: Countdown,
    host: &str,
) {
    let mut spans = vec![
        Span::styled("pulsedeck 🌿 ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{host}  "), Style::default().fg(MUTED)),
    ];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let style = if Some(*tab) == active {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(MUTED)
        };
        spans.push(Span::styled(format!("{} {}", i + 1, tab.label()), style));
        spans.push(Span::raw("  "));
    }
    let timer = match countdown {
        Countdown::Live { .. } => Span::styled(
            format!("NEXT: {}s", countdown.label()),
            Style::default().fg(TEXT),
        ),
        Countdown::Disabled => Span::styled(
            format!("NEXT: {}s (auto off)", countdown.label()),
            Style::default().fg(MUTED).add_modifier(Modifier::DIM),
        ),
    };
    spans.push(timer);
    f.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}
