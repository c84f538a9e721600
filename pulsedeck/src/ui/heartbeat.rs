//! Heartbeat task editor and AI usage line.

use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::panels::{AiPanel, HeartbeatEditor};
use crate::ui::theme::{ACCENT, ERROR, MUTED, TEXT};

pub fn draw_heartbeat(f: &mut ratatui::Frame<'_>, area: Rect, ed: &HeartbeatEditor, now: Instant) {
    let border = if ed.is_focused() {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    let hint = if ed.is_focused() {
        "Esc done · Ctrl-S save"
    } else {
        "e edit"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title("Heartbeat Tasks")
        .title_bottom(Line::from(vec![
            Span::styled(format!(" {hint} "), Style::default().fg(MUTED)),
            Span::styled(
                format!("[{}]", ed.save_label(now)),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]));
    let mut text = ed.text().to_string();
    if ed.is_focused() {
        text.push('▏');
    }
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(TEXT))
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

pub fn draw_ai(f: &mut ratatui::Frame<'_>, area: Rect, ai: &AiPanel, tick: u64) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(12)])
        .split(area);

    let color = if ai.error.is_some() && ai.usage.is_none() { ERROR } else { TEXT };
    let mut spans = vec![
        Span::styled("AI ", Style::default().fg(MUTED)),
        Span::styled(ai.label(), Style::default().fg(color)),
    ];
    if let Some(tip) = ai.tooltip() {
        spans.push(Span::styled(format!("  {tip}"), Style::default().fg(MUTED)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), parts[0]);

    // pulse while a live refresh is running
    let trigger = if ai.busy {
        let style = if tick % 12 < 6 {
            Style::default().fg(Color::Black).bg(ACCENT)
        } else {
            Style::default().fg(ACCENT)
        };
        Span::styled(" u LIVE… ", style)
    } else {
        Span::styled(" u LIVE ", Style::default().fg(ACCENT))
    };
    f.render_widget(Paragraph::new(Line::from(trigger)), parts[1]);
}
