//! Key-code login screen and the blocking alert popup.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::ui::theme::{ACCENT, ERROR, MUTED, TEXT};
use crate::ui::util::centered;

pub fn draw_login(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    input: &str,
    error: Option<&str>,
    checking: bool,
) {
    let popup = centered(area, 50, 40);
    let mut lines = vec![
        Line::from(Span::styled(
            "🌿 pulsedeck",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if checking {
        lines.push(Line::from(Span::styled(
            "SYNCING...",
            Style::default().fg(ACCENT).add_modifier(Modifier::SLOW_BLINK),
        )));
    } else {
        lines.push(Line::from(Span::styled("KEY CODE", Style::default().fg(MUTED))));
        lines.push(Line::from(Span::styled(
            format!("[ {input:<6} ]"),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter identify · Esc quit",
            Style::default().fg(MUTED),
        )));
    }
    if let Some(e) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(e.to_string(), Style::default().fg(ERROR))));
    }
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

pub fn draw_alert(f: &mut ratatui::Frame<'_>, area: Rect, msg: &str) {
    let popup = centered(area, 60, 25);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(msg.to_string(), Style::default().fg(TEXT))),
            Line::from(""),
            Line::from(Span::styled("press any key", Style::default().fg(MUTED))),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ERROR))
                .title("Alert"),
        ),
        popup,
    );
}
