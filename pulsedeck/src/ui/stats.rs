//! CPU / RAM / DISK gauges with uptime and heartbeat line.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::panels::StatsPanel;
use crate::ui::theme::{load_color, MUTED, TEXT};
use crate::ui::util::inner;

pub fn draw_stats(f: &mut ratatui::Frame<'_>, area: Rect, s: &StatsPanel, agents: usize) {
    f.render_widget(Block::default().borders(Borders::ALL).title("System"), area);
    let inner = inner(area);
    if inner.height < 2 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[0]);

    for (slot, (label, text, pct)) in cols.iter().zip([
        ("CPU", &s.cpu, s.cpu_pct),
        ("RAM", &s.ram, s.ram_pct),
        ("DISK", &s.disk, s.disk_pct),
    ]) {
        let g = Gauge::default()
            .percent(pct)
            .label(format!("{label} {}", if text.is_empty() { "0%" } else { text.as_str() }))
            .gauge_style(Style::default().fg(load_color(pct)));
        f.render_widget(g, *slot);
    }

    let uptime = if s.uptime.is_empty() { "--h --m" } else { s.uptime.as_str() };
    let seen = if s.heartbeat_seen.is_empty() { "Never" } else { s.heartbeat_seen.as_str() };
    let line = Line::from(vec![
        Span::styled("Uptime ", Style::default().fg(MUTED)),
        Span::styled(uptime.to_string(), Style::default().fg(TEXT)),
        Span::styled("   Heartbeat ", Style::default().fg(MUTED)),
        Span::styled(format!("Last: {seen}"), Style::default().fg(TEXT)),
        Span::styled("   Agents ", Style::default().fg(MUTED)),
        Span::styled(agents.to_string(), Style::default().fg(TEXT)),
    ]);
    f.render_widget(Paragraph::new(line), rows[1]);
}
