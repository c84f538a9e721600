//! Agents, cron, commits and system config lists. Rows are drawn in the
//! order the server sent them.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::panels::{AgentRow, CommitRow, CronRow};
use crate::types::SystemConfig;
use crate::ui::theme::{ACCENT, MUTED, TEXT};
use crate::ui::util::{inner, truncate_middle};

fn header(cols: &[&'static str]) -> Row<'static> {
    Row::new(cols.to_vec()).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

fn empty(f: &mut ratatui::Frame<'_>, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(Span::styled(msg.to_string(), Style::default().fg(MUTED))),
        inner(area),
    );
}

pub fn draw_agents(f: &mut ratatui::Frame<'_>, area: Rect, rows: &[AgentRow]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Active Agents ({})", rows.len()));
    if rows.is_empty() {
        f.render_widget(block, area);
        return empty(f, area, "no agents");
    }
    let body = rows.iter().map(|a| {
        Row::new(vec![
            Cell::from(a.name.clone()).style(Style::default().fg(TEXT)),
            Cell::from(format!("PID:{}", a.pid)).style(Style::default().fg(Color::DarkGray)),
        ])
    });
    let table = Table::new(body, [Constraint::Percentage(70), Constraint::Min(10)])
        .header(header(&["Name", "PID"]))
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn draw_cron(f: &mut ratatui::Frame<'_>, area: Rect, rows: &[CronRow]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Cron ({})", rows.len()));
    if rows.is_empty() {
        f.render_widget(block, area);
        return empty(f, area, "no scheduled jobs");
    }
    let body = rows.iter().map(|c| {
        Row::new(vec![
            Cell::from(c.short_id.clone()).style(Style::default().fg(Color::DarkGray)),
            Cell::from(c.name.clone()).style(Style::default().fg(TEXT)),
            Cell::from(c.schedule.clone()).style(Style::default().fg(ACCENT)),
            Cell::from(c.payload_display.clone()),
        ])
    });
    let table = Table::new(
        body,
        [
            Constraint::Length(9),
            Constraint::Percentage(30),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header(&["ID", "Name", "Schedule", "Payload"]))
    .block(block)
    .column_spacing(1);
    f.render_widget(table, area);
}

pub fn draw_commits(f: &mut ratatui::Frame<'_>, area: Rect, branch: &str, rows: &[CommitRow]) {
    let title = if branch.is_empty() {
        "Git History".to_string()
    } else {
        format!("Git History · {branch}")
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    if rows.is_empty() {
        f.render_widget(block, area);
        return empty(f, area, "no commits");
    }
    let width = inner(area).width.saturating_sub(16) as usize;
    let lines: Vec<Line> = rows
        .iter()
        .map(|c| {
            Line::from(vec![
                Span::styled(truncate_middle(&c.msg, width.max(8)), Style::default().fg(TEXT)),
                Span::raw("  "),
                Span::styled(c.date.to_uppercase(), Style::default().fg(MUTED)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn draw_configs(f: &mut ratatui::Frame<'_>, area: Rect, rows: &[SystemConfig]) {
    let block = Block::default().borders(Borders::ALL).title("System Configs");
    if rows.is_empty() {
        f.render_widget(block, area);
        return empty(f, area, "none");
    }
    let body = rows.iter().map(|c| {
        Row::new(vec![
            Cell::from(c.name.clone()).style(Style::default().fg(TEXT)),
            Cell::from(c.path.clone()).style(Style::default().fg(MUTED)),
        ])
    });
    let table = Table::new(body, [Constraint::Percentage(35), Constraint::Min(10)])
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}
