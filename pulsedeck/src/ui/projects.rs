//! Project list with git/origin badges.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::types::ProjectInfo;
use crate::ui::theme::{ACCENT, MUTED, TEXT};

pub fn draw_projects(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    projects: &[ProjectInfo],
    selected: usize,
    loading: bool,
) {
    let title = if loading {
        "Projects (loading…)".to_string()
    } else {
        format!("Projects ({})", projects.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(Line::from(Span::styled(
            " Enter open · d download zip · B system backup ",
            Style::default().fg(MUTED),
        )));

    let body = projects.iter().enumerate().map(|(i, p)| {
        let git = if p.has_git {
            Span::styled("GIT", Style::default().fg(ACCENT))
        } else {
            Span::styled("---", Style::default().fg(MUTED))
        };
        let origin = if p.linked_to_origin() {
            Span::styled("ORIGIN", Style::default().fg(Color::Cyan))
        } else {
            Span::styled("local", Style::default().fg(MUTED))
        };
        let row = Row::new(vec![
            Cell::from(p.name.clone()),
            Cell::from(Line::from(git)),
            Cell::from(Line::from(origin)),
        ]);
        if i == selected {
            row.style(
                Style::default()
                    .fg(Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            row.style(Style::default().fg(TEXT))
        }
    });
    let table = Table::new(
        body,
        [Constraint::Min(12), Constraint::Length(5), Constraint::Length(8)],
    )
    .header(
        Row::new(vec!["Name", "Git", "Remote"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(block)
    .column_spacing(1);
    f.render_widget(table, area);
}
