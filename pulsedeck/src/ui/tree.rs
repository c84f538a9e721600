//! File tree pane drawn from a flattened render model.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::tree::{flatten, RenderNode, RowKind};
use crate::ui::theme::{ACCENT, DIR, MUTED, TEXT};
use crate::ui::util::{draw_scrollbar, file_icon, inner, scroll_for};

pub fn draw_tree(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    model: &[RenderNode],
    selected: usize,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .title_bottom(Line::from(Span::styled(
            " Enter open/toggle · + expand all · - collapse all ",
            Style::default().fg(MUTED),
        )));
    f.render_widget(block, area);
    let inner = inner(area);
    if inner.height == 0 || inner.width < 3 {
        return;
    }

    let rows = flatten(model);
    if rows.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("empty", Style::default().fg(MUTED))),
            inner,
        );
        return;
    }
    let viewport = inner.height as usize;
    let offset = scroll_for(selected, viewport);

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport)
        .map(|(i, r)| {
            let (marker, is_dir) = match r.kind {
                RowKind::Dir { expanded: true } => ("▾ ", true),
                RowKind::Dir { expanded: false } => ("▸ ", true),
                RowKind::File { .. } => ("  ", false),
            };
            let mut name_style = if is_dir {
                Style::default().fg(DIR).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT)
            };
            if focused && i == selected {
                name_style = name_style.bg(ACCENT).fg(ratatui::style::Color::Black);
            }
            Line::from(vec![
                Span::raw(" ".repeat(r.indent as usize)),
                Span::styled(marker, Style::default().fg(MUTED)),
                Span::raw(format!("{} ", file_icon(&r.name, is_dir))),
                Span::styled(r.name.clone(), name_style),
            ])
        })
        .collect();
    let content = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    f.render_widget(Paragraph::new(lines), content);

    let sb = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    draw_scrollbar(f, sb, rows.len(), viewport, offset);
}
