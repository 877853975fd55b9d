// src/ui/widgets/scan_list.rs

use super::{badge_spans, status_color};
use crate::app::App;
use crate::core::view_model::ScanRowVm;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

fn scan_item(row: &ScanRowVm) -> ListItem<'static> {
    let status = Span::styled(
        format!("[{}]", row.status_label),
        Style::default().fg(status_color(row.status.kind)).bold(),
    );
    let head = Line::from(vec![
        Span::styled(format!("#{:<4}", row.id), Style::default().fg(Color::DarkGray)),
        Span::raw(row.url.clone()),
        Span::raw("  "),
        status,
    ]);

    let mut meta = vec![Span::styled(
        format!("      {} · {}", row.profile, row.started),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(findings) = &row.findings_text {
        meta.push(Span::styled(format!(" · {findings}"), Style::default().fg(Color::DarkGray)));
    }
    meta.extend(badge_spans(&row.badges));

    ListItem::new(vec![head, Line::from(meta)])
}

/// Renders `rows` as a selectable list, or `empty` when there are none.
pub fn render_scan_rows(
    frame: &mut Frame,
    rows: &[ScanRowVm],
    state: &mut ListState,
    block: Block,
    empty: &str,
    area: Rect,
) {
    if rows.is_empty() {
        let p = Paragraph::new(empty.to_string())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(p, area);
        return;
    }

    let items: Vec<ListItem> = rows.iter().map(scan_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, state);
}

/// The scans view: every scan, newest first.
pub fn render_all_scans(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(app.t("allScans"));
    let empty = app.views.empty_scans.clone();
    let App { views, list_state, .. } = app;
    render_scan_rows(frame, &views.all_scans, list_state, block, &empty, area);
}
