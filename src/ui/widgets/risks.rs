// src/ui/widgets/risks.rs

use super::{finding_lines, severity_color};
use crate::app::App;
use crate::core::view_model::SeverityFilter;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

fn filter_color(filter: SeverityFilter) -> Color {
    match filter {
        SeverityFilter::All => Color::White,
        SeverityFilter::Only(severity) => severity_color(severity),
    }
}

/// The risks view: severity filter tabs above every matching finding.
pub fn render_risks(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let mut tabs = vec![Span::styled(
        format!("{}: ", app.t("filter")),
        Style::default().fg(Color::DarkGray),
    )];
    for tab in &app.views.filter_tabs {
        let style = if tab.active {
            Style::default().fg(Color::Black).bg(filter_color(tab.filter)).bold()
        } else {
            Style::default().fg(filter_color(tab.filter))
        };
        tabs.push(Span::styled(format!(" {} ", tab.label), style));
        tabs.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

    let block = Block::default().borders(Borders::ALL).title(app.t("allRisks"));
    if app.views.risks.is_empty() {
        let p = Paragraph::new(app.views.empty_risks.clone())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(p, chunks[1]);
        return;
    }

    let module = app.t("module");
    let target = app.t("target");
    let items: Vec<ListItem> = app
        .views
        .risks
        .iter()
        .map(|row| ListItem::new(finding_lines(row, &module, &target)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::new().bg(Color::DarkGray));
    frame.render_stateful_widget(list, chunks[1], &mut app.list_state);
}
