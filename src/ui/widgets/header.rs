// src/ui/widgets/header.rs

use super::severity_color;
use crate::app::App;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the stats header: refresh status and per-severity totals of the
/// latest completed scan.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = &app.views.stats;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" vulnscan · {} ", app.t(app.view.key())).bold());

    let mut status = vec![Span::styled(stats.status_text.clone(), Style::default().fg(Color::Cyan))];
    if let Some(note) = &stats.latest_note {
        status.push(Span::styled(format!("  ({note})"), Style::default().fg(Color::DarkGray)));
    }

    let mut counters = Vec::new();
    for counter in &stats.counters {
        counters.push(Span::styled(
            format!("{}: ", counter.label),
            Style::default().fg(severity_color(counter.severity)),
        ));
        counters.push(Span::styled(format!("{}   ", counter.count), Style::default().bold()));
    }

    let text = Text::from(vec![Line::from(status), Line::from(counters)]);
    frame.render_widget(Paragraph::new(text).block(block), area);
}
