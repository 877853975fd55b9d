// src/ui/widgets/dashboard.rs

use super::scan_list::render_scan_rows;
use super::{badge_spans, finding_lines};
use crate::app::App;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Renders the dashboard: recent scans on the left, the latest completed
/// scan's risks on the right.
pub fn render_dashboard(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let scans_block = Block::default().borders(Borders::ALL).title(app.t("recentScans"));
    let empty = app.views.empty_dashboard_scans.clone();
    {
        let App { views, list_state, .. } = &mut *app;
        render_scan_rows(frame, &views.recent_scans, list_state, scans_block, &empty, columns[0]);
    }

    render_recent_risks(frame, app, columns[1]);

    let note = Paragraph::new(app.views.dashboard_note.clone())
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    frame.render_widget(note, rows[1]);
}

fn render_recent_risks(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(app.t("recentRisks"));

    let Some(card) = &app.views.recent_risk else {
        let p = Paragraph::new(app.views.empty_recent_risks.clone())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(p, area);
        return;
    };

    let mut lines = vec![
        Line::from(card.url.clone().bold()),
        Line::from(card.summary.clone()),
        Line::from(badge_spans(&card.badges)),
        Line::from(""),
    ];
    let module = app.t("module");
    let target = app.t("target");
    for row in &app.views.recent_findings {
        lines.extend(finding_lines(row, &module, &target));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(card.hint.clone(), Style::default().fg(Color::DarkGray))));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(p, area);
}
