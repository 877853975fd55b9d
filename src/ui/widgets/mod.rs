// src/ui/widgets/mod.rs

pub mod dashboard;
pub mod detail_popup;
pub mod footer;
pub mod header;
pub mod nav;
pub mod new_scan_form;
pub mod notice_popup;
pub mod risks;
pub mod scan_list;

use crate::core::models::Severity;
use crate::core::view_model::{Badge, FindingRowVm, StatusKind};
use ratatui::prelude::*;

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::LightRed,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Cyan,
        Severity::Info => Color::Gray,
    }
}

pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Running => Color::Cyan,
        StatusKind::Completed => Color::Green,
        StatusKind::Error => Color::Red,
    }
}

pub fn badge_spans(badges: &[Badge]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(badges.len() * 2);
    for badge in badges {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{}]", badge.label),
            Style::default().fg(severity_color(badge.severity)).bold(),
        ));
    }
    spans
}

/// Three-line rendering of a finding: severity and title, detail, origin.
pub fn finding_lines(row: &FindingRowVm, module_label: &str, target_label: &str) -> Vec<Line<'static>> {
    let color = severity_color(row.severity);
    let mut origin = vec![
        Span::styled(format!("{module_label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(row.module.clone()),
    ];
    if let Some((_, url)) = &row.scan {
        origin.push(Span::styled(format!("  {target_label}: "), Style::default().fg(Color::DarkGray)));
        origin.push(Span::raw(url.clone()));
    }

    vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", row.severity_label), Style::default().fg(color).bold()),
            Span::styled(row.title.clone(), Style::default().fg(color)),
        ]),
        Line::from(format!("    {}", row.detail)),
        Line::from([vec![Span::raw("    ")], origin].concat()),
    ]
}
