// src/ui/widgets/detail_popup.rs

use super::{finding_lines, status_color};
use crate::app::{App, DetailModal, DetailState};
use crate::ui::layout::centered_rect;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Renders the scan detail modal. Scrolls with the arrow keys.
pub fn render_detail_popup(frame: &mut Frame, app: &App, detail: &DetailModal, area: Rect) {
    let popup_area = centered_rect(80, 80, area);

    let (title, color, lines) = match &detail.state {
        DetailState::Loading => (
            format!(" {} #{} ", app.t("scanDetails"), detail.scan_id),
            Color::Cyan,
            vec![Line::from(app.t("loading"))],
        ),
        DetailState::Loaded { view, .. } => {
            let label_width = view.info.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
            let mut lines: Vec<Line> = vec![Line::from(app.t("scanInformation").bold()), Line::from("")];
            for (label, value) in &view.info {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{label:<label_width$}  "),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(value.clone()),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(view.findings_heading.clone().bold()));
            lines.push(Line::from(""));

            match &view.empty_text {
                Some(text) => lines.push(Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(Color::DarkGray),
                ))),
                None => {
                    let module = app.t("module");
                    let target = app.t("target");
                    for row in &view.findings {
                        lines.extend(finding_lines(row, &module, &target));
                        lines.push(Line::from(""));
                    }
                }
            }
            (format!(" {} ", view.title), status_color(view.status.kind), lines)
        }
    };

    let block = Block::default()
        .title(title.bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}
