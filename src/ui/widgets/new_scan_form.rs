// src/ui/widgets/new_scan_form.rs

use crate::app::{App, FormField, NewScanForm};
use crate::core::models::Profile;
use crate::ui::layout::centered_rect;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

fn field_line(label: String, value: Line<'static>, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![Span::styled(format!("{marker}{label:<16}"), label_style)];
    spans.extend(value.spans);
    Line::from(spans)
}

fn text_value(text: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(format!(" {text} "), style))
}

fn profile_value(form: &NewScanForm) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, profile) in Profile::PRESETS.iter().enumerate() {
        let style = if i == form.profile_index {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", profile.as_str()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Renders the new-scan form. The modules field only shows for the custom
/// profile.
pub fn render_new_scan_form(frame: &mut Frame, app: &App, form: &NewScanForm, area: Rect) {
    let popup_area = centered_rect(70, 50, area);
    let block = Block::default()
        .title(format!(" {} ", app.t("newScan")).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let focus = form.focus;
    let evasion = if form.evasion { app.t("on") } else { app.t("off") };

    let mut lines = vec![
        Line::from(""),
        field_line(app.t("targetUrl"), text_value(&form.url, focus == FormField::Url), focus == FormField::Url),
        Line::from(""),
        field_line(app.t("profile"), profile_value(form), focus == FormField::Profile),
    ];
    if form.is_custom() {
        lines.push(Line::from(""));
        lines.push(field_line(
            app.t("customModules"),
            text_value(&form.modules, focus == FormField::Modules),
            focus == FormField::Modules,
        ));
    }
    lines.push(Line::from(""));
    lines.push(field_line(
        app.t("maxRps"),
        text_value(&form.max_rps, focus == FormField::MaxRps),
        focus == FormField::MaxRps,
    ));
    lines.push(Line::from(""));
    lines.push(field_line(
        app.t("evasionLabel"),
        text_value(&evasion, focus == FormField::Evasion),
        focus == FormField::Evasion,
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  [Enter] {}   {}", app.t("startScan"), app.t("footerForm")),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
