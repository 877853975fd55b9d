// src/ui/widgets/notice_popup.rs

use crate::app::{App, Notice};
use crate::ui::layout::centered_rect;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_notice_popup(frame: &mut Frame, app: &App, notice: &Notice, area: Rect) {
    let popup_area = centered_rect(50, 25, area);
    let (title, color) = if notice.is_error {
        (app.t("error"), Color::Red)
    } else {
        (app.t("notice"), Color::Green)
    };

    let block = Block::default()
        .title(format!(" {title} ").bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let text = vec![
        Line::from(""),
        Line::from(notice.message.clone()),
        Line::from(""),
        Line::from(Span::styled(app.t("footerClose"), Style::default().fg(Color::DarkGray))),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}
