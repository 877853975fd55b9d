// src/ui/widgets/footer.rs

use crate::app::{App, Modal, View};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keys: Vec<String> = match &app.modal {
        Modal::NewScan(_) => vec![app.t("footerForm")],
        Modal::Detail(_) | Modal::Notice(_) => vec![app.t("footerClose")],
        Modal::None => {
            let mut keys = vec![app.t("footerNav")];
            if app.view == View::Risks {
                keys.push(app.t("footerFilter"));
            }
            keys.extend([
                app.t("footerDetail"),
                app.t("footerNew"),
                app.t("footerLang"),
                app.t("footerExport"),
                app.t("footerQuit"),
            ]);
            keys
        }
    };

    let mut spans = Vec::new();
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" · "));
        }
        spans.push(Span::styled(key, Style::new().bold().fg(Color::Yellow)));
    }

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
