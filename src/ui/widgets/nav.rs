// src/ui/widgets/nav.rs

use crate::app::{App, View};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};

/// Renders the view switcher.
pub fn render_nav(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!("{} {}", i + 1, app.t(view.key()))))
        .collect();
    let selected = View::ALL.iter().position(|v| *v == app.view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|");

    let lang = Line::from(format!("[{}]", app.lang().code().to_uppercase()))
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray));

    frame.render_widget(tabs, area);
    let lang_area = Rect { x: area.x + 1, y: area.y + 1, width: area.width.saturating_sub(3), height: 1 };
    frame.render_widget(lang, lang_area);
}
