// src/ui/mod.rs

use crate::app::{App, Modal, View};
use ratatui::prelude::*;

mod layout;
mod widgets;

pub fn render(app: &mut App, frame: &mut Frame) {
    let layout = layout::create_layout(frame.area());

    widgets::header::render_header(frame, app, layout.header);
    widgets::nav::render_nav(frame, app, layout.tabs);

    match app.view {
        View::Dashboard => widgets::dashboard::render_dashboard(frame, app, layout.body),
        View::Scans => widgets::scan_list::render_all_scans(frame, app, layout.body),
        View::Risks => widgets::risks::render_risks(frame, app, layout.body),
    }

    widgets::footer::render_footer(frame, app, layout.footer);

    // Modals draw last so they sit on top of the active view.
    let area = frame.area();
    match &app.modal {
        Modal::None => {}
        Modal::Detail(detail) => widgets::detail_popup::render_detail_popup(frame, app, detail, area),
        Modal::NewScan(form) => widgets::new_scan_form::render_new_scan_form(frame, app, form, area),
        Modal::Notice(notice) => widgets::notice_popup::render_notice_popup(frame, app, notice, area),
    }
}
