// src/core/markup.rs

//! HTML rendering of view-models, used by the export action.
//!
//! Every string that originates from the service or from a user (target
//! URLs, finding titles and details, module names) goes through
//! [`escape_html`] before it is embedded.

use crate::core::view_model::{FindingRowVm, ScanDetailVm, ScanRowVm, ViewModels};
use std::fmt::Write;

/// Escapes the five characters that are significant in HTML text and
/// attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn scan_row_html(row: &ScanRowVm) -> String {
    let mut meta = format!("{} &bull; {}", escape_html(&row.profile), escape_html(&row.started));
    if let Some(text) = &row.findings_text {
        let _ = write!(meta, " &bull; {}", escape_html(text));
    }

    let mut html = format!(
        "<div class=\"scan-item\" data-scan-id=\"{}\"><div class=\"scan-info\"><div class=\"scan-url\">{}</div><div class=\"scan-meta\">{}</div>",
        row.id,
        escape_html(&row.url),
        meta,
    );
    if !row.badges.is_empty() {
        html.push_str("<div class=\"severity-badges\">");
        for badge in &row.badges {
            let _ = write!(
                html,
                "<span class=\"mini-badge {}\">{}</span>",
                badge.severity,
                escape_html(&badge.label)
            );
        }
        html.push_str("</div>");
    }
    let _ = write!(
        html,
        "</div><span class=\"scan-badge {}\">{}</span></div>",
        row.status.class,
        escape_html(&row.status_label)
    );
    html
}

pub fn finding_row_html(row: &FindingRowVm) -> String {
    let mut html = format!(
        "<div class=\"risk-item {sev}\"><span class=\"risk-severity {sev}\">{label}</span><div class=\"risk-content\"><div class=\"risk-title\">{title}</div><div class=\"risk-detail\">{detail}</div><div class=\"risk-detail\">{module}",
        sev = row.severity,
        label = escape_html(&row.severity_label),
        title = escape_html(&row.title),
        detail = escape_html(&row.detail),
        module = escape_html(&row.module),
    );
    if let Some((_, url)) = &row.scan {
        let _ = write!(html, " &bull; {}", escape_html(url));
    }
    html.push_str("</div></div></div>");
    html
}

pub fn scan_detail_html(vm: &ScanDetailVm) -> String {
    let mut html = format!("<section class=\"details-section\"><h2>{}</h2>", escape_html(&vm.title));
    html.push_str("<dl>");
    for (label, value) in &vm.info {
        let _ = write!(html, "<dt>{}</dt><dd>{}</dd>", escape_html(label), escape_html(value));
    }
    html.push_str("</dl>");
    let _ = write!(html, "<h3>{}</h3>", escape_html(&vm.findings_heading));
    match &vm.empty_text {
        Some(text) => {
            let _ = write!(html, "<div class=\"empty-state\">{}</div>", escape_html(text));
        }
        None => vm.findings.iter().for_each(|f| html.push_str(&finding_row_html(f))),
    }
    html.push_str("</section>");
    html
}

fn section(html: &mut String, heading: &str, items: Vec<String>, empty: &str) {
    let _ = write!(html, "<section><h2>{}</h2>", escape_html(heading));
    if items.is_empty() {
        let _ = write!(html, "<div class=\"empty-state\">{}</div>", escape_html(empty));
    } else {
        items.iter().for_each(|item| html.push_str(item));
    }
    html.push_str("</section>");
}

/// A standalone HTML document with the stats header, every scan and the
/// currently filtered risks.
pub fn export_document(views: &ViewModels, headings: &ExportHeadings) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<title>{}</title></head><body>", escape_html(&headings.title));

    let _ = write!(html, "<header><p>{}</p><ul class=\"stats-grid\">", escape_html(&views.stats.status_text));
    for counter in &views.stats.counters {
        let _ = write!(
            html,
            "<li class=\"{}\">{}: {}</li>",
            counter.severity,
            escape_html(&counter.label),
            counter.count
        );
    }
    html.push_str("</ul></header>");

    section(
        &mut html,
        &headings.scans,
        views.all_scans.iter().map(scan_row_html).collect(),
        &views.empty_scans,
    );
    section(
        &mut html,
        &headings.risks,
        views.risks.iter().map(finding_row_html).collect(),
        &views.empty_risks,
    );

    html.push_str("</body></html>");
    html
}

/// Localized section titles of an exported document.
#[derive(Debug, Clone)]
pub struct ExportHeadings {
    pub title: String,
    pub scans: String,
    pub risks: String,
}
