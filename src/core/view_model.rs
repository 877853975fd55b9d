// src/core/view_model.rs

//! Pure construction of everything the presentation layer draws.
//!
//! Nothing here knows about the terminal or the network. Every function is a
//! projection of raw entities plus the active filter and language, so the
//! whole stage can be rebuilt from scratch whenever an input changes.

use crate::core::aggregator::FindingSet;
use crate::core::locale::{Lang, resolve_in};
use crate::core::models::{
    AnnotatedFinding, Finding, Scan, ScanDetail, ScanStatus, Severity, SeverityCounts,
    StatsSnapshot, Timestamp,
};
use strum::IntoEnumIterator;

/// Maximum characters of a finding's detail shown in list context.
pub const LIST_DETAIL_LIMIT: usize = 150;
/// Number of scans on the dashboard's "recent scans" card.
pub const DASHBOARD_SCAN_LIMIT: usize = 5;

const LIST_TIME_FORMAT: &str = "%d %b %H:%M";
const DETAIL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// --- Filters ---

/// Severity filter on the risks view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(Severity),
}

impl SeverityFilter {
    /// Filter tabs in display order.
    pub const CHOICES: [SeverityFilter; 6] = [
        SeverityFilter::All,
        SeverityFilter::Only(Severity::Critical),
        SeverityFilter::Only(Severity::High),
        SeverityFilter::Only(Severity::Medium),
        SeverityFilter::Only(Severity::Low),
        SeverityFilter::Only(Severity::Info),
    ];

    pub fn matches(self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Only(wanted) => wanted == severity,
        }
    }

    /// Locale key of the tab label.
    pub fn key(self) -> &'static str {
        match self {
            SeverityFilter::All => "all",
            SeverityFilter::Only(s) => severity_key(s),
        }
    }
}

fn severity_key(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "critical",
        Severity::High => "high",
        Severity::Medium => "medium",
        Severity::Low => "low",
        Severity::Info => "info",
    }
}

/// The findings that pass `filter`, in their original order.
pub fn filter_findings(
    findings: &[AnnotatedFinding],
    filter: SeverityFilter,
) -> Vec<&AnnotatedFinding> {
    findings.iter().filter(|f| filter.matches(f.severity())).collect()
}

// --- Status rendering ---

/// The three ways a scan status is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Running,
    Completed,
    Error,
}

/// Rendering attributes of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub kind: StatusKind,
    /// Class name used in exported markup.
    pub class: &'static str,
    /// Locale key of the badge text.
    pub label_key: &'static str,
}

const RUNNING: StatusStyle = StatusStyle { kind: StatusKind::Running, class: "running", label_key: "running" };
const COMPLETED: StatusStyle = StatusStyle { kind: StatusKind::Completed, class: "completed", label_key: "completedStatus" };
const ERROR: StatusStyle = StatusStyle { kind: StatusKind::Error, class: "error", label_key: "error" };

/// Maps a status onto its badge. Anything that is neither in progress nor
/// completed is drawn as an error.
pub fn status_style(status: ScanStatus) -> StatusStyle {
    match status {
        ScanStatus::Pending | ScanStatus::Running => RUNNING,
        ScanStatus::Completed => COMPLETED,
        ScanStatus::Error | ScanStatus::Unknown => ERROR,
    }
}

// --- Badges ---

/// A per-severity counter badge, e.g. "2C".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub severity: Severity,
    pub count: u64,
    pub label: String,
}

/// Compact badges for every non-zero severity, critical first.
pub fn severity_badges(counts: &SeverityCounts) -> Vec<Badge> {
    counts
        .non_zero()
        .map(|(severity, count)| Badge {
            severity,
            count,
            label: format!("{count}{}", severity.letter()),
        })
        .collect()
}

/// Long-form badges ("2 Critical") for the recent-risks card.
fn long_badges(counts: &SeverityCounts, lang: Lang) -> Vec<Badge> {
    counts
        .non_zero()
        .map(|(severity, count)| Badge {
            severity,
            count,
            label: format!("{count} {}", resolve_in(lang, severity_key(severity))),
        })
        .collect()
}

// --- Text helpers ---

/// First `limit` characters of `text`. No ellipsis is appended.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

fn findings_count_text(count: u64, lang: Lang) -> String {
    let noun = if count == 1 { "finding" } else { "findingsPlural" };
    format!("{count} {}", resolve_in(lang, noun))
}

fn list_time(ts: Option<Timestamp>) -> String {
    ts.map(|t| t.format(LIST_TIME_FORMAT)).unwrap_or_default()
}

fn detail_time(ts: Option<Timestamp>, lang: Lang) -> String {
    ts.map(|t| t.format(DETAIL_TIME_FORMAT))
        .unwrap_or_else(|| resolve_in(lang, "notAvailable"))
}

// --- Scan rows ---

/// One line of a scan list.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRowVm {
    pub id: u64,
    pub url: String,
    pub profile: String,
    pub status: StatusStyle,
    pub status_label: String,
    pub started: String,
    /// "3 findings", only for completed scans.
    pub findings_text: Option<String>,
    pub badges: Vec<Badge>,
}

fn scan_row(scan: &Scan, lang: Lang) -> ScanRowVm {
    let status = status_style(scan.status);
    let completed = scan.is_completed();
    ScanRowVm {
        id: scan.id,
        url: scan.url.clone(),
        profile: scan.profile.to_string(),
        status,
        status_label: resolve_in(lang, status.label_key),
        started: list_time(scan.start_time),
        findings_text: completed.then(|| findings_count_text(scan.total_findings, lang)),
        badges: if completed { severity_badges(&scan.severity_counts) } else { Vec::new() },
    }
}

/// Rows for every scan, newest (highest id) first.
pub fn scan_rows(scans: &[Scan], lang: Lang) -> Vec<ScanRowVm> {
    let mut sorted: Vec<&Scan> = scans.iter().collect();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));
    sorted.into_iter().map(|s| scan_row(s, lang)).collect()
}

// --- Finding rows ---

/// Where a finding is being shown; decides truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingContext {
    List,
    Detail,
}

/// One rendered finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingRowVm {
    pub severity: Severity,
    pub severity_label: String,
    pub title: String,
    pub detail: String,
    pub module: String,
    /// Originating scan, for aggregated lists.
    pub scan: Option<(u64, String)>,
}

fn finding_row(
    finding: &Finding,
    origin: Option<(u64, String)>,
    context: FindingContext,
    lang: Lang,
) -> FindingRowVm {
    let detail = match context {
        FindingContext::List => truncate_chars(&finding.detail, LIST_DETAIL_LIMIT),
        FindingContext::Detail => finding.detail.clone(),
    };
    FindingRowVm {
        severity: finding.severity,
        severity_label: resolve_in(lang, severity_key(finding.severity)),
        title: finding.title.clone(),
        detail,
        module: finding.module.clone(),
        scan: origin,
    }
}

/// Aggregated findings passing `filter`, in list context.
pub fn finding_rows(
    findings: &[AnnotatedFinding],
    filter: SeverityFilter,
    lang: Lang,
) -> Vec<FindingRowVm> {
    annotated_rows(filter_findings(findings, filter), lang)
}

fn annotated_rows<'a>(
    findings: impl IntoIterator<Item = &'a AnnotatedFinding>,
    lang: Lang,
) -> Vec<FindingRowVm> {
    findings
        .into_iter()
        .map(|f| {
            finding_row(
                &f.finding,
                Some((f.scan_id, f.scan_url.clone())),
                FindingContext::List,
                lang,
            )
        })
        .collect()
}

// --- Stats header ---

/// A labelled severity counter on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterVm {
    pub severity: Severity,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsVm {
    pub status_text: String,
    pub counters: Vec<CounterVm>,
    /// "Latest scan ID: 7", when the service reports one.
    pub latest_note: Option<String>,
}

pub fn stats_view(stats: Option<&StatsSnapshot>, lang: Lang) -> StatsVm {
    let fallback = StatsSnapshot::default();
    let stats = stats.unwrap_or(&fallback);

    let status_text = if stats.in_progress > 0 {
        let noun = if stats.in_progress == 1 { "scan" } else { "scansPlural" };
        format!(
            "{} {} {}",
            stats.in_progress,
            resolve_in(lang, noun),
            resolve_in(lang, "inProgress")
        )
    } else if stats.latest_scan_id.is_some() {
        resolve_in(lang, "showingLatest")
    } else {
        resolve_in(lang, "noScansYet")
    };

    StatsVm {
        status_text,
        counters: Severity::iter()
            .map(|severity| CounterVm {
                severity,
                label: resolve_in(lang, severity_key(severity)),
                count: stats.severity_totals.get(severity),
            })
            .collect(),
        latest_note: stats
            .latest_scan_id
            .map(|id| format!("{}: {id}", resolve_in(lang, "latestScanId"))),
    }
}

// --- Recent risks card ---

#[derive(Debug, Clone, PartialEq)]
pub struct RecentRiskVm {
    pub scan_id: u64,
    pub url: String,
    pub summary: String,
    pub badges: Vec<Badge>,
    pub hint: String,
}

fn recent_risk(scan: &Scan, lang: Lang) -> Option<RecentRiskVm> {
    if scan.total_findings == 0 {
        return None;
    }
    Some(RecentRiskVm {
        scan_id: scan.id,
        url: scan.url.clone(),
        summary: format!("{} {}", scan.total_findings, resolve_in(lang, "findingsDetectedLatest")),
        badges: long_badges(&scan.severity_counts, lang),
        hint: resolve_in(lang, "clickToView"),
    })
}

// --- Scan detail ---

#[derive(Debug, Clone, PartialEq)]
pub struct ScanDetailVm {
    pub scan_id: u64,
    pub title: String,
    pub status: StatusStyle,
    /// Label/value pairs of the information section.
    pub info: Vec<(String, String)>,
    pub findings_heading: String,
    pub findings: Vec<FindingRowVm>,
    /// Shown instead of findings when there are none.
    pub empty_text: Option<String>,
}

/// Full view of one scan. Finding details are not truncated here.
pub fn scan_detail(detail: &ScanDetail, lang: Lang) -> ScanDetailVm {
    let scan = &detail.scan;
    let status = status_style(scan.status);
    let label = |key: &str| resolve_in(lang, key);

    let mut info = vec![
        (label("profile"), scan.profile.to_string()),
        (label("status"), label(status.label_key)),
        (label("started"), detail_time(scan.start_time, lang)),
    ];
    if scan.end_time.is_some() {
        info.push((label("completed"), detail_time(scan.end_time, lang)));
    }
    info.push((label("totalFindings"), scan.total_findings.to_string()));
    info.push((label("evasionLabel"), label(if scan.evasion { "on" } else { "off" })));
    info.push((label("modulesUsed"), scan.modules_used.join(", ")));
    if let Some(err) = &scan.error {
        info.push((label("error"), err.clone()));
    }

    let findings: Vec<FindingRowVm> = detail
        .findings
        .iter()
        .map(|f| finding_row(f, None, FindingContext::Detail, lang))
        .collect();

    let empty_text = if !findings.is_empty() {
        None
    } else if status.kind == StatusKind::Running {
        Some(label("scanRunning"))
    } else {
        Some(label("noFindings"))
    };

    ScanDetailVm {
        scan_id: scan.id,
        title: format!("{}: {}", label("scanDetails"), scan.url),
        status,
        info,
        findings_heading: format!("{} ({})", label("findings"), findings.len()),
        findings,
        empty_text,
    }
}

// --- Whole screen ---

/// Everything `build` reads.
#[derive(Debug, Clone, Copy)]
pub struct ViewInputs<'a> {
    pub stats: Option<&'a StatsSnapshot>,
    pub scans: &'a [Scan],
    pub findings: Option<&'a FindingSet>,
    pub filter: SeverityFilter,
    pub lang: Lang,
}

/// A labelled filter tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTabVm {
    pub filter: SeverityFilter,
    pub label: String,
    pub active: bool,
}

/// View-models of all three views, built together so a language switch
/// reaches every view at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModels {
    pub lang: Lang,
    pub stats: StatsVm,
    pub dashboard_note: String,
    pub recent_scans: Vec<ScanRowVm>,
    pub all_scans: Vec<ScanRowVm>,
    pub recent_risk: Option<RecentRiskVm>,
    pub recent_findings: Vec<FindingRowVm>,
    pub risks: Vec<FindingRowVm>,
    pub filter_tabs: Vec<FilterTabVm>,
    pub empty_dashboard_scans: String,
    pub empty_scans: String,
    pub empty_risks: String,
    /// Empty text of the dashboard's recent-risks card; never filtered.
    pub empty_recent_risks: String,
}

pub fn build(inputs: ViewInputs<'_>) -> ViewModels {
    let lang = inputs.lang;
    let all_scans = scan_rows(inputs.scans, lang);
    let recent_scans = all_scans.iter().take(DASHBOARD_SCAN_LIMIT).cloned().collect();

    let (recent_risk, recent_findings, risks) = match inputs.findings {
        Some(set) => (
            set.recent_scan.as_ref().and_then(|s| recent_risk(s, lang)),
            annotated_rows(set.recent(), lang),
            finding_rows(&set.all, inputs.filter, lang),
        ),
        None => (None, Vec::new(), Vec::new()),
    };

    let has_any_findings = inputs.findings.is_some_and(|s| !s.is_empty());
    let empty_risks = if has_any_findings { "noRisksMatch" } else { "noRisksYet" };

    ViewModels {
        lang,
        stats: stats_view(inputs.stats, lang),
        dashboard_note: resolve_in(lang, "dashboardNote"),
        recent_scans,
        all_scans,
        recent_risk,
        recent_findings,
        risks,
        filter_tabs: SeverityFilter::CHOICES
            .iter()
            .map(|&filter| FilterTabVm {
                filter,
                label: resolve_in(lang, filter.key()),
                active: filter == inputs.filter,
            })
            .collect(),
        empty_dashboard_scans: resolve_in(lang, "noScansYetClickNew"),
        empty_scans: resolve_in(lang, "noScansYet"),
        empty_risks: resolve_in(lang, empty_risks),
        empty_recent_risks: resolve_in(lang, "noRisksYet"),
    }
}
