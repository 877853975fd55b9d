// src/app.rs

use crate::core::aggregator::FindingSet;
use crate::core::client::{RemoteError, ScanApi, validate_new_scan};
use crate::core::locale::{Lang, LocaleResolver};
use crate::core::markup::{self, ExportHeadings};
use crate::core::models::{
    CreatedScan, DEFAULT_MAX_RPS, NewScanRequest, Profile, Scan, ScanDetail, StatsSnapshot,
};
use crate::core::poller::{PollEvent, PollerHandle, Versioned};
use crate::core::view_model::{self, ScanDetailVm, SeverityFilter, ViewInputs, ViewModels};
use ratatui::widgets::ListState;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// The three top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Scans,
    Risks,
}

impl View {
    pub const ALL: [View; 3] = [View::Dashboard, View::Scans, View::Risks];

    pub fn key(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Scans => "scans",
            View::Risks => "risks",
        }
    }

    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::Scans,
            View::Scans => View::Risks,
            View::Risks => View::Dashboard,
        }
    }
}

/// Results of background work, delivered to the main loop.
#[derive(Debug)]
pub enum AppEvent {
    Poll(PollEvent),
    DetailLoaded {
        session: u64,
        result: Result<ScanDetail, RemoteError>,
    },
    ScanCreated(Result<CreatedScan, RemoteError>),
    ScanDeleted {
        id: u64,
        result: Result<(), RemoteError>,
    },
}

impl From<PollEvent> for AppEvent {
    fn from(event: PollEvent) -> Self {
        AppEvent::Poll(event)
    }
}

// --- New-scan form ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Url,
    Profile,
    Modules,
    MaxRps,
    Evasion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScanForm {
    pub url: String,
    pub profile_index: usize,
    pub modules: String,
    pub max_rps: String,
    pub evasion: bool,
    pub focus: FormField,
}

impl Default for NewScanForm {
    fn default() -> Self {
        Self {
            url: String::new(),
            profile_index: 0,
            modules: String::new(),
            max_rps: DEFAULT_MAX_RPS.to_string(),
            evasion: false,
            focus: FormField::Url,
        }
    }
}

impl NewScanForm {
    pub fn profile(&self) -> Profile {
        Profile::PRESETS[self.profile_index % Profile::PRESETS.len()].clone()
    }

    pub fn is_custom(&self) -> bool {
        self.profile() == Profile::Custom
    }

    /// Moves focus forward; the module list is skipped unless the profile is
    /// `custom`.
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::Url => FormField::Profile,
            FormField::Profile if self.is_custom() => FormField::Modules,
            FormField::Profile | FormField::Modules => FormField::MaxRps,
            FormField::MaxRps => FormField::Evasion,
            FormField::Evasion => FormField::Url,
        };
    }

    pub fn cycle_profile(&mut self) {
        self.profile_index = (self.profile_index + 1) % Profile::PRESETS.len();
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            FormField::Url => self.url.push(c),
            FormField::Modules => self.modules.push(c),
            FormField::MaxRps if c.is_ascii_digit() => self.max_rps.push(c),
            FormField::Profile if c == ' ' => self.cycle_profile(),
            FormField::Evasion if c == ' ' => self.evasion = !self.evasion,
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Url => {
                self.url.pop();
            }
            FormField::Modules => {
                self.modules.pop();
            }
            FormField::MaxRps => {
                self.max_rps.pop();
            }
            _ => {}
        }
    }

    pub fn to_request(&self) -> NewScanRequest {
        NewScanRequest {
            url: self.url.trim().to_string(),
            profile: self.profile(),
            modules: if self.is_custom() { self.modules.trim().to_string() } else { String::new() },
            max_rps: self.max_rps.parse().unwrap_or(DEFAULT_MAX_RPS),
            evasion: self.evasion,
        }
    }
}

// --- Modals ---

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded { raw: ScanDetail, view: ScanDetailVm },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailModal {
    pub session: u64,
    pub scan_id: u64,
    pub state: DetailState,
    pub scroll: u16,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Modal {
    #[default]
    None,
    Detail(DetailModal),
    NewScan(NewScanForm),
    Notice(Notice),
}

// --- Application state ---

/// Sole owner of all dashboard state. Mutated only through the action
/// handlers below and `handle_event`.
pub struct App {
    pub should_quit: bool,
    pub view: View,
    pub filter: SeverityFilter,
    pub modal: Modal,
    pub list_state: ListState,
    pub views: ViewModels,
    locale: LocaleResolver,
    stats: Versioned<StatsSnapshot>,
    scans: Versioned<Vec<Scan>>,
    findings: Versioned<FindingSet>,
    api: Arc<dyn ScanApi>,
    tx: UnboundedSender<AppEvent>,
    poller: Option<PollerHandle>,
    detail_session: u64,
    detail_task: Option<AbortHandle>,
    /// Notices that arrived while another modal was open.
    pending_notices: VecDeque<Notice>,
    /// Form refused by local validation, reopened once its notice closes.
    suspended_form: Option<NewScanForm>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(
        api: Arc<dyn ScanApi>,
        locale: LocaleResolver,
        tx: UnboundedSender<AppEvent>,
        export_dir: PathBuf,
    ) -> Self {
        let filter = SeverityFilter::All;
        let views = view_model::build(ViewInputs {
            stats: None,
            scans: &[],
            findings: None,
            filter,
            lang: locale.lang(),
        });
        Self {
            should_quit: false,
            view: View::Dashboard,
            filter,
            modal: Modal::None,
            list_state: ListState::default(),
            views,
            locale,
            stats: Versioned::default(),
            scans: Versioned::default(),
            findings: Versioned::default(),
            api,
            tx,
            poller: None,
            detail_session: 0,
            detail_task: None,
            pending_notices: VecDeque::new(),
            suspended_form: None,
            export_dir,
        }
    }

    pub fn attach_poller(&mut self, poller: PollerHandle) {
        self.poller = Some(poller);
    }

    pub fn lang(&self) -> Lang {
        self.locale.lang()
    }

    pub fn t(&self, key: &str) -> String {
        self.locale.resolve(key)
    }

    pub fn scans(&self) -> &[Scan] {
        self.scans.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stats(&self) -> Option<&StatsSnapshot> {
        self.stats.get()
    }

    pub fn findings(&self) -> Option<&FindingSet> {
        self.findings.get()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
        self.cancel_detail();
        if let Some(poller) = &self.poller {
            poller.stop();
        }
    }

    fn request_refresh(&self) {
        if let Some(poller) = &self.poller {
            poller.refresh_now();
        }
    }

    /// Recomputes every view-model from the current inputs.
    pub fn rebuild_views(&mut self) {
        let lang = self.locale.lang();
        self.views = view_model::build(ViewInputs {
            stats: self.stats.get(),
            scans: self.scans.get().map(Vec::as_slice).unwrap_or(&[]),
            findings: self.findings.get(),
            filter: self.filter,
            lang,
        });
        if let Modal::Detail(DetailModal { state: DetailState::Loaded { raw, view }, .. }) = &mut self.modal {
            *view = view_model::scan_detail(raw, lang);
        }
        self.clamp_selection();
    }

    // --- Navigation ---

    pub fn show_view(&mut self, view: View) {
        if self.view != view {
            debug!(?view, "Switching view.");
            self.view = view;
            self.list_state.select(None);
        }
        self.close_modal();
    }

    pub fn next_view(&mut self) {
        self.show_view(self.view.next());
    }

    /// Number of selectable rows in the active view.
    pub fn row_count(&self) -> usize {
        match self.view {
            View::Dashboard => self.views.recent_scans.len(),
            View::Scans => self.views.all_scans.len(),
            View::Risks => self.views.risks.len(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.row_count();
        match self.list_state.selected() {
            Some(_) if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn select_next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let next = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(prev));
    }

    /// Scan behind the selected row. In the risks view this is the scan the
    /// selected finding came from.
    pub fn selected_scan_id(&self) -> Option<u64> {
        let index = self.list_state.selected()?;
        match self.view {
            View::Dashboard => self.views.recent_scans.get(index).map(|r| r.id),
            View::Scans => self.views.all_scans.get(index).map(|r| r.id),
            View::Risks => self.views.risks.get(index).and_then(|r| r.scan.as_ref().map(|(id, _)| *id)),
        }
    }

    // --- Filter & language ---

    pub fn set_filter(&mut self, filter: SeverityFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.list_state.select(None);
            self.rebuild_views();
        }
    }

    /// Switches and persists the language, then rebuilds every view.
    pub fn set_locale(&mut self, lang: Lang) {
        self.locale.set_locale(lang);
        self.rebuild_views();
        self.request_refresh();
    }

    pub fn toggle_locale(&mut self) {
        self.set_locale(self.lang().toggled());
    }

    // --- Scan detail ---

    /// Opens the detail modal for `scan_id` and starts fetching it in a new
    /// view session.
    pub fn open_detail(&mut self, scan_id: u64) {
        self.discard_modal();
        self.detail_session += 1;
        let session = self.detail_session;
        self.modal = Modal::Detail(DetailModal {
            session,
            scan_id,
            state: DetailState::Loading,
            scroll: 0,
        });

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = api.fetch_scan_detail(scan_id).await;
            let _ = tx.send(AppEvent::DetailLoaded { session, result });
        });
        self.detail_task = Some(handle.abort_handle());
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_scan_id() {
            self.open_detail(id);
        }
    }

    /// Abandons the current detail session; a late response is dropped.
    fn cancel_detail(&mut self) {
        if let Some(task) = self.detail_task.take() {
            task.abort();
        }
        self.detail_session += 1;
    }

    /// Closes the open modal. A notice refusing a form gives the form back;
    /// otherwise the next queued notice, if any, takes its place.
    pub fn close_modal(&mut self) {
        let closed = self.discard_modal();
        if matches!(closed, Modal::Notice(_)) {
            if let Some(form) = self.suspended_form.take() {
                self.modal = Modal::NewScan(form);
                return;
            }
        }
        self.show_next_notice();
    }

    fn show_next_notice(&mut self) {
        if matches!(self.modal, Modal::None) {
            if let Some(notice) = self.pending_notices.pop_front() {
                self.modal = Modal::Notice(notice);
            }
        }
    }

    fn discard_modal(&mut self) -> Modal {
        if matches!(self.modal, Modal::Detail(_)) {
            self.cancel_detail();
        }
        std::mem::take(&mut self.modal)
    }

    pub fn pending_notices(&self) -> usize {
        self.pending_notices.len()
    }

    pub fn scroll_detail(&mut self, down: bool) {
        if let Modal::Detail(detail) = &mut self.modal {
            detail.scroll = if down {
                detail.scroll.saturating_add(1)
            } else {
                detail.scroll.saturating_sub(1)
            };
        }
    }

    // --- New scan ---

    pub fn open_new_scan_form(&mut self) {
        self.discard_modal();
        self.suspended_form = None;
        self.modal = Modal::NewScan(NewScanForm::default());
    }

    pub fn form_mut(&mut self) -> Option<&mut NewScanForm> {
        match &mut self.modal {
            Modal::NewScan(form) => Some(form),
            _ => None,
        }
    }

    /// Submits the open form. A blank URL is refused locally without any
    /// request being made.
    pub fn submit_new_scan(&mut self) {
        let Modal::NewScan(form) = std::mem::take(&mut self.modal) else { return };
        let request = form.to_request();

        if let Err(e) = validate_new_scan(&request) {
            info!(error = %e, "New scan refused locally.");
            self.suspended_form = Some(form);
            self.notify(self.t("urlRequired"), true);
            return;
        }

        self.show_next_notice();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.create_scan(&request).await;
            let _ = tx.send(AppEvent::ScanCreated(result));
        });
    }

    pub fn delete_selected(&mut self) {
        if self.view == View::Risks {
            return;
        }
        let Some(id) = self.selected_scan_id() else { return };
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.delete_scan(id).await;
            let _ = tx.send(AppEvent::ScanDeleted { id, result });
        });
    }

    // --- Export ---

    /// Writes the current view-models as an HTML document and returns its
    /// path.
    pub fn export_html(&mut self) -> Option<PathBuf> {
        let headings = ExportHeadings {
            title: format!("vulnscan: {}", self.t("dashboard")),
            scans: self.t("allScans"),
            risks: self.t("allRisks"),
        };
        let document = markup::export_document(&self.views, &headings);
        let name = format!("vulnscan-report-{}.html", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let path = self.export_dir.join(name);

        let written = std::fs::create_dir_all(&self.export_dir)
            .and_then(|_| std::fs::write(&path, document));
        match written {
            Ok(()) => {
                info!(path = %path.display(), "Report exported.");
                self.notify(format!("{} {}", self.t("exportSaved"), path.display()), false);
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "Export failed.");
                self.notify(format!("{}: {e}", self.t("exportFailed")), true);
                None
            }
        }
    }

    /// Shows a notice now if nothing else is open, otherwise queues it.
    fn notify(&mut self, message: String, is_error: bool) {
        let notice = Notice { message, is_error };
        if matches!(self.modal, Modal::None) {
            self.modal = Modal::Notice(notice);
        } else {
            debug!(queued = self.pending_notices.len() + 1, "Modal open; queueing notice.");
            self.pending_notices.push_back(notice);
        }
    }

    // --- Background results ---

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Poll(PollEvent::Refreshed { seq, stats, scans }) => {
                let mut changed = false;
                if let Ok(stats) = stats {
                    changed |= offer_logged(&mut self.stats, "stats", seq, stats);
                }
                if let Ok(scans) = scans {
                    changed |= offer_logged(&mut self.scans, "scans", seq, scans);
                }
                if changed {
                    self.rebuild_views();
                }
            }
            AppEvent::Poll(PollEvent::Findings { seq, set }) => {
                if offer_logged(&mut self.findings, "findings", seq, set) {
                    self.rebuild_views();
                }
            }
            AppEvent::DetailLoaded { session, result } => self.on_detail_loaded(session, result),
            AppEvent::ScanCreated(result) => match result {
                Ok(created) => {
                    info!(scan_id = created.scan_id, "Scan started.");
                    self.notify(self.t("scanStarted"), false);
                    self.request_refresh();
                }
                Err(e) => {
                    let message = format!("{}: {}", self.t("scanStartFailed"), rejection_text(&e));
                    self.notify(message, true);
                }
            },
            AppEvent::ScanDeleted { id, result } => match result {
                Ok(()) => {
                    self.notify(format!("{} #{id}", self.t("scanDeleted")), false);
                    self.request_refresh();
                }
                Err(e) => {
                    let message = format!("{}: {}", self.t("scanDeleteFailed"), rejection_text(&e));
                    self.notify(message, true);
                }
            },
        }
    }

    fn on_detail_loaded(&mut self, session: u64, result: Result<ScanDetail, RemoteError>) {
        let lang = self.lang();
        let current = matches!(&self.modal, Modal::Detail(d) if d.session == session);
        if !current {
            debug!(session, "Discarding detail for an abandoned session.");
            return;
        }
        self.detail_task = None;
        match result {
            Ok(raw) => {
                if let Modal::Detail(detail) = &mut self.modal {
                    let view = view_model::scan_detail(&raw, lang);
                    detail.state = DetailState::Loaded { raw, view };
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to load scan details.");
                self.close_modal();
                self.notify(format!("{}: {}", self.t("detailLoadFailed"), rejection_text(&e)), true);
            }
        }
    }
}

/// Offers `value` to a versioned slot, logging when it is stale.
fn offer_logged<T>(slot: &mut Versioned<T>, what: &'static str, seq: u64, value: T) -> bool {
    let held = slot.seq();
    let accepted = slot.offer(seq, value);
    if !accepted {
        debug!(what, seq, held, "Dropping stale response.");
    }
    accepted
}

/// What a user sees for a failed request: the server's own words for a
/// rejection, the error chain's top line otherwise.
fn rejection_text(error: &RemoteError) -> String {
    match error {
        RemoteError::ServerRejection { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
