//! Dashboard state transitions driven through `App`

mod common;

use common::{MockScanApi, finding, scan};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use vulnscan_dashboard::app::{App, AppEvent, DetailState, FormField, Modal, View};
use vulnscan_dashboard::core::locale::{Lang, LocaleResolver};
use vulnscan_dashboard::core::aggregator::FindingSet;
use vulnscan_dashboard::core::models::{
    AnnotatedFinding, CreatedScan, Profile, ScanDetail, ScanStatus, Severity, StatsSnapshot,
};
use vulnscan_dashboard::core::view_model::SeverityFilter;
use vulnscan_dashboard::core::poller::PollEvent;

fn create_app(
    api: Arc<MockScanApi>,
    lang: Lang,
    export_dir: &std::path::Path,
) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::new(api, LocaleResolver::in_memory(lang), tx, export_dir.to_path_buf());
    (app, rx)
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> AppEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within five seconds")
        .expect("sender alive")
}

fn refreshed(seq: u64, in_progress: u64, scans: Vec<vulnscan_dashboard::core::models::Scan>) -> AppEvent {
    AppEvent::Poll(PollEvent::Refreshed {
        seq,
        stats: Ok(StatsSnapshot { in_progress, ..Default::default() }),
        scans: Ok(scans),
    })
}

#[tokio::test]
async fn test_blank_url_shows_notice_without_request() {
    let dir = tempfile::tempdir().unwrap();
    let api = MockScanApi::new().into_arc();
    let (mut app, mut rx) = create_app(api.clone(), Lang::En, dir.path());

    app.open_new_scan_form();
    app.form_mut().unwrap().url = "   ".into();
    app.submit_new_scan();

    match &app.modal {
        Modal::Notice(notice) => assert!(notice.is_error),
        other => panic!("expected an error notice, got {other:?}"),
    }
    tokio::task::yield_now().await;
    assert!(api.created.lock().await.is_empty());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_submitted_scan_reports_back() {
    let dir = tempfile::tempdir().unwrap();
    let api = MockScanApi::new().into_arc();
    let (mut app, mut rx) = create_app(api.clone(), Lang::En, dir.path());

    app.open_new_scan_form();
    app.form_mut().unwrap().url = "https://t.test".into();
    app.submit_new_scan();
    assert!(matches!(app.modal, Modal::None));

    let event = next_event(&mut rx).await;
    assert!(matches!(event, AppEvent::ScanCreated(Ok(_))));
    app.handle_event(event);

    match &app.modal {
        Modal::Notice(notice) => assert!(!notice.is_error),
        other => panic!("expected a success notice, got {other:?}"),
    }
    assert_eq!(api.created.lock().await[0].url, "https://t.test");
}

#[tokio::test]
async fn test_stale_poll_results_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::En, dir.path());

    app.handle_event(refreshed(2, 0, vec![scan(1, ScanStatus::Completed, Some(10)), scan(2, ScanStatus::Running, None)]));
    app.handle_event(refreshed(1, 5, vec![scan(1, ScanStatus::Running, None)]));

    assert_eq!(app.scans().len(), 2);
    assert_eq!(app.stats().map(|s| s.in_progress), Some(0));
    assert_eq!(app.views.all_scans.len(), 2);
    assert_eq!(app.views.all_scans[0].id, 2);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::En, dir.path());

    app.handle_event(refreshed(1, 1, vec![scan(1, ScanStatus::Running, None)]));
    app.handle_event(AppEvent::Poll(PollEvent::Refreshed {
        seq: 2,
        stats: Err(vulnscan_dashboard::core::client::RemoteError::Validation("down".into())),
        scans: Err(vulnscan_dashboard::core::client::RemoteError::Validation("down".into())),
    }));

    assert_eq!(app.scans().len(), 1);
    assert_eq!(app.stats().map(|s| s.in_progress), Some(1));
}

#[tokio::test]
async fn test_language_switch_rebuilds_every_view() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::Ru, dir.path());
    app.handle_event(refreshed(1, 2, vec![scan(1, ScanStatus::Completed, Some(10))]));

    let before = app.views.clone();
    app.toggle_locale();

    assert_eq!(app.lang(), Lang::En);
    assert_eq!(app.views.lang, Lang::En);
    assert_ne!(app.views.stats.status_text, before.stats.status_text);
    assert_eq!(app.views.stats.status_text, "2 scans in progress");
    assert_eq!(app.views.all_scans[0].status_label, "Completed");
    assert_ne!(app.views.empty_risks, before.empty_risks);
    assert_eq!(app.t("scans"), "Scans");
}

#[tokio::test]
async fn test_detail_from_abandoned_session_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let api = MockScanApi::new()
        .with_scan(scan(1, ScanStatus::Completed, Some(10)), Some(vec![finding("one", Severity::Low)]))
        .with_scan(scan(2, ScanStatus::Completed, Some(20)), Some(vec![finding("two", Severity::High)]))
        .into_arc();
    let (mut app, mut rx) = create_app(api.clone(), Lang::En, dir.path());

    app.open_detail(1);
    let abandoned = match &app.modal {
        Modal::Detail(detail) => detail.session,
        other => panic!("expected detail modal, got {other:?}"),
    };
    app.close_modal();
    app.open_detail(2);

    let stale = ScanDetail { scan: api.scans[0].clone(), findings: vec![finding("one", Severity::Low)] };
    app.handle_event(AppEvent::DetailLoaded { session: abandoned, result: Ok(stale) });
    match &app.modal {
        Modal::Detail(detail) => {
            assert_eq!(detail.scan_id, 2);
            assert!(matches!(detail.state, DetailState::Loading));
        }
        other => panic!("expected detail modal, got {other:?}"),
    }

    loop {
        let event = next_event(&mut rx).await;
        app.handle_event(event);
        if let Modal::Detail(detail) = &app.modal {
            if let DetailState::Loaded { view, .. } = &detail.state {
                assert_eq!(view.scan_id, 2);
                assert_eq!(view.findings[0].title, "two");
                break;
            }
        }
    }
}

#[tokio::test]
async fn test_view_switch_closes_modal_and_resets_selection() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::En, dir.path());
    app.handle_event(refreshed(1, 0, vec![scan(1, ScanStatus::Completed, Some(10)), scan(2, ScanStatus::Completed, Some(20))]));

    app.show_view(View::Scans);
    app.select_next();
    app.select_next();
    assert_eq!(app.selected_scan_id(), Some(1));

    app.open_new_scan_form();
    app.show_view(View::Risks);
    assert!(matches!(app.modal, Modal::None));
    assert_eq!(app.list_state.selected(), None);
}

#[tokio::test]
async fn test_delete_selected_scan() {
    let dir = tempfile::tempdir().unwrap();
    let api = MockScanApi::new().into_arc();
    let (mut app, mut rx) = create_app(api.clone(), Lang::En, dir.path());
    app.handle_event(refreshed(1, 0, vec![scan(4, ScanStatus::Error, None)]));

    app.show_view(View::Scans);
    app.select_next();
    app.delete_selected();

    let event = next_event(&mut rx).await;
    assert!(matches!(event, AppEvent::ScanDeleted { id: 4, result: Ok(()) }));
    app.handle_event(event);
    assert_eq!(*api.deleted.lock().await, [4u64]);
}

#[tokio::test]
async fn test_export_writes_escaped_report() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::En, dir.path());
    let mut hostile = scan(1, ScanStatus::Completed, Some(10));
    hostile.url = "https://t.test/<script>alert(1)</script>".into();
    app.handle_event(refreshed(1, 0, vec![hostile]));

    let path = app.export_html().expect("report written");
    let html = std::fs::read_to_string(&path).unwrap();

    assert!(path.starts_with(dir.path()));
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(matches!(&app.modal, Modal::Notice(n) if !n.is_error));
}

#[tokio::test]
async fn test_blank_url_keeps_form_behind_notice() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::En, dir.path());

    app.open_new_scan_form();
    {
        let form = app.form_mut().unwrap();
        while form.profile() != Profile::Custom {
            form.cycle_profile();
        }
        form.modules = "xss,cors".into();
        form.max_rps = "12".into();
        form.evasion = true;
        form.focus = FormField::Modules;
    }
    app.submit_new_scan();
    assert!(matches!(&app.modal, Modal::Notice(n) if n.is_error));

    app.close_modal();
    let form = app.form_mut().expect("form restored after the notice");
    assert_eq!(form.profile(), Profile::Custom);
    assert_eq!(form.modules, "xss,cors");
    assert_eq!(form.max_rps, "12");
    assert!(form.evasion);
    assert_eq!(form.focus, FormField::Modules);
}

#[tokio::test]
async fn test_late_acknowledgement_waits_for_open_form() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::En, dir.path());

    app.open_new_scan_form();
    app.form_mut().unwrap().url = "https://second.test".into();
    app.handle_event(AppEvent::ScanCreated(Ok(CreatedScan {
        scan_id: 7,
        status: ScanStatus::Running,
    })));

    assert_eq!(app.form_mut().map(|f| f.url.clone()).as_deref(), Some("https://second.test"));
    assert_eq!(app.pending_notices(), 1);

    app.close_modal();
    assert!(matches!(&app.modal, Modal::Notice(n) if !n.is_error));
    assert_eq!(app.pending_notices(), 0);
    app.close_modal();
    assert!(matches!(app.modal, Modal::None));
}

#[tokio::test]
async fn test_late_acknowledgement_does_not_replace_detail() {
    let dir = tempfile::tempdir().unwrap();
    let api = MockScanApi::new()
        .with_scan(scan(3, ScanStatus::Completed, Some(10)), Some(Vec::new()))
        .into_arc();
    let (mut app, _rx) = create_app(api, Lang::En, dir.path());

    app.open_detail(3);
    app.handle_event(AppEvent::ScanDeleted { id: 9, result: Ok(()) });
    assert!(matches!(&app.modal, Modal::Detail(d) if d.scan_id == 3));

    app.close_modal();
    assert!(matches!(&app.modal, Modal::Notice(n) if n.message.contains("#9")));
}

#[tokio::test]
async fn test_every_filter_renders_exactly_its_severity() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = create_app(MockScanApi::new().into_arc(), Lang::En, dir.path());
    let source = scan(1, ScanStatus::Completed, Some(10));
    let all: Vec<AnnotatedFinding> = [Severity::High, Severity::Low, Severity::High, Severity::Info]
        .into_iter()
        .enumerate()
        .map(|(i, sev)| AnnotatedFinding::new(finding(&format!("f{i}"), sev), &source))
        .collect();
    app.handle_event(AppEvent::Poll(PollEvent::Findings {
        seq: 1,
        set: FindingSet { all: all.clone(), recent_scan: Some(source), failed_scans: Vec::new() },
    }));
    app.show_view(View::Risks);

    for filter in SeverityFilter::CHOICES {
        app.set_filter(filter);
        let first = app.views.risks.clone();
        let expected: Vec<&str> = all
            .iter()
            .filter(|f| filter.matches(f.severity()))
            .map(|f| f.finding.title.as_str())
            .collect();
        let titles: Vec<&str> = first.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, expected, "filter {filter:?}");

        app.set_filter(filter);
        assert_eq!(app.views.risks, first);
    }
    app.set_filter(SeverityFilter::Only(Severity::High));
    assert_eq!(app.views.risks.len(), 2);
}
