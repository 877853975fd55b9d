// src/main.rs

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

use vulnscan_dashboard::app::{App, AppEvent, FormField, Modal, View};
use vulnscan_dashboard::config::{Cli, Settings};
use vulnscan_dashboard::core::client::{HttpScanClient, ScanApi};
use vulnscan_dashboard::core::locale::LocaleResolver;
use vulnscan_dashboard::core::models::Severity;
use vulnscan_dashboard::core::poller;
use vulnscan_dashboard::core::view_model::SeverityFilter;
use vulnscan_dashboard::{logging, ui};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let log_path = logging::initialize_logging()?;
    let settings = Settings::from_cli(Cli::parse())?;
    info!(log = %log_path.display(), api = %settings.api_base, "Starting dashboard.");

    let api: Arc<dyn ScanApi> = Arc::new(HttpScanClient::new(
        settings.api_base.clone(),
        settings.request_timeout,
    )?);

    let mut locale = LocaleResolver::restore(settings.locale_store.clone());
    if let Some(lang) = settings.lang {
        locale.set_locale(lang);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(Arc::clone(&api), locale, tx.clone(), logging::get_data_dir());
    app.attach_poller(poller::spawn(api, settings.poll_interval, tx));

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let outcome = run(&mut terminal, &mut app, &mut rx);

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;

    if let Err(e) = &outcome {
        error!(error = %e, "Dashboard loop failed.");
    }
    info!("Dashboard closed.");
    outcome
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
    }
    Ok(())
}

/// Routes a key press to whatever currently has focus.
fn handle_key(app: &mut App, key: KeyEvent) {
    match app.modal {
        Modal::None => handle_view_input(app, key),
        Modal::NewScan(_) => handle_form_input(app, key),
        Modal::Detail(_) => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.close_modal(),
            KeyCode::Up => app.scroll_detail(false),
            KeyCode::Down => app.scroll_detail(true),
            _ => {}
        },
        Modal::Notice(_) => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                app.close_modal();
            }
        }
    }
}

fn severity_filter_for(c: char) -> Option<SeverityFilter> {
    let filter = match c {
        'a' => SeverityFilter::All,
        'c' => SeverityFilter::Only(Severity::Critical),
        'h' => SeverityFilter::Only(Severity::High),
        'm' => SeverityFilter::Only(Severity::Medium),
        'l' => SeverityFilter::Only(Severity::Low),
        'i' => SeverityFilter::Only(Severity::Info),
        _ => return None,
    };
    Some(filter)
}

fn handle_view_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('1') => app.show_view(View::Dashboard),
        KeyCode::Char('2') => app.show_view(View::Scans),
        KeyCode::Char('3') => app.show_view(View::Risks),
        KeyCode::Tab => app.next_view(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('n') => app.open_new_scan_form(),
        KeyCode::Char('e') => {
            app.export_html();
        }
        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('L') => app.toggle_locale(),
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::SHIFT) => app.toggle_locale(),
        KeyCode::Char(c) if app.view == View::Risks => {
            if let Some(filter) = severity_filter_for(c) {
                app.set_filter(filter);
            }
        }
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_modal(),
        KeyCode::Enter => app.submit_new_scan(),
        _ => {
            let Some(form) = app.form_mut() else { return };
            match key.code {
                KeyCode::Tab => form.focus_next(),
                KeyCode::Left | KeyCode::Right if form.focus == FormField::Profile => form.cycle_profile(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) => form.input_char(c),
                _ => {}
            }
        }
    }
}
