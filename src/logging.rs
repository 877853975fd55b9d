// src/logging.rs

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

lazy_static! {
    /// `VULNSCAN_DASHBOARD_LOGLEVEL`
    pub static ref LOG_ENV: String = format!("{}_LOGLEVEL", env!("CARGO_CRATE_NAME").to_uppercase());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Directory for the log file and exported reports.
pub fn get_data_dir() -> PathBuf {
    ProjectDirs::from("com", "vulnscan", env!("CARGO_PKG_NAME"))
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".data"))
}

/// Filter directives: the dashboard's own variable wins over `RUST_LOG`.
fn filter_directives(own: Option<String>, rust_log: Option<String>) -> String {
    own.or(rust_log)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("{}=info", env!("CARGO_CRATE_NAME")))
}

/// Installs a file-only subscriber and returns the log path.
///
/// The terminal belongs to the dashboard, so nothing is ever written to
/// stdout or stderr. Runs append to the same file.
pub fn initialize_logging() -> Result<PathBuf> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)
        .wrap_err_with(|| format!("creating log directory {}", directory.display()))?;
    let log_path = directory.join(LOG_FILE.as_str());
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("opening log file {}", log_path.display()))?;

    let directives = filter_directives(
        std::env::var(LOG_ENV.as_str()).ok(),
        std::env::var("RUST_LOG").ok(),
    );

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new(directives));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "---- session start ----");
    Ok(log_path)
}
