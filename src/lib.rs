// src/lib.rs

//! State synchronization and view-model engine behind the vulnscan
//! terminal dashboard.

rust_i18n::i18n!("locales");

pub mod app;
pub mod config;
pub mod core;
pub mod logging;
pub mod ui;
