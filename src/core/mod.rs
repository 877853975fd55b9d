// src/core/mod.rs

/// Scan, finding and stats entities as the service serializes them.
pub mod models;

/// Typed access to the service's JSON API and the error taxonomy.
pub mod client;

/// Periodic refresh and the sequence-stamped slots that absorb
/// out-of-order responses.
pub mod poller;

/// Merges the findings of all completed scans.
pub mod aggregator;

/// String tables and the persisted language preference.
pub mod locale;

/// Pure projection of raw entities into renderable structures.
pub mod view_model;

/// HTML rendering of view-models for exports.
pub mod markup;
