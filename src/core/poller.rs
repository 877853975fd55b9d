// src/core/poller.rs

//! Fixed-cadence refresh of the stats snapshot and scan list.
//!
//! Cycles are not serialized: a slow cycle can still be in flight when the
//! next one starts, so responses may arrive out of order. Every cycle is
//! stamped with a sequence number when it is issued and consumers store the
//! results in a [`Versioned`] slot, which refuses anything older than what it
//! already holds.

use crate::core::aggregator::{self, FindingSet};
use crate::core::client::{RemoteError, ScanApi};
use crate::core::models::{Scan, StatsSnapshot};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Default refresh cadence.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

/// Results published by the poller.
#[derive(Debug)]
pub enum PollEvent {
    /// Stats and scan list of one cycle. Either fetch may have failed.
    Refreshed {
        seq: u64,
        stats: Result<StatsSnapshot, RemoteError>,
        scans: Result<Vec<Scan>, RemoteError>,
    },
    /// Findings aggregated from the scan list of cycle `seq`.
    Findings { seq: u64, set: FindingSet },
}

/// A value tagged with the sequence number of the cycle that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    seq: u64,
    value: Option<T>,
}

impl<T> Default for Versioned<T> {
    fn default() -> Self {
        Self { seq: 0, value: None }
    }
}

impl<T> Versioned<T> {
    /// Stores `value` unless a newer cycle already wrote this slot.
    ///
    /// Returns whether the value was accepted.
    pub fn offer(&mut self, seq: u64, value: T) -> bool {
        if seq < self.seq {
            return false;
        }
        self.seq = seq;
        self.value = Some(value);
        true
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Control surface of a running poller.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
    wake: Arc<Notify>,
}

impl PollerHandle {
    /// Starts a cycle now without waiting for the next tick.
    pub fn refresh_now(&self) {
        self.wake.notify_one();
    }

    /// Stops issuing new cycles. Cycles already in flight still report.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the refresh scheduler. The first cycle runs immediately.
pub fn spawn<E>(
    api: Arc<dyn ScanApi>,
    interval: Duration,
    tx: mpsc::UnboundedSender<E>,
) -> PollerHandle
where
    E: From<PollEvent> + Send + 'static,
{
    let wake = Arc::new(Notify::new());
    let seq = Arc::new(AtomicU64::new(0));

    let task = {
        let wake = Arc::clone(&wake);
        tokio::spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "Poller started.");
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = wake.notified() => debug!("Out-of-band refresh requested."),
                }
                if tx.is_closed() {
                    info!("Subscriber gone, poller exiting.");
                    break;
                }

                let cycle = seq.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(seq = cycle, "Issuing refresh cycle.");
                tokio::spawn(run_cycle(Arc::clone(&api), cycle, tx.clone()));
            }
        })
    };

    PollerHandle { task, wake }
}

/// One refresh: stats and scans concurrently, then the findings of the
/// freshly fetched scan list.
pub async fn run_cycle<E>(api: Arc<dyn ScanApi>, seq: u64, tx: mpsc::UnboundedSender<E>)
where
    E: From<PollEvent>,
{
    let (stats, scans) = tokio::join!(api.fetch_stats(), api.fetch_scans());

    if let Err(e) = &stats {
        log_refresh_failure(seq, "stats", e);
    }
    if let Err(e) = &scans {
        log_refresh_failure(seq, "scans", e);
    }

    let to_aggregate = scans.as_ref().ok().cloned();
    if tx.send(PollEvent::Refreshed { seq, stats, scans }.into()).is_err() {
        return;
    }

    if let Some(scans) = to_aggregate {
        let set = aggregator::aggregate(api, &scans).await;
        let _ = tx.send(PollEvent::Findings { seq, set }.into());
    }
}

/// Transient failures are retried by the next tick; anything else points at
/// the service or the configuration.
fn log_refresh_failure(seq: u64, what: &'static str, e: &RemoteError) {
    if e.is_transient() {
        warn!(seq, what, error = %e, "Refresh failed; keeping previous state.");
    } else {
        error!(seq, what, error = %e, "Refresh rejected by the service.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_rejects_strictly_older_cycles() {
        let mut slot = Versioned::default();
        assert!(slot.offer(2, "second"));
        assert!(!slot.offer(1, "first, arrived late"));
        assert_eq!(slot.get(), Some(&"second"));
        assert!(slot.offer(2, "second, again"));
        assert!(slot.offer(5, "fifth"));
        assert_eq!(slot.seq(), 5);
    }

    #[test]
    fn empty_slot_accepts_anything() {
        let mut slot: Versioned<u8> = Versioned::default();
        assert!(slot.get().is_none());
        assert!(slot.offer(0, 1));
    }
}
