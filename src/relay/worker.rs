//! Sequential relay worker.
//!
//! Admitted events are queued on a bounded channel and a single worker
//! relays them one at a time, to completion, in the order they were
//! enqueued. The gateway dispatches every event on its own task, so the
//! enqueue order only follows arrival order on a best-effort basis: two
//! messages delivered almost together may swap before they reach the queue.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::event::InboundEvent;
use super::pipeline::{RelayPipeline, RelayReport};

/// Counters reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Events taken off the queue.
    pub processed: u64,
    /// Events abandoned because the target could not be resolved.
    pub abandoned: u64,
    /// Events where at least one facet failed.
    pub degraded: u64,
}

/// Relay queued events until every sender has been dropped.
///
/// Each event is processed exactly once; failed facets are never retried.
pub async fn run_worker(
    pipeline: RelayPipeline,
    mut queue: mpsc::Receiver<InboundEvent>,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    while let Some(event) = queue.recv().await {
        stats.processed = stats.processed.saturating_add(1);
        match pipeline.relay(&event).await {
            RelayReport::Abandoned(_) => {
                stats.abandoned = stats.abandoned.saturating_add(1);
            }
            RelayReport::Forwarded(report) if !report.is_clean() => {
                stats.degraded = stats.degraded.saturating_add(1);
                warn!(
                    author = %event.author.name,
                    failures = report.failure_count(),
                    "message relayed with failures"
                );
            }
            RelayReport::Forwarded(_) => {
                debug!(author = %event.author.name, "message relayed");
            }
        }
    }

    info!(
        processed = stats.processed,
        abandoned = stats.abandoned,
        degraded = stats.degraded,
        "relay worker stopped"
    );
    stats
}
