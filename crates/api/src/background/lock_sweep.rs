//! Periodic expiration sweep of the lock table.
//!
//! Evicts locks whose resource type lost its policy and locks older than
//! their type's timeout. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use editlock_coordinator::LockCoordinator;
use tokio_util::sync::CancellationToken;

/// Run the lock sweep loop until `cancel` is triggered.
pub async fn run(coordinator: Arc<LockCoordinator>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Lock sweep job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Lock sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                let report = coordinator.expire_locks();
                if report.evicted() > 0 {
                    tracing::info!(
                        scanned = report.scanned,
                        orphaned = report.orphaned,
                        expired = report.expired,
                        "Lock sweep: evicted stale locks"
                    );
                } else {
                    tracing::debug!(scanned = report.scanned, "Lock sweep: nothing to evict");
                }
            }
        }
    }
}
