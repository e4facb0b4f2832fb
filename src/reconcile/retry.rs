//! Periodic create loop for proxies that start after the hook runs.
//!
//! # Design Decisions
//! - Fixed interval, no backoff and no jitter
//! - Runs forever until the shutdown receiver fires
//! - Every iteration re-reads remote state; only the request is shared

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::control_plane::ControlPlane;
use crate::reconcile::reconciler::{ReconcileError, Reconciler};
use crate::route::RouteRequest;

/// Run `create` now and then every `interval` until `shutdown` fires.
///
/// Returns the number of completed attempts. Fatal errors end the loop.
pub async fn run_with_retry<C: ControlPlane>(
    reconciler: &Reconciler<C>,
    request: &RouteRequest,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<u64, ReconcileError> {
    tracing::info!(
        route = request.identity(),
        interval_secs = interval.as_secs(),
        "Route create retry loop starting"
    );

    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    let mut attempts = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let outcome = reconciler.create(request).await?;
                attempts += 1;
                tracing::debug!(route = request.identity(), attempt = attempts, ?outcome, "Create attempt finished");
            }
            _ = shutdown.recv() => {
                tracing::info!(attempts, "Retry loop received shutdown signal, exiting loop");
                break;
            }
        }
    }

    Ok(attempts)
}
