use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::registry::CorrelationRegistry;

/// Periodically fail calls whose deadline has passed
///
/// The sweep interval bounds how far past its deadline a call can
/// linger. The registry's compare-and-set resolve keeps this safe to
/// race against the reply listener.
pub(crate) async fn run_timeout_supervisor(
    registry: Arc<CorrelationRegistry>,
    sweep_interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(sweep_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                for id in registry.expire_due(Instant::now()) {
                    tracing::info!(correlation_id = %id, "call timed out");
                }
            }
        }
    }
}
