//! Background eviction of idle sessions.

use std::time::Duration;
use tictac_session::SessionManager;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Shortest interval the sweeper will tick at.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns a task pruning sessions idle for `ttl`, every `every`, until `shutdown`.
#[instrument(skip(sessions, shutdown))]
pub fn spawn_sweeper(
    sessions: SessionManager,
    ttl: Duration,
    every: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    info!("Starting session sweeper");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    debug!("Session sweeper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let removed = sessions.prune(ttl).await;
                    debug!(removed, "Swept sessions");
                }
            }
        }
    })
}
