//! Expiry sweep
//!
//! Expired entries are already unreadable; the sweep reclaims their memory
//! so they stop counting against capacity.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that purges expired entries every `interval_secs` seconds.
///
/// Runs until the returned handle is aborted. An interval of 0 is treated
/// as 1 second.
pub fn spawn_expiry_task(cache: MemoryCache, interval_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), "cache expiry sweep started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!(removed, "expired cache entries purged");
            } else {
                debug!("expiry sweep found nothing to purge");
            }
        }
    })
}
