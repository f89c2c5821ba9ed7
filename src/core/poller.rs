// src/core/poller.rs
use crate::core::refresher::DashboardRefresher;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Recurring refresh task. The first refresh fires immediately, then one
/// per `every`. Each tick spawns its own refresh, so a slow request never
/// delays the next tick.
pub struct Poller {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// `shutdown` is the sender half of the receiver the refresher was built
    /// with, so stopping the poller also drops pending retries.
    pub fn spawn(refresher: DashboardRefresher, every: Duration, shutdown: watch::Sender<bool>) -> Self {
        let every = every.max(MIN_INTERVAL);
        let mut stop = shutdown.subscribe();

        let handle = tokio::spawn(async move {
            info!("Poller running every {:?}", every);
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        tokio::spawn(refresher.refresh());
                    }
                    _ = stop.wait_for(|s| *s) => break,
                }
            }
            info!("Poller stopped");
        });

        Self { shutdown, handle }
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            error!("Poller task ended abnormally: {}", e);
        }
    }
}
