// src/core/refresher.rs
use crate::connectors::traits::DashboardApi;
use crate::core::render::{DashboardState, DashboardView};
use crate::types::BackendReply;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};
use tracing::{error, info, warn};

const START_FAILED: &str = "開始交易失敗";
const UNKNOWN_ERROR: &str = "未知錯誤";
const START_UNREACHABLE: &str = "開始交易失敗，請檢查網路連接";
const START_OK: &str = "開始交易成功";

/// How one poll cycle ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Rendered,
    /// Backend said `success: false`. Prior state stays on screen.
    FailedLogical(Option<String>),
    /// No usable reply. A single retry has been scheduled.
    FailedNetwork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Rejected,
    Unreachable,
}

/// Fetches dashboard state, pushes it to the view, and relays start-trading
/// commands. Cheap to clone; every clone talks to the same api and view.
#[derive(Clone)]
pub struct DashboardRefresher {
    api: Arc<dyn DashboardApi>,
    view: Arc<dyn DashboardView>,
    retry_delay: Duration,
    shutdown: watch::Receiver<bool>,
}

impl DashboardRefresher {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        view: Arc<dyn DashboardView>,
        retry_delay: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            api,
            view,
            retry_delay,
            shutdown,
        }
    }

    pub fn api(&self) -> &Arc<dyn DashboardApi> {
        &self.api
    }

    /// One poll cycle. Overlapping calls are not guarded against; whichever
    /// response resolves last is what stays rendered.
    pub fn refresh(&self) -> BoxFuture<'static, PollOutcome> {
        let this = self.clone();
        async move {
            info!("Refreshing dashboard...");
            this.view.set_loading(true);
            let result = this.api.fetch_dashboard().await;
            this.view.set_loading(false);

            match result {
                Ok(BackendReply::Accepted(snapshot)) => {
                    info!(
                        "Dashboard updated ({} currencies)",
                        snapshot.trade_info.len()
                    );
                    this.view.render(&DashboardState::from_snapshot(&snapshot));
                    PollOutcome::Rendered
                }
                Ok(BackendReply::Rejected(reason)) => {
                    error!(
                        "Dashboard update failed: {}",
                        reason.as_deref().unwrap_or(UNKNOWN_ERROR)
                    );
                    PollOutcome::FailedLogical(reason)
                }
                Err(e) => {
                    if e.is_malformed() {
                        error!("Dashboard returned a malformed response: {}", e);
                    } else {
                        error!("Dashboard request failed: {}", e);
                    }
                    this.schedule_retry();
                    PollOutcome::FailedNetwork
                }
            }
        }
        .boxed()
    }

    fn schedule_retry(&self) {
        let deadline = Instant::now() + self.retry_delay;
        let this = self.clone();
        let mut shutdown = self.shutdown.clone();
        warn!("Retrying dashboard refresh in {:?}", self.retry_delay);

        tokio::spawn(async move {
            let due = tokio::select! {
                _ = sleep_until(deadline) => true,
                _ = async { let _ = shutdown.wait_for(|s| *s).await; } => false,
            };
            if due {
                this.refresh().await;
            }
        });
    }

    /// Asks the backend to start trading `currency`. Refreshes on success,
    /// never retries.
    pub fn start_trading(&self, currency: &str) -> BoxFuture<'static, StartOutcome> {
        let this = self.clone();
        let currency = currency.to_string();
        async move {
            info!("Requesting start of trading for {}", currency);

            match this.api.start_trading(&currency).await {
                Ok(BackendReply::Accepted(message)) => {
                    let message = message.unwrap_or_else(|| START_OK.to_string());
                    info!("{} trading started: {}", currency, message);
                    this.view.alert(&message);
                    this.refresh().await;
                    StartOutcome::Started
                }
                Ok(BackendReply::Rejected(reason)) => {
                    let reason = reason.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                    warn!("Backend refused to start {}: {}", currency, reason);
                    this.view.alert(&format!("{}: {}", START_FAILED, reason));
                    StartOutcome::Rejected
                }
                Err(e) => {
                    error!("Start trading request for {} failed: {}", currency, e);
                    this.view.alert(START_UNREACHABLE);
                    StartOutcome::Unreachable
                }
            }
        }
        .boxed()
    }
}
