// Scripted api and recording view shared by the core tests.
use crate::connectors::traits::DashboardApi;
use crate::core::render::{DashboardState, DashboardView};
use crate::error::{DashboardError, DashboardResult};
use crate::types::{BackendReply, CurrencyInfo, DashboardSnapshot, UiEvent};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type DashboardScript = DashboardResult<BackendReply<DashboardSnapshot>>;
type StartScript = DashboardResult<BackendReply<Option<String>>>;

/// Replies are served in push order; once a script runs dry every call
/// succeeds with an empty snapshot.
#[derive(Default)]
pub struct FakeApi {
    dashboard: Mutex<VecDeque<(DashboardScript, Duration)>>,
    start: Mutex<VecDeque<StartScript>>,
    dashboard_calls: AtomicUsize,
    started: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn push_dashboard(&self, reply: DashboardScript) {
        self.push_dashboard_after(reply, Duration::ZERO);
    }

    /// The reply is picked when the call starts but only returned `delay` later.
    pub fn push_dashboard_after(&self, reply: DashboardScript, delay: Duration) {
        self.dashboard.lock().unwrap().push_back((reply, delay));
    }

    pub fn push_start(&self, reply: StartScript) {
        self.start.lock().unwrap().push_back(reply);
    }

    pub fn dashboard_calls(&self) -> usize {
        self.dashboard_calls.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn fetch_dashboard(&self) -> DashboardResult<BackendReply<DashboardSnapshot>> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.dashboard.lock().unwrap().pop_front();
        let (reply, delay) =
            next.unwrap_or_else(|| (Ok(BackendReply::Accepted(snapshot(&[]))), Duration::ZERO));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }

    async fn start_trading(&self, currency: &str) -> DashboardResult<BackendReply<Option<String>>> {
        self.started.lock().unwrap().push(currency.to_string());
        self.start
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(BackendReply::Accepted(None)))
    }

    fn manage_positions_url(&self, currency: &str) -> String {
        format!("http://backend.test/manage_positions/{}", currency)
    }
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn renders(&self) -> Vec<DashboardState> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Render(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl DashboardView for RecordingView {
    fn set_loading(&self, visible: bool) {
        self.events.lock().unwrap().push(UiEvent::Loading(visible));
    }

    fn render(&self, state: &DashboardState) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Render(state.clone()));
    }

    fn alert(&self, message: &str) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Alert(message.to_string()));
    }
}

/// `(symbol, waiting_for_open, is_trading)` rows on top of fixed totals.
pub fn snapshot(currencies: &[(&str, bool, bool)]) -> DashboardSnapshot {
    let trade_info: BTreeMap<String, CurrencyInfo> = currencies
        .iter()
        .map(|&(symbol, waiting, trading)| {
            let info = CurrencyInfo {
                waiting_for_open: waiting,
                is_trading: trading,
                ..Default::default()
            };
            (symbol.to_string(), info)
        })
        .collect();

    DashboardSnapshot {
        total_investment: 1000.0,
        usdt_balance: 250.0,
        daily_profit: 1.5,
        monthly_profit: 30.0,
        annual_return: 4.2,
        total_profit: 42.0,
        trade_info,
    }
}

pub fn rejected(reason: &str) -> DashboardScript {
    Ok(BackendReply::Rejected(Some(reason.to_string())))
}

pub fn malformed_error() -> DashboardError {
    serde_json::from_str::<serde_json::Value>("<html>502</html>")
        .unwrap_err()
        .into()
}

pub fn broken_reply() -> DashboardScript {
    Err(malformed_error())
}

/// Lets spawned tasks run without moving the paused clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
