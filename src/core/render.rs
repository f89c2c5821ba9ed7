// src/core/render.rs
//! Turns a fetched snapshot into display-ready state, and the adapter the
//! refresher writes that state through.

use crate::types::{CurrencyInfo, DashboardSnapshot, UiEvent};
use crate::utils::format::{fixed, with_suffix};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::error;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitClass {
    Profit,
    Loss,
}

impl ProfitClass {
    pub fn of(profit: f64) -> Self {
        if profit > 0.0 {
            ProfitClass::Profit
        } else {
            ProfitClass::Loss
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    Waiting,
    ManagePositions { currency: String },
    StartTrading { currency: String },
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Waiting => "等待交易中...",
            RowAction::ManagePositions { .. } => "管理持倉",
            RowAction::StartTrading { .. } => "開始交易",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyRow {
    pub pair: String,
    pub price: String,
    pub amount: String,
    pub profit: String,
    pub profit_class: ProfitClass,
    pub action: RowAction,
}

/// Everything the view shows for one snapshot. Always replaced wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub summary: Vec<SummaryCard>,
    pub rows: Vec<CurrencyRow>,
}

impl DashboardState {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Self {
        Self {
            summary: render_summary(snapshot),
            rows: render_currency_table(&snapshot.trade_info),
        }
    }
}

/// The six summary cards, in their fixed display order.
pub fn render_summary(snapshot: &DashboardSnapshot) -> Vec<SummaryCard> {
    let usdt = |label: &'static str, value: f64| SummaryCard {
        label,
        value: with_suffix(value, 2, " USDT"),
    };

    vec![
        usdt("總投資", snapshot.total_investment),
        usdt("USDT 餘額", snapshot.usdt_balance),
        usdt("每日收益", snapshot.daily_profit),
        usdt("每月收益", snapshot.monthly_profit),
        SummaryCard {
            label: "年化收益率",
            value: with_suffix(snapshot.annual_return, 2, "%"),
        },
        usdt("總收益", snapshot.total_profit),
    ]
}

/// Waiting currencies first, then trading ones, then the rest. Ties keep
/// the symbol order of the map.
pub fn render_currency_table(trade_info: &BTreeMap<String, CurrencyInfo>) -> Vec<CurrencyRow> {
    let mut entries: Vec<(&String, &CurrencyInfo)> = trade_info.iter().collect();
    entries.sort_by_key(|(_, info)| (!info.waiting_for_open, !info.is_trading));

    entries
        .into_iter()
        .map(|(currency, info)| render_row(currency, info))
        .collect()
}

fn render_row(currency: &str, info: &CurrencyInfo) -> CurrencyRow {
    let action = if info.waiting_for_open {
        RowAction::Waiting
    } else if info.is_trading {
        RowAction::ManagePositions {
            currency: currency.to_string(),
        }
    } else {
        RowAction::StartTrading {
            currency: currency.to_string(),
        }
    };

    CurrencyRow {
        pair: format!("{}/USDT", currency),
        price: fixed(info.current_price.unwrap_or(0.0), 4),
        amount: fixed(info.total_amount(), 4),
        profit: fixed(info.total_profit, 2),
        profit_class: ProfitClass::of(info.total_profit),
        action,
    }
}

/// Rendering adapter. The refresher never touches the screen directly.
pub trait DashboardView: Send + Sync {
    fn set_loading(&self, visible: bool);
    fn render(&self, state: &DashboardState);
    /// Blocking, user-facing notice.
    fn alert(&self, message: &str);
}

/// Forwards view updates to the terminal UI task.
pub struct ChannelView {
    ui_sender: mpsc::Sender<UiEvent>,
}

impl ChannelView {
    pub fn new(ui_sender: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_sender }
    }

    fn send_ui_event(&self, event: UiEvent) {
        match self.ui_sender.try_send(event) {
            Ok(_) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                error!("UI channel full, dropping update");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!("UI channel closed! Interface is likely dead.");
            }
        }
    }
}

impl DashboardView for ChannelView {
    fn set_loading(&self, visible: bool) {
        self.send_ui_event(UiEvent::Loading(visible));
    }

    fn render(&self, state: &DashboardState) {
        self.send_ui_event(UiEvent::Render(state.clone()));
    }

    fn alert(&self, message: &str) {
        self.send_ui_event(UiEvent::Alert(message.to_string()));
    }
}
