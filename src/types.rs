// src/types.rs
use crate::core::render::DashboardState;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Treats an explicit `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrencyInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub waiting_for_open: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_trading: bool,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_profit: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub positions: Vec<Position>,
}

impl CurrencyInfo {
    pub fn total_amount(&self) -> f64 {
        self.positions
            .iter()
            .map(|p| p.amount.unwrap_or(0.0))
            .fold(0.0, |acc, amount| acc + amount)
    }
}

/// One fetched state of the dashboard. Summary figures are required; a
/// payload without them is rejected as malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSnapshot {
    pub total_investment: f64,
    pub usdt_balance: f64,
    pub daily_profit: f64,
    pub monthly_profit: f64,
    pub annual_return: f64,
    pub total_profit: f64,
    // Keyed by currency symbol. Display order comes from render, not from here.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_info: BTreeMap<String, CurrencyInfo>,
}

/// Outcome of a request the backend actually processed.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply<T> {
    Accepted(T),
    /// `success: false`, with the server-reported reason if any.
    Rejected(Option<String>),
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Loading(bool),
    Render(DashboardState),
    Alert(String),
}
