// src/connectors/messages.rs
use crate::types::{BackendReply, DashboardSnapshot};
use serde::Deserialize;

/// Common `{ success, error }` wrapper every backend reply carries.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Body of `POST /start_trading/{currency}`.
#[derive(Debug, Deserialize)]
struct StartTradingBody {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parses `/api/dashboard`. The snapshot fields are only validated when the
/// backend reports success; a failed reply carries nothing but the error.
pub fn parse_dashboard(body: &str) -> serde_json::Result<BackendReply<DashboardSnapshot>> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if !envelope.success {
        return Ok(BackendReply::Rejected(envelope.error));
    }
    let snapshot: DashboardSnapshot = serde_json::from_str(body)?;
    Ok(BackendReply::Accepted(snapshot))
}

/// Parses `/start_trading/{currency}`. The accepted value is the optional
/// server message (it usually carries the computed entry threshold).
pub fn parse_start_trading(body: &str) -> serde_json::Result<BackendReply<Option<String>>> {
    let resp: StartTradingBody = serde_json::from_str(body)?;
    if resp.success {
        Ok(BackendReply::Accepted(resp.message))
    } else {
        Ok(BackendReply::Rejected(resp.error))
    }
}
