use crate::error::DashboardResult;
use crate::types::{BackendReply, DashboardSnapshot};
use async_trait::async_trait;

/// The two backend calls the dashboard makes.
///
/// `Err` means the request never produced a usable reply (transport or
/// malformed body); a processed-but-refused request is `Ok(Rejected)`.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_dashboard(&self) -> DashboardResult<BackendReply<DashboardSnapshot>>;

    async fn start_trading(&self, currency: &str) -> DashboardResult<BackendReply<Option<String>>>;

    // Navigation target only, never requested by the dashboard itself
    fn manage_positions_url(&self, currency: &str) -> String;
}
