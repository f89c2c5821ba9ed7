// src/connectors/backend.rs
use crate::connectors::messages::{parse_dashboard, parse_start_trading};
use crate::connectors::traits::DashboardApi;
use crate::error::DashboardResult;
use crate::types::{BackendReply, DashboardSnapshot};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct BackendClient {
    http_client: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> DashboardResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http_client)
    }

    pub fn with_client(base_url: &str, http_client: Client) -> DashboardResult<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends the request and returns the raw body. The HTTP status is only
    /// logged: the backend answers refusals with 4xx/5xx plus a JSON body,
    /// and that body is what decides success.
    async fn send(&self, method: Method, url: Url) -> DashboardResult<String> {
        let mut request = self.http_client.request(method.clone(), url.clone());
        if method == Method::POST {
            request = request.header(CONTENT_TYPE, "application/json");
        }

        let response = request.send().await?;
        debug!("{} {} -> {}", method, url, response.status());

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DashboardApi for BackendClient {
    async fn fetch_dashboard(&self) -> DashboardResult<BackendReply<DashboardSnapshot>> {
        let body = self
            .send(Method::GET, self.endpoint(&["api", "dashboard"]))
            .await?;
        Ok(parse_dashboard(&body)?)
    }

    async fn start_trading(&self, currency: &str) -> DashboardResult<BackendReply<Option<String>>> {
        let body = self
            .send(Method::POST, self.endpoint(&["start_trading", currency]))
            .await?;
        Ok(parse_start_trading(&body)?)
    }

    fn manage_positions_url(&self, currency: &str) -> String {
        self.endpoint(&["manage_positions", currency]).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers exactly one HTTP request and hands back its head.
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    // Local test servers must not be routed through an environment proxy
    fn client(base: &str) -> BackendClient {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        BackendClient::with_client(base, http_client).unwrap()
    }

    #[test]
    fn builds_endpoints_under_base_path() {
        let api = client("http://10.0.0.5:5000/bot/");
        assert_eq!(
            api.endpoint(&["api", "dashboard"]).as_str(),
            "http://10.0.0.5:5000/bot/api/dashboard"
        );
        assert_eq!(
            api.manage_positions_url("ETH"),
            "http://10.0.0.5:5000/bot/manage_positions/ETH"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(BackendClient::new("mailto:ops@example.com", Duration::from_secs(1)).is_err());
        assert!(BackendClient::new("127.0.0.1:5000", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn server_error_with_json_body_is_a_rejection() {
        let (base, server) =
            serve_once("500 Internal Server Error", r#"{"success":false,"error":"boom"}"#).await;

        let reply = client(&base).fetch_dashboard().await.unwrap();
        assert!(matches!(reply, BackendReply::Rejected(Some(ref e)) if e == "boom"));

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /api/dashboard HTTP/1.1"));
    }

    #[tokio::test]
    async fn html_error_page_is_malformed() {
        let (base, _server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;

        let err = client(&base).fetch_dashboard().await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn start_trading_posts_json_to_currency_path() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"success":true,"message":"BTC waiting, lower band 61000.0000 USDT"}"#,
        )
        .await;

        let reply = client(&base).start_trading("BTC").await.unwrap();
        assert_eq!(
            reply,
            BackendReply::Accepted(Some("BTC waiting, lower band 61000.0000 USDT".to_string()))
        );

        let head = server.await.unwrap().to_lowercase();
        assert!(head.starts_with("post /start_trading/btc http/1.1"));
        assert!(head.contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn connection_refused_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr))
            .fetch_dashboard()
            .await
            .unwrap_err();
        assert!(!err.is_malformed());
    }
}
