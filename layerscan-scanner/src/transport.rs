use crate::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Layerscan/0.2 (https://github.com/ubxroot/layerscan)";

/// Everything the engine needs from one HTTP response.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub server: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: String,
}

/// One HTTP round trip. No retries, no caching; a timeout or connect failure
/// surfaces as `ScanError::Transport`. Implementations must be safe to call
/// concurrently.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

/// Production transport: reqwest routed through a local SOCKS5h proxy so that
/// hostname resolution happens inside the anonymizing network, never locally.
pub struct TorTransport {
    client: Client,
}

impl TorTransport {
    pub fn new(proxy_host: &str, proxy_port: u16, timeout_secs: u64) -> Result<Self> {
        let proxy = reqwest::Proxy::all(format!("socks5h://{}:{}", proxy_host, proxy_port))?;
        let client = Self::client_builder(timeout_secs).proxy(proxy).build()?;
        Ok(Self { client })
    }

    /// Unproxied variant with the same timeouts and redirect policy. Used by
    /// integration tests against a local mock server.
    pub fn direct(timeout_secs: u64) -> Result<Self> {
        let client = Self::client_builder(timeout_secs).build()?;
        Ok(Self { client })
    }

    fn client_builder(timeout_secs: u64) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .redirect(reqwest::redirect::Policy::limited(5))
    }
}

#[async_trait]
impl Transport for TorTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        debug!("fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status().as_u16();
        let server = header_value(&response, "server");
        let content_type = header_value(&response, "content-type");
        let content_length = response.content_length();
        let body = response.text().await.map_err(|e| transport_error(url, &e))?;

        Ok(FetchResponse {
            status,
            server,
            content_type,
            content_length,
            body,
        })
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn transport_error(url: &str, err: &reqwest::Error) -> ScanError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "connection failed (is the proxy running?)".to_string()
    } else {
        err.to_string()
    };
    ScanError::Transport {
        url: url.to_string(),
        reason,
    }
}
