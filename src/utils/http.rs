use std::time::Duration;

use log::debug;
use reqwest::{Client, Proxy, StatusCode};
use thiserror::Error;

const USER_AGENT: &str = concat!("sublinks/", env!("CARGO_PKG_VERSION"));

/// Outbound proxy selection for fetches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProxyConfig {
    /// Honour the `HTTP(S)_PROXY` environment, reqwest's default
    #[default]
    System,
    /// Connect directly, ignoring the environment
    None,
    /// Route every request through this proxy URL
    Custom(String),
}

pub fn parse_proxy(proxy_str: &str) -> ProxyConfig {
    match proxy_str.trim() {
        "" | "SYSTEM" => ProxyConfig::System,
        "NONE" => ProxyConfig::None,
        other => ProxyConfig::Custom(other.to_string()),
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to set proxy: {0}")]
    Proxy(reqwest::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("failed to send request: {0}")]
    Request(reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(StatusCode),

    #[error("failed to read response body: {0}")]
    Body(reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Builds a client with the given proxy and overall request timeout
pub fn build_client(proxy_config: &ProxyConfig, timeout: Duration) -> Result<Client, FetchError> {
    let mut client_builder = Client::builder().timeout(timeout).user_agent(USER_AGENT);

    match proxy_config {
        ProxyConfig::System => {}
        ProxyConfig::None => client_builder = client_builder.no_proxy(),
        ProxyConfig::Custom(proxy) => {
            let proxy = Proxy::all(proxy).map_err(FetchError::Proxy)?;
            client_builder = client_builder.proxy(proxy);
        }
    }

    client_builder.build().map_err(FetchError::Client)
}

/// Makes a GET request to the specified URL
///
/// # Returns
/// * `Ok(String)` - The response body, for any 2xx status
/// * `Err(FetchError)` - Transport failure, non-2xx status or unreadable body
pub async fn web_get_async(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(FetchError::Request)?;

    let status = response.status();
    if !status.is_success() {
        if let Ok(body) = response.text().await {
            debug!("GET {} answered {} with body: {}", url, status, body);
        }
        return Err(FetchError::Status(status));
    }

    response.text().await.map_err(FetchError::Body)
}
