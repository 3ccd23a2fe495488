use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::constants::clash::DEFAULT_CLASH_CONFIG;
use crate::constants::MIN_CONVERTED_LEN;
use crate::generator::proxy_to_clash;
use crate::models::ClientType;
use crate::utils::base64::decode_or_plain;
use crate::utils::http::{build_client, web_get_async, FetchError, ProxyConfig};
use crate::utils::string::split_lines;
use crate::utils::url::url_encode;
use crate::utils::useragent::detect_client_type;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("conversion backend request failed: {0}")]
    Backend(#[from] FetchError),

    #[error("conversion backend returned {0} bytes, too short to be a profile")]
    UndersizedBody(usize),

    #[error("invalid conversion backend address: {0}")]
    InvalidBackend(#[from] url::ParseError),
}

/// External service that converts a node list into a client profile
pub trait ConversionBackend {
    fn convert(
        &self,
        target: ClientType,
        source: &str,
    ) -> impl Future<Output = Result<String, ConvertError>>;
}

/// Subconverter-compatible backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    config_url: String,
}

impl HttpBackend {
    /// `host` is a bare host name (served over https) or a full base URL.
    pub fn new(
        host: &str,
        config_url: &str,
        proxy_config: &ProxyConfig,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let host = host.trim().trim_end_matches('/');
        let endpoint = if host.contains("://") {
            format!("{}/sub", host)
        } else {
            format!("https://{}/sub", host)
        };

        Ok(Self {
            client: build_client(proxy_config, timeout)?,
            endpoint,
            config_url: config_url.to_string(),
        })
    }

    /// Full request URL for converting `source` into `target`
    pub fn request_url(&self, target: ClientType, source: &str) -> Result<Url, ConvertError> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[
                ("target", target.as_str()),
                ("url", source),
                ("insert", "false"),
                ("config", self.config_url.as_str()),
                ("emoji", "true"),
                ("list", "false"),
                ("tfo", "false"),
                ("scv", "true"),
                ("fdn", "false"),
                ("sort", "false"),
                ("new_name", "true"),
            ],
        )?;
        Ok(url)
    }
}

impl ConversionBackend for HttpBackend {
    async fn convert(&self, target: ClientType, source: &str) -> Result<String, ConvertError> {
        let url = self.request_url(target, source)?;
        debug!("Conversion request for {}: {}", target, url);

        let body = web_get_async(&self.client, url.as_str()).await?;
        if body.len() < MIN_CONVERTED_LEN {
            return Err(ConvertError::UndersizedBody(body.len()));
        }
        Ok(body)
    }
}

/// Ways of producing a Clash profile, tried in order until one yields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClashStrategy {
    LocalGeneration,
    RemoteDelegation,
}

const CLASH_STRATEGIES: [ClashStrategy; 2] =
    [ClashStrategy::LocalGeneration, ClashStrategy::RemoteDelegation];

/// Turns the merged node list into what the requesting client expects
#[derive(Debug, Clone)]
pub struct FormatConverter<B = HttpBackend> {
    backend: B,
    /// Refresh hint for clients, in hours
    update_interval: u32,
}

impl<B: ConversionBackend> FormatConverter<B> {
    pub fn new(backend: B, update_interval: u32) -> Self {
        Self {
            backend,
            update_interval,
        }
    }

    pub fn detect_client_type(&self, user_agent: &str) -> ClientType {
        detect_client_type(user_agent)
    }

    /// Convert merged content for `target`
    ///
    /// The plain type is the identity. Clash always resolves to a document.
    /// Sing-box has no local generator, so backend failures surface as errors.
    pub async fn convert(&self, content: &str, target: ClientType) -> Result<String, ConvertError> {
        match target {
            ClientType::V2Ray => Ok(content.to_string()),
            ClientType::Clash => Ok(self.convert_clash(content).await),
            ClientType::SingBox => self.backend.convert(target, content).await,
        }
    }

    async fn convert_clash(&self, content: &str) -> String {
        for strategy in CLASH_STRATEGIES {
            if let Some(profile) = self.attempt(strategy, content).await {
                return profile;
            }
        }

        warn!("Every Clash strategy failed, serving the default profile");
        DEFAULT_CLASH_CONFIG.to_string()
    }

    async fn attempt(&self, strategy: ClashStrategy, content: &str) -> Option<String> {
        match strategy {
            ClashStrategy::LocalGeneration => {
                let links = split_lines(&decode_or_plain(content));
                if links.is_empty() {
                    debug!("No node lines to generate a Clash profile from");
                    return None;
                }
                info!("Generating Clash profile locally from {} nodes", links.len());
                proxy_to_clash(&links)
            }
            ClashStrategy::RemoteDelegation => {
                match self.backend.convert(ClientType::Clash, content).await {
                    Ok(profile) => Some(profile),
                    Err(e) => {
                        warn!("Clash conversion via backend failed: {}", e);
                        None
                    }
                }
            }
        }
    }

    /// Headers sent with every converted subscription
    pub fn response_headers(&self, filename: &str) -> HashMap<String, String> {
        HashMap::from([
            (
                "Content-Disposition".to_string(),
                format!(
                    "attachment; filename*=utf-8''{}; filename={}",
                    url_encode(filename),
                    filename
                ),
            ),
            (
                "content-type".to_string(),
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                "Profile-Update-Interval".to_string(),
                self.update_interval.to_string(),
            ),
        ])
    }
}
