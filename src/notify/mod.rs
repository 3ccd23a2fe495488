//! Telegram access notifications

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::utils::http::{build_client, FetchError, ProxyConfig};

const IP_API_URL: &str = "http://ip-api.com/json";
const TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to reach {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned status {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Geolocation of the requesting address
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct IpInfo {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub org: String,
    #[serde(default, rename = "as")]
    pub asn: String,
}

#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    bot_token: String,
    chat_id: String,
    level: u8,
}

impl Notifier {
    /// Level 1 reports every access; any other level only unusual ones.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>, level: u8) -> Self {
        Self {
            client: Client::new(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            level,
        }
    }

    /// Route notification traffic through the configured proxy
    pub fn with_proxy(mut self, proxy_config: &ProxyConfig, timeout: Duration) -> Result<Self, FetchError> {
        self.client = build_client(proxy_config, timeout)?;
        Ok(self)
    }

    pub fn is_enabled(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }

    pub fn should_notify(&self, is_subscribe_request: bool) -> bool {
        self.level == 1 || !is_subscribe_request
    }

    /// Send a notification about an access from `ip`
    ///
    /// Does nothing when no bot is configured. When the IP lookup fails the
    /// message goes out without location details.
    pub async fn send_message(&self, msg_type: &str, ip: &str, additional: &str) -> Result<(), NotifyError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let info = match self.lookup_ip(ip).await {
            Ok(info) => Some(info),
            Err(e) => {
                debug!("IP lookup for {} failed: {}", ip, e);
                None
            }
        };

        let text = format_message(msg_type, ip, info.as_ref(), additional);
        self.send_telegram(&text).await
    }

    /// `send_message` detached from the caller; failures are only logged
    pub fn spawn_message(&self, msg_type: String, ip: String, additional: String) {
        if !self.is_enabled() {
            return;
        }

        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.send_message(&msg_type, &ip, &additional).await {
                warn!("Notification failed: {}", e);
            }
        });
    }

    async fn lookup_ip(&self, ip: &str) -> Result<IpInfo, NotifyError> {
        let mut url = Url::parse(IP_API_URL)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(ip);
        url.query_pairs_mut().append_pair("lang", "zh-CN");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| NotifyError::Transport {
                service: "ip-api",
                source,
            })?;
        if !response.status().is_success() {
            return Err(NotifyError::Status {
                service: "ip-api",
                status: response.status(),
            });
        }

        response
            .json::<IpInfo>()
            .await
            .map_err(|source| NotifyError::Transport {
                service: "ip-api",
                source,
            })
    }

    async fn send_telegram(&self, text: &str) -> Result<(), NotifyError> {
        let url = Url::parse_with_params(
            &format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, self.bot_token),
            &[
                ("chat_id", self.chat_id.as_str()),
                ("parse_mode", "HTML"),
                ("text", text),
            ],
        )?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| NotifyError::Transport {
                service: "telegram",
                source,
            })?;
        if !response.status().is_success() {
            return Err(NotifyError::Status {
                service: "telegram",
                status: response.status(),
            });
        }
        Ok(())
    }
}

/// Notification text; location lines are present only with `info`
pub fn format_message(msg_type: &str, ip: &str, info: Option<&IpInfo>, additional: &str) -> String {
    match info {
        Some(info) => format!(
            "{}\nIP: {}\nCountry: {}\nCity: {}\nOrganization: {}\nASN: {}\n{}",
            msg_type, ip, info.country, info.city, info.org, info.asn, additional
        ),
        None => format!("{}\nIP: {}\n{}", msg_type, ip, additional),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_notify() {
        let all = Notifier::new("t", "c", 1);
        assert!(all.should_notify(true));
        assert!(all.should_notify(false));

        let quiet = Notifier::new("t", "c", 0);
        assert!(!quiet.should_notify(true));
        assert!(quiet.should_notify(false));
    }

    #[tokio::test]
    async fn test_disabled_notifier_is_noop() {
        let notifier = Notifier::new("", "chat", 1);
        assert!(!notifier.is_enabled());
        assert!(notifier.send_message("#Test", "127.0.0.1", "").await.is_ok());
    }

    #[test]
    fn test_format_message() {
        let info = IpInfo {
            country: "Japan".to_string(),
            city: "Tokyo".to_string(),
            org: "Example Org".to_string(),
            asn: "AS64500 Example".to_string(),
        };
        let text = format_message("#Subscription", "203.0.113.7", Some(&info), "UA: clash");
        assert_eq!(
            text,
            "#Subscription\nIP: 203.0.113.7\nCountry: Japan\nCity: Tokyo\nOrganization: Example Org\nASN: AS64500 Example\nUA: clash"
        );

        let basic = format_message("#Subscription", "203.0.113.7", None, "UA: clash");
        assert_eq!(basic, "#Subscription\nIP: 203.0.113.7\nUA: clash");
    }

    #[test]
    fn test_ip_info_deserialize() {
        let info: IpInfo =
            serde_json::from_str(r#"{"status":"success","country":"Japan","city":"Tokyo","as":"AS1 X"}"#).unwrap();
        assert_eq!(info.country, "Japan");
        assert_eq!(info.asn, "AS1 X");
        assert!(info.org.is_empty());
    }
}
