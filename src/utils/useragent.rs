//! Client classification from the self-reported `User-Agent`

use crate::models::ClientType;
use crate::utils::string::contains_ignore_case;

/// A marker looked up in the lowercased user agent
struct UserAgentProfile {
    marker: &'static str,
    /// Apps that carry `marker` but must not be classified as `client`
    excludes: &'static [&'static str],
    client: ClientType,
}

/// Evaluated top to bottom; the first matching profile wins.
const UA_PROFILES: &[UserAgentProfile] = &[
    UserAgentProfile {
        marker: "clash",
        excludes: &["nekobox"],
        client: ClientType::Clash,
    },
    UserAgentProfile {
        marker: "sing-box",
        excludes: &[],
        client: ClientType::SingBox,
    },
    UserAgentProfile {
        marker: "singbox",
        excludes: &[],
        client: ClientType::SingBox,
    },
];

/// Markers that identify a real proxy client even inside a browser-like agent
const CLIENT_MARKERS: &[&str] = &["clash", "v2ray", "sing"];

/// Classify a client from its user agent, defaulting to the plain node list
pub fn detect_client_type(user_agent: &str) -> ClientType {
    let user_agent = user_agent.to_lowercase();

    UA_PROFILES
        .iter()
        .find(|profile| {
            user_agent.contains(profile.marker)
                && !profile
                    .excludes
                    .iter()
                    .any(|excluded| user_agent.contains(excluded))
        })
        .map(|profile| profile.client)
        .unwrap_or_default()
}

/// Whether the request comes from a web browser rather than a proxy client
pub fn is_browser(user_agent: &str) -> bool {
    contains_ignore_case(user_agent, "mozilla")
        && !CLIENT_MARKERS
            .iter()
            .any(|marker| contains_ignore_case(user_agent, marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_browser() {
        assert!(is_browser(
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0"
        ));
        assert!(!is_browser("Mozilla/5.0 ClashMetaForAndroid/2.8"));
        assert!(!is_browser("Mozilla/5.0 v2rayNG/1.8"));
        assert!(!is_browser("curl/8.0"));
    }
}
