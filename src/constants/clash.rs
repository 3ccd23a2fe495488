/// Name of the single selector group in generated profiles
pub const PROXY_GROUP_NAME: &str = "🚀 Node Select";

/// Built-in policy that bypasses every proxy
pub const DIRECT: &str = "DIRECT";

/// Placeholder endpoint for links that could not be parsed
pub const PLACEHOLDER_SERVER: &str = "example.com";
pub const PLACEHOLDER_PORT: u16 = 443;

/// Served when neither local generation nor the conversion backend produced
/// a profile. Must stay a valid Clash document.
pub const DEFAULT_CLASH_CONFIG: &str = r#"
port: 7890
socks-port: 7891
allow-lan: true
mode: Rule
log-level: info
external-controller: 127.0.0.1:9090
proxies:
  - name: Default
    type: http
    server: example.com
    port: 443
    username: username
    password: password
    tls: true
proxy-groups:
  - name: 🚀 Node Select
    type: select
    proxies:
      - Default
      - DIRECT
rules:
  - MATCH,🚀 Node Select
"#;
