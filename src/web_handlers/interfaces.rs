use actix_web::{http::header, web, HttpRequest, HttpResponse};
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::sync::Arc;

use crate::constants::pages::NGINX_WELCOME_PAGE;
use crate::constants::MIN_CONVERTED_LEN;
use crate::models::AppState;
use crate::utils::base64::base64_decode;
use crate::utils::useragent::is_browser;

/// Header set by Cloudflare with the original client address
pub const CF_CONNECTING_IP: &str = "CF-Connecting-IP";

/// Query parameters shared by every endpoint
#[derive(Deserialize, Debug, Default, Clone)]
pub struct TokenQuery {
    /// Access token
    pub token: Option<String>,
}

/// Whether a request carrying `token` for `path_and_query` may proceed
///
/// Accepted when the query token matches, when the path starts with
/// `/<my_token>`, or when `/<my_token>?` occurs in the request target.
pub fn validate_token(my_token: &str, token: Option<&str>, path_and_query: &str) -> bool {
    if my_token.is_empty() {
        return true;
    }

    let path = path_and_query.split('?').next().unwrap_or_default();
    let prefix = format!("/{}", my_token);

    token == Some(my_token)
        || path.starts_with(&prefix)
        || path_and_query.contains(&format!("{}?", prefix))
}

/// Address of the requesting client, preferring the Cloudflare header
pub fn client_ip(req: &HttpRequest) -> String {
    req.headers()
        .get(CF_CONNECTING_IP)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}

pub fn user_agent(req: &HttpRequest) -> &str {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub(crate) fn is_authorized(req: &HttpRequest, query: &TokenQuery, app_state: &AppState) -> bool {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());

    validate_token(
        &app_state.settings.my_token,
        query.token.as_deref(),
        path_and_query,
    )
}

/// Handler for subscription requests on any path
pub async fn sub_handler(
    req: HttpRequest,
    query: web::Query<TokenQuery>,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    let ua = user_agent(&req).to_string();

    if !is_authorized(&req, &query, &app_state) {
        return unauthorized(&req, &ua, &app_state);
    }

    info!("Subscription requested, User-Agent: {}", ua);

    let source_urls = app_state.registry.list();
    let report = app_state.merger.merge(&source_urls).await;
    if report.content.is_empty() {
        warn!("Merged node content is empty");
    } else {
        info!(
            "Merged content is {} bytes ({} of {} sources failed)",
            report.content.len(),
            report.failed_sources,
            report.source_count
        );
    }

    let client_type = app_state.converter.detect_client_type(&ua);
    info!("Detected client type: {}", client_type);

    let mut content = report.content;
    if is_browser(&ua) {
        debug!("Browser access, decoding merged content");
        match base64_decode(&content) {
            Some(decoded) => content = decoded,
            None => debug!("Merged content is not valid Base64, serving it as is"),
        }
    }

    let converted = match app_state.converter.convert(&content, client_type).await {
        Ok(converted) => converted,
        Err(e) => {
            error!("Subscription conversion failed: {}", e);
            return HttpResponse::InternalServerError().body("Subscription conversion failed");
        }
    };

    if converted.len() < MIN_CONVERTED_LEN {
        warn!(
            "Converted content may be invalid, only {} bytes",
            converted.len()
        );
    } else {
        info!("Converted content is {} bytes", converted.len());
    }

    let mut resp = HttpResponse::Ok();
    for (name, value) in app_state
        .converter
        .response_headers(&app_state.settings.file_name)
    {
        debug!("Response header {}: {}", name, value);
        resp.insert_header((name, value));
    }

    if app_state.notifier.should_notify(true) {
        app_state.notifier.spawn_message(
            "#Subscription".to_string(),
            client_ip(&req),
            format!("UA: {}", ua),
        );
    }

    resp.body(converted)
}

fn unauthorized(req: &HttpRequest, ua: &str, app_state: &AppState) -> HttpResponse {
    debug!("Unauthorized access to {}", req.path());

    if app_state.notifier.should_notify(false) {
        app_state.notifier.spawn_message(
            "#UnauthorizedAccess".to_string(),
            client_ip(req),
            format!("UA: {}", ua),
        );
    }

    HttpResponse::Ok()
        .content_type("text/html; charset=UTF-8")
        .body(NGINX_WELCOME_PAGE)
}
