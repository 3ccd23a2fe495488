//! Dynamic subscription management API

use actix_web::{web, HttpRequest, HttpResponse};
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::interfaces::{is_authorized, TokenQuery};
use crate::models::AppState;
use crate::registry::RegistryError;

#[derive(Deserialize, Debug)]
pub struct SubscribeRequest {
    pub url: String,
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized access" }))
}

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "error": message }))
}

fn parse_request(body: &[u8]) -> Result<SubscribeRequest, HttpResponse> {
    serde_json::from_slice(body)
        .map_err(|_| HttpResponse::BadRequest().json(json!({ "error": "Invalid request data" })))
}

/// GET /api/subscribe
pub async fn list_subscribe(
    req: HttpRequest,
    query: web::Query<TokenQuery>,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    if !is_authorized(&req, &query, &app_state) {
        return unauthorized();
    }

    HttpResponse::Ok().json(json!({ "urls": app_state.registry.list() }))
}

/// POST /api/subscribe with `{"url": "..."}`
pub async fn add_subscribe(
    req: HttpRequest,
    query: web::Query<TokenQuery>,
    body: web::Bytes,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    if !is_authorized(&req, &query, &app_state) {
        return unauthorized();
    }
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(resp) => return resp,
    };

    // The registry persists to disk; keep that off the async workers.
    let registry = Arc::clone(&app_state.registry);
    let url = request.url.clone();
    let result = match web::block(move || registry.add(&url)).await {
        Ok(result) => result,
        Err(e) => {
            error!("Subscription add task failed: {}", e);
            return internal_error("Failed to add subscription");
        }
    };

    match result {
        Ok(added) => {
            info!("Subscription {} added: {}", request.url, added);
            let message = if added {
                "Subscription added"
            } else {
                "Subscription already exists"
            };
            HttpResponse::Ok().json(json!({ "message": message }))
        }
        Err(RegistryError::EmptyUrl) => {
            HttpResponse::BadRequest().json(json!({ "error": "Invalid request data" }))
        }
        Err(e) => {
            error!("Failed to add subscription {}: {}", request.url, e);
            internal_error("Failed to add subscription")
        }
    }
}

/// DELETE /api/subscribe with `{"url": "..."}`
pub async fn remove_subscribe(
    req: HttpRequest,
    query: web::Query<TokenQuery>,
    body: web::Bytes,
    app_state: web::Data<Arc<AppState>>,
) -> HttpResponse {
    if !is_authorized(&req, &query, &app_state) {
        return unauthorized();
    }
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(resp) => return resp,
    };

    let registry = Arc::clone(&app_state.registry);
    let url = request.url.clone();
    let result = match web::block(move || registry.remove(&url)).await {
        Ok(result) => result,
        Err(e) => {
            error!("Subscription remove task failed: {}", e);
            return internal_error("Failed to remove subscription");
        }
    };

    match result {
        Ok(removed) => {
            info!("Subscription {} removed: {}", request.url, removed);
            let message = if removed {
                "Subscription removed"
            } else {
                "Subscription not found"
            };
            HttpResponse::Ok().json(json!({ "message": message }))
        }
        Err(e) => {
            error!("Failed to remove subscription {}: {}", request.url, e);
            internal_error("Failed to remove subscription")
        }
    }
}
