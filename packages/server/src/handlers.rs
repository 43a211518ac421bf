//! HTTP request handlers for the view server.

use actix_web::{HttpResponse, web};
use eco_guardian_bin_models::BinId;
use eco_guardian_server_models::{ApiError, ApiHealth};

use crate::AppState;
use crate::html::INDEX_HTML;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/view`
///
/// Returns the most recently published dashboard view.
pub async fn view(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.dashboard.latest())
}

/// `POST /api/bins/{id}/select`
///
/// Replaces the detail chart with one for the given bin.
pub async fn select_bin(state: web::Data<AppState>, path: web::Path<BinId>) -> HttpResponse {
    let bin_id = path.into_inner();

    match state.dashboard.select(bin_id).await {
        Ok(Some(chart)) => HttpResponse::Ok().json(chart),
        Ok(None) => HttpResponse::NotFound()
            .json(ApiError::new(format!("No active bin with id {bin_id}"))),
        Err(e) => {
            log::error!("Failed to select bin #{bin_id}: {e}");
            HttpResponse::ServiceUnavailable().json(ApiError::new(e.to_string()))
        }
    }
}

/// `GET /`
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}
