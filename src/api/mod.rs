use actix_web::{HttpResponse, web};
use tracing::error;

use crate::errors::UrlShortError;

pub mod services;
pub mod types;

use services::{AnalyticsService, HealthService, RedirectService, ShortenService};

/// Maps a classified error to its HTTP response.
///
/// Not-found is 404 on every surface (the historical 400 variant was
/// dropped; tests pin this). Storage and cache detail never leaks to the
/// client: anything that is not not-found or validation becomes a generic
/// server error, logged in full here.
pub fn error_response(err: &UrlShortError) -> HttpResponse {
    match err {
        UrlShortError::NotFound(_) => {
            HttpResponse::NotFound().json(types::ErrorBody::new("Short URL not found"))
        }
        UrlShortError::Validation(msg) => {
            HttpResponse::BadRequest().json(types::ErrorBody::new(msg.clone()))
        }
        other => {
            error!("[{}] {}", other.code(), other);
            HttpResponse::InternalServerError().json(types::ErrorBody::new("Server error"))
        }
    }
}

/// Registers every route. The catch-all redirect route goes last so the
/// fixed paths keep precedence.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/shorten", web::post().to(ShortenService::handle))
        .route("/analytics", web::get().to(AnalyticsService::handle))
        .route("/health", web::get().to(HealthService::handle))
        .route("/{short_url_id}", web::get().to(RedirectService::handle));
}
