use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::instrument;

use crate::api::types::{ErrorBody, ShortenRequest, ShortenResponse};
use crate::config::Config;
use crate::services::UrlService;
use crate::utils::url_validator::validate_long_url;

pub struct ShortenService;

impl ShortenService {
    /// `POST /shorten` - mints a new short id and returns the full short
    /// URL. 201 on success, 400 on a bad long URL.
    #[instrument(skip(service, config, payload))]
    pub async fn handle(
        payload: web::Json<ShortenRequest>,
        service: web::Data<Arc<UrlService>>,
        config: web::Data<Config>,
    ) -> HttpResponse {
        let long_url = payload.long_url.trim();

        if let Err(e) = validate_long_url(long_url) {
            return HttpResponse::BadRequest().json(ErrorBody::new(e.to_string()));
        }

        match service.shorten(long_url).await {
            Ok(id) => HttpResponse::Created().json(ShortenResponse {
                short_url: format!("{}/{}", config.base_url.trim_end_matches('/'), id),
            }),
            Err(e) => crate::api::error_response(&e),
        }
    }
}
