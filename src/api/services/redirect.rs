use std::sync::Arc;

use actix_web::{HttpResponse, web};
use actix_web::http::header;
use tracing::instrument;

use crate::api::types::ErrorBody;
use crate::base62;
use crate::services::UrlService;

pub struct RedirectService;

impl RedirectService {
    /// `GET /{shortUrlId}` - 301 to the stored long URL. The format guard
    /// runs before the service so junk paths never reach storage; a
    /// well-formed but unknown id is 404.
    #[instrument(skip(service), fields(short_id = %path))]
    pub async fn handle(
        path: web::Path<String>,
        service: web::Data<Arc<UrlService>>,
    ) -> HttpResponse {
        let short_id = path.into_inner();

        if !base62::is_valid_short_id(&short_id) {
            return HttpResponse::BadRequest()
                .json(ErrorBody::new("Invalid short URL id"));
        }

        match service.redirect(&short_id).await {
            Ok(target) => HttpResponse::MovedPermanently()
                .insert_header((header::LOCATION, target))
                .finish(),
            Err(e) => crate::api::error_response(&e),
        }
    }
}
