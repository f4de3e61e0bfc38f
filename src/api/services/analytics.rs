use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::instrument;

use crate::api::types::{AnalyticsQuery, ErrorBody};
use crate::base62;
use crate::services::UrlService;

pub struct AnalyticsService;

impl AnalyticsService {
    /// `GET /analytics?shortUrlId=&timeFrame=` - access count over the
    /// requested window. Unrecognized time frames are accepted and echoed
    /// back; an unknown id is 404.
    #[instrument(skip(service, query), fields(short_id = %query.short_url_id))]
    pub async fn handle(
        query: web::Query<AnalyticsQuery>,
        service: web::Data<Arc<UrlService>>,
    ) -> HttpResponse {
        if !base62::is_valid_short_id(&query.short_url_id) {
            return HttpResponse::BadRequest()
                .json(ErrorBody::new("Invalid short URL id"));
        }

        match service
            .analytics(&query.short_url_id, query.time_frame.as_deref())
            .await
        {
            Ok(report) => HttpResponse::Ok().json(report),
            Err(e) => crate::api::error_response(&e),
        }
    }
}
