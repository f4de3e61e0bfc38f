use actix_web::HttpResponse;
use serde_json::json;

pub struct HealthService;

impl HealthService {
    /// `GET /health` - liveness probe, no auth.
    pub async fn handle() -> HttpResponse {
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    }
}
