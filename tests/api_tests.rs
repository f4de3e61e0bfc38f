//! End-to-end HTTP tests over the memory backends: the full
//! shorten -> redirect -> analytics scenario plus the status-code contract.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use urlshort::api;
use urlshort::cache::CacheFactory;
use urlshort::config::Config;
use urlshort::services::UrlService;
use urlshort::storages::StorageFactory;

macro_rules! test_app {
    () => {{
        let config = Config::default();
        let (repository, access_log) = StorageFactory::create(&config).unwrap();
        let cache = CacheFactory::create(&config).unwrap();
        let service = Arc::new(UrlService::new(repository, access_log, cache, config.ttl));
        test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .app_data(web::Data::new(config))
                .configure(api::configure_routes),
        )
        .await
    }};
}

macro_rules! shorten {
    ($app:expr, $long_url:expr) => {{
        let req = TestRequest::post()
            .uri("/shorten")
            .set_json(json!({ "longUrl": $long_url }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["shortUrl"].as_str().unwrap().to_string()
    }};
}

fn short_id_of(short_url: &str) -> String {
    short_url.rsplit('/').next().unwrap().to_string()
}

#[actix_web::test]
async fn shorten_returns_201_with_short_alphanumeric_suffix() {
    let app = test_app!();
    let short_url = shorten!(&app, "http://example.com");

    assert!(short_url.starts_with("http://localhost:8080/"));
    let id = short_id_of(&short_url);
    assert!(!id.is_empty() && id.len() <= 7);
    assert!(id.bytes().all(|b| b.is_ascii_alphanumeric()));
}

#[actix_web::test]
async fn shorten_twice_returns_distinct_ids() {
    let app = test_app!();
    let first = shorten!(&app, "http://example.com");
    let second = shorten!(&app, "http://example.com");
    assert_ne!(first, second);
}

#[actix_web::test]
async fn shorten_rejects_bad_long_urls() {
    let app = test_app!();
    for bad in ["", "not a url", "javascript:alert(1)", "ftp://example.com"] {
        let req = TestRequest::post()
            .uri("/shorten")
            .set_json(json!({ "longUrl": bad }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "input {bad:?}");
    }
}

#[actix_web::test]
async fn full_scenario_shorten_redirect_analytics() {
    let app = test_app!();
    let short_url = shorten!(&app, "http://example.com");
    let id = short_id_of(&short_url);

    let req = TestRequest::get().uri(&format!("/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "http://example.com"
    );

    let req = TestRequest::get()
        .uri(&format!("/analytics?shortUrlId={id}&timeFrame=24h"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "timeFrame": "24h", "accessCount": 1 }));
}

#[actix_web::test]
async fn cached_redirects_still_count_in_analytics() {
    let app = test_app!();
    let id = short_id_of(&shorten!(&app, "http://example.com"));

    for _ in 0..3 {
        let req = TestRequest::get().uri(&format!("/{id}")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    }

    let req = TestRequest::get()
        .uri(&format!("/analytics?shortUrlId={id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "timeFrame": "all", "accessCount": 3 }));
}

#[actix_web::test]
async fn analytics_echoes_unrecognized_time_frames() {
    let app = test_app!();
    let id = short_id_of(&shorten!(&app, "http://example.com"));

    let req = TestRequest::get()
        .uri(&format!("/analytics?shortUrlId={id}&timeFrame=fortnight"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["timeFrame"], "fortnight");
    assert_eq!(body["accessCount"], 0);
}

#[actix_web::test]
async fn unknown_ids_are_404_on_both_surfaces() {
    let app = test_app!();

    let req = TestRequest::get().uri("/zzz999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get()
        .uri("/analytics?shortUrlId=zzz999&timeFrame=24h")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_ids_are_400() {
    let app = test_app!();

    // 8 chars: one past the limit
    let req = TestRequest::get().uri("/aaaaaaaa").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::get()
        .uri("/analytics?shortUrlId=bad%20id&timeFrame=24h")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn health_endpoint_is_up() {
    let app = test_app!();
    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
