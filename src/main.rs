use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

use urlshort::api;
use urlshort::cache::CacheFactory;
use urlshort::config::Config;
use urlshort::services::UrlService;
use urlshort::storages::StorageFactory;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    // clients are built once here and injected; dropping them on shutdown
    // releases the connections
    let (repository, access_log) =
        StorageFactory::create(&config).map_err(std::io::Error::other)?;
    let cache = CacheFactory::create(&config).map_err(std::io::Error::other)?;

    info!(
        "Using storage backend: {}, cache backend: {}",
        repository.backend_name().await,
        config.cache_backend
    );

    let service = Arc::new(UrlService::new(
        repository,
        access_log,
        cache,
        config.ttl,
    ));

    let bind_address = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server at http://{}", bind_address);

    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .configure(api::configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}
