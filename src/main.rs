use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use addrgate::api::routes::{build_registry, configure};
use addrgate::api::services::ShutdownFlag;
use addrgate::config::StaticConfig;
use addrgate::services::AddressService;
use addrgate::system::init_logging;
use addrgate::upstream::{HttpUpstreamClient, UpstreamClient};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = StaticConfig::load();
    let _log_guard = init_logging(&config);

    // 启动时构建一次路由注册表，重复注册直接终止启动
    let registry = Arc::new(build_registry().context("Failed to build route registry")?);
    for resource in registry.resource_names() {
        if let Some(table) = registry.resource(resource) {
            debug!("Registered resource /{} with {} route(s)", resource, table.len());
        }
    }

    let upstream: Arc<dyn UpstreamClient> = Arc::new(HttpUpstreamClient::new(
        &config.upstream.endpoint,
        Duration::from_secs(config.upstream.timeout_secs),
    ));
    let service = Arc::new(AddressService::new(upstream));
    let shutdown = Arc::new(ShutdownFlag::new());

    info!(
        "Proxying address lookups to {} (timeout {}s)",
        config.upstream.endpoint, config.upstream.timeout_secs
    );

    let app_registry = registry.clone();
    let app_service = service.clone();
    let app_shutdown = shutdown.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_registry.clone()))
            .app_data(web::Data::new(app_service.clone()))
            .app_data(web::Data::new(app_shutdown.clone()))
            .configure(configure)
    })
    .workers(config.server.cpu_count)
    .bind((config.server.host.as_str(), config.server.port))
    .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?
    .run();

    info!(
        "The application has started on http://{}:{}",
        config.server.host, config.server.port
    );

    // Flip the liveness probe before asking actix for a graceful stop so
    // load balancers drain this instance first.
    let handle = server.handle();
    let flag = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received, stopping server..."),
            Err(e) => warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            ),
        }
        flag.trigger();
        handle.stop(true).await;
    });

    server.await.context("HTTP server terminated abnormally")?;
    info!("No longer accepting incoming requests. Gracefully shutting down!");
    Ok(())
}
