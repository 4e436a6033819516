//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::AdminAuth;
use crate::api::services::{AppStartTime, admin::admin_v1_routes, health_routes, track_routes};
use crate::runtime::lifetime;
use crate::runtime::lifetime::startup::RouteConfig;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_host: String,
    pub server_port: u16,
}

/// Mount the admin, health and beacon scopes under their configured prefixes
pub fn configure_routes(cfg: &mut web::ServiceConfig, routes: &RouteConfig, admin_auth: AdminAuth) {
    cfg.service(
        web::scope(&routes.admin_prefix)
            .wrap(admin_auth)
            .service(admin_v1_routes()),
    )
    .service(web::scope(&routes.health_prefix).service(health_routes()))
    .service(web::scope(&routes.track_prefix).service(track_routes()));
}

/// Run the HTTP server
///
/// This function:
/// 1. Prepares storage, services and routes
/// 2. Configures the HTTP server with middleware and routes
/// 3. Waits for the server to exit or for a shutdown signal
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup().await?;
    let route = startup.route_config.clone();

    let config = crate::config::get_config();
    let server_config = ServerConfig {
        server_host: config.server.host.clone(),
        server_port: config.server.port,
    };

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    if config.api.admin_token.is_empty() {
        info!("Admin API is disabled (api.admin_token not set)");
    } else {
        info!("Admin API available at: {}", route.admin_prefix);
    }

    let backend_config = startup.storage.get_backend_config();
    let repository = startup.repository.clone();
    let analytics_service = startup.analytics_service.clone();
    let recorder = startup.recorder.clone();

    // Clone db reference before storage moves into HttpServer closure
    let db_for_shutdown = startup.storage.get_db().clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(web::Data::new(repository.clone()))
            .app_data(web::Data::new(backend_config.clone()))
            .app_data(web::Data::from(analytics_service.clone()))
            .app_data(web::Data::from(recorder.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| configure_routes(cfg, &route, AdminAuth::from_config()))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!(
        "{}:{}",
        server_config.server_host, server_config.server_port
    );
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    // Wait for server or shutdown signal
    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown: storage closed");
        }
    }

    Ok(())
}
