//! Dashboard API: the JSON layer the admin pages talk to.
//!
//! Every data route resolves the caller's session against the backend,
//! fetches what the page needs, runs it through the session's anonymizer and
//! optionally sorts it. Write routes refuse demo sessions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::time::Instant;

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use crate::api::config::ApiConfig;
use crate::api::error::ApiError;
use crate::client::{BackendClient, BackendConfig};

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: BackendClient,
    pub config: ApiConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(client: BackendClient, config: ApiConfig) -> Self {
        Self {
            client,
            config,
            started_at: Instant::now(),
        }
    }
}

/// Registers every dashboard route. Fixed `/api/machines/...` paths are
/// registered ahead of `/api/machines/{id}` so they are not captured by it.
/// Query and body extraction failures answer with the JSON error envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, req| {
        debug!("Rejected query for {}: {}", req.path(), err);
        ApiError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, req| {
        debug!("Rejected body for {}: {}", req.path(), err);
        ApiError::BadRequest(err.to_string()).into()
    }))
    .service(web::resource("/health").route(web::get().to(handlers::health_check)))
        .service(web::resource("/api/auth/login").route(web::post().to(handlers::login)))
        .service(web::resource("/api/auth/logout").route(web::post().to(handlers::logout)))
        .service(web::resource("/api/session").route(web::get().to(handlers::session_info)))
        .service(web::resource("/api/stores").route(web::get().to(handlers::list_stores)))
        .service(web::resource("/api/hubs").route(web::get().to(handlers::list_hubs)))
        .service(web::resource("/api/hubs/{id}").route(web::get().to(handlers::hub_detail)))
        .service(web::resource("/api/hubs/{id}/events").route(web::get().to(handlers::hub_events)))
        .service(
            web::resource("/api/hubs/{id}/regenerate-token")
                .route(web::post().to(handlers::regenerate_hub_token)),
        )
        .service(
            web::resource("/api/machines/validate-binding")
                .route(web::post().to(handlers::validate_binding)),
        )
        .service(web::resource("/api/machines/bind").route(web::post().to(handlers::bind_machine)))
        .service(web::resource("/api/machines/{id}").route(web::get().to(handlers::machine_detail)))
        .service(
            web::resource("/api/machines/{id}/qr-code").route(web::get().to(handlers::machine_qr_code)),
        )
        .service(
            web::resource("/api/users/{id}")
                .route(web::get().to(handlers::get_user))
                .route(web::put().to(handlers::update_user)),
        );
}

/// Starts the dashboard API server
///
/// # Arguments
/// * `config` - Bind address, cookie and paging settings
/// * `backend` - Where the backend API lives
///
/// # Returns
/// * `Result<()>` - Once the server has shut down, or an error
#[instrument(skip(config, backend))]
pub async fn start_server(config: ApiConfig, backend: BackendConfig) -> Result<()> {
    info!("Starting dashboard API server on {}:{}", config.host, config.port);

    let client = BackendClient::new(&backend)
        .with_context(|| format!("Failed to create backend client for {}", backend.base_url))?;
    debug!("Backend client ready for {}", client.base_url());

    let host = config.host.clone();
    let port = config.port;
    let workers = config.workers;
    let state = web::Data::new(AppState::new(client, config));

    let mut server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure));
    if let Some(workers) = workers {
        debug!("Using {} worker threads", workers);
        server = server.workers(workers);
    }

    server
        .bind((host.as_str(), port))
        .map_err(|e| {
            error!("Failed to bind to {}:{}: {}", host, port, e);
            e
        })?
        .run()
        .await
        .context("Dashboard API server failed")?;

    info!("Server shutdown complete");
    Ok(())
}
