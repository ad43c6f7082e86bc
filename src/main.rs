//! Candidate Banner
//!
//! Collage banner generation service for candidate voting pages using Rust + Actix-Web.
//! Each request renders every page of a category's candidates onto a branded
//! template and publishes the PNGs to object storage.

use actix_web::{web, App, HttpServer, middleware};
use tracing::info;
use tracing_actix_web::TracingLogger;
use std::sync::Arc;
use std::time::Instant;

mod api;
mod domain;
mod engine;
mod config;
mod db;
mod storage;

use crate::config::Settings;
use crate::db::{CandidateRepository, DbPool};
use crate::engine::{CollageComposer, HttpAssetFetcher, RequestDefaults};
use crate::storage::ObjectStore;

/// Application state shared across all handlers
pub struct AppState {
    pub composer: Arc<CollageComposer>,
    pub defaults: RequestDefaults,
    pub started_at: Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("candidate_banner=info".parse().unwrap())
                .add_directive("actix_web=info".parse().unwrap())
        )
        .json()
        .init();

    // Load configuration
    let settings = Settings::load().expect("Failed to load configuration");
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    info!(
        "Starting Candidate Banner v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    // Candidate data is required for every request, so fail fast
    let pool = DbPool::new(&settings.database.url, settings.database.max_connections)
        .expect("Failed to create database pool");
    pool.test_connection().await.expect("Database connection test failed");
    info!("Database pool initialized successfully");

    let store = ObjectStore::new(&settings.storage).expect("Failed to configure object storage");
    let fetcher = HttpAssetFetcher::new(&settings.fetch).expect("Failed to build HTTP client");

    let composer = Arc::new(CollageComposer::new(
        Arc::new(CandidateRepository::new(pool)),
        Arc::new(store),
        Arc::new(fetcher),
        settings.assets.clone(),
        settings.render.fallback_title.clone(),
    ));

    // Create shared application state
    let app_state = web::Data::new(AppState {
        composer,
        defaults: RequestDefaults {
            frame_color: settings.render.default_frame_color.clone(),
            text_color: settings.render.default_text_color.clone(),
            bucket: settings.storage.default_bucket.clone(),
        },
        started_at: Instant::now(),
    });

    let workers = settings.server.workers.unwrap_or_else(num_cpus::get);

    // Configure and start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(api::json_config())
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "candidate-banner"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
            )
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
