#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web demo backend for the blight map.
//!
//! Serves the read side of the backend API the map client consumes
//! (point collections in pins / heat / grid flavors, pin detail lookups)
//! over an in-memory store seeded with demo reports, plus static boundary
//! documents for the area selector. Registration submission targets the
//! production backend and is not implemented here.

mod handlers;
pub mod store;

use std::sync::RwLock;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use chrono::{Duration, Utc};

use crate::store::ReportStore;

/// Directory the boundary documents are served from.
pub const BOUNDARY_DATA_DIR: &str = "data/boundaries";

/// Shared application state.
pub struct AppState {
    /// Registered reports. Read-mostly; the lock keeps the store ready
    /// for a future write endpoint.
    pub store: RwLock<ReportStore>,
}

/// Starts the demo backend server.
///
/// Seeds the in-memory store with demo reports spread over the half year
/// before today, then serves the API on `BIND_ADDR`:`PORT`
/// (default `127.0.0.1:8080`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let latest_day = (Utc::now() - Duration::days(1)).date_naive();
    log::info!("Seeding demo report store...");
    let store = ReportStore::seed_demo(rand::random(), latest_day);
    log::info!("Seeded {} demo reports", store.len());

    let state = web::Data::new(AppState {
        store: RwLock::new(store),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/pins/{species}/detail", web::get().to(handlers::detail))
                    .route("/pins/{species}", web::get().to(handlers::points))
                    .route("/heat/{species}", web::get().to(handlers::points))
                    .route("/grid/{species}", web::get().to(handlers::points)),
            )
            // Serve boundary documents for the area selector
            .service(Files::new("/boundaries", BOUNDARY_DATA_DIR))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
