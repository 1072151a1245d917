//! Authentify backend
//!
//! Business verification directory: listing, vetting workflow, reviews and
//! trust reporting behind an axum JSON API.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};

use config::StorageBackend;
use external::{DisabledGeocoder, Geocoder, NominatimGeocoder};
use store::{PgRepository, Store};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Arc<Config>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    pub fn new(store: Store, config: Config, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            store,
            config: Arc::new(config),
            geocoder,
        }
    }

    /// In-memory state without geocoding, for tests and embedding
    pub fn in_memory(config: Config) -> Self {
        Self::new(Store::in_memory(), config, Arc::new(DisabledGeocoder))
    }
}

/// Build the store selected by `storage.backend`
pub async fn build_store(config: &Config) -> AppResult<Store> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Ok(Store::in_memory())
        }
        StorageBackend::Postgres => {
            let database = config.database.as_ref().ok_or_else(|| {
                AppError::Configuration("database section required for postgres storage".into())
            })?;

            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .acquire_timeout(Duration::from_secs(30))
                .connect(&database.url)
                .await?;
            tracing::info!("Database connection established");

            let repo = PgRepository::new(pool);
            tracing::info!("Running database migrations...");
            repo.migrate().await?;
            tracing::info!("Migrations completed");

            Ok(Store::new(Arc::new(repo)))
        }
    }
}

/// Build the geocoder selected by `geocoding.enabled`
pub fn build_geocoder(config: &Config) -> AppResult<Arc<dyn Geocoder>> {
    if config.geocoding.enabled {
        tracing::info!("Geocoding via {}", config.geocoding.endpoint);
        Ok(Arc::new(NominatimGeocoder::new(&config.geocoding)?))
    } else {
        Ok(Arc::new(DisabledGeocoder))
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Authentify API v1.0"
}
