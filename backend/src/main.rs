//! Authentify - Backend Server
//!
//! Business verification directory API.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authentify_backend::{build_geocoder, build_store, create_app, store::seed, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "authentify_server=debug,authentify_backend=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Authentify Server");
    tracing::info!("Environment: {}", config.environment);

    let store = build_store(&config).await?;
    if config.seed_demo_data {
        seed::seed_demo_data(&store, config.password.bcrypt_cost).await?;
    }
    let geocoder = build_geocoder(&config)?;

    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));

    // Create application state
    let state = AppState::new(store, config, geocoder);

    // Build application
    let app = create_app(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
