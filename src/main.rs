use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geocode_gateway::config::Config;
use geocode_gateway::geocoding_client::GeocodingClient;
use geocode_gateway::handlers::AppState;
use geocode_gateway::resolver::Resolver;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, wires the geocoding client into
/// the resolver and starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geocode_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let client = GeocodingClient::new(
        config.geocode_base_url.clone(),
        config.google_api_key.clone(),
        config.request_timeout,
    )?;
    tracing::info!("Geocoding client initialized: {}", config.geocode_base_url);

    // Build application state
    let app_state = Arc::new(AppState {
        resolver: Resolver::new(client),
        config: config.clone(),
    });

    let app = geocode_gateway::api::router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
