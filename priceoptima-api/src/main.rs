use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use priceoptima_api::{app, AppState};
use priceoptima_pricing::{PricingPolicy, PricingService};
use priceoptima_store::{Config, ModelRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "priceoptima_api=debug,priceoptima_pricing=debug,priceoptima_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting PriceOptima API on port {}", config.server.port);

    // Model artifacts are loaded once; any failure here stops the process.
    let loaded = ModelRepository::new(&config.model.schema_path, &config.model.artifact_path)
        .load()
        .context("Failed to load model artifacts")?;
    tracing::info!("Model loaded with {} features", loaded.schema.len());

    let pricing = PricingService::new(loaded.schema, loaded.model, PricingPolicy::default())
        .context("Model does not match feature schema")?;

    let app_state = AppState::new(
        Arc::new(pricing),
        Duration::from_millis(config.model.inference_timeout_ms),
    );

    let app = app(app_state, &config.server.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
