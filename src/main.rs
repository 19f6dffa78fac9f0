use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zcb_registry::config::Config;
use zcb_registry::handlers::{self, AppState};
use zcb_registry::lookup::RegistryLookup;

/// Main entry point for the registry lookup service.
///
/// Initializes tracing, loads configuration, builds the lookup client with its
/// file-backed cache and serves the HTTP routes.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zcb_registry=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let lookup = RegistryLookup::from_config(&config)?;
    tracing::info!(
        "Registry lookup client initialized (cache: {})",
        config.cache_file.display()
    );

    let app = handlers::router(Arc::new(AppState { lookup }));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
