//! Credrisk prediction server
//!
//! Loads the fitted pipeline once and serves `GET /` and `POST /predict`.

use credrisk::server::{self, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credrisk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(model_path = %config.model_path.display(), "Configuration loaded");

    server::run(config).await
}
