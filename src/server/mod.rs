//! Server module - HTTP prediction API over the fitted pipeline

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use errors::ApiError;
pub use models::*;
pub use state::{AppState, ModelState};

/// Build the router over an already-initialised state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the model once, then serve until the process stops
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let model = ModelState::load(&config.model_path);
    if let ModelState::Unloaded { reason } = &model {
        tracing::warn!("Serving without a model: {}", reason);
    }
    let state = Arc::new(AppState::new(model));

    let app = router(state);
    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
