//! # Layout Preview Server
//!
//! A small stateless HTTP helper for host frontends: renders template previews,
//! computes fits, and converts canvas-space moves into image-space items using
//! the same propagation path as interactive edits.
//!
//! ## Usage
//!
//! ```bash
//! stencil serve --listen 0.0.0.0:8080
//! ```

mod handlers;
mod state;

pub use state::{BACKGROUND_EXPIRATION_SECS, CachedImageSource, ServerConfig};

use axum::{Router, routing::post};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::background::{HttpImageSource, ImageSource};
use crate::error::StencilError;
use state::AppState;

/// Build the router over the given background source.
pub fn router(source: Arc<dyn ImageSource>) -> Router {
    build(source).0
}

fn build(source: Arc<dyn ImageSource>) -> (Router, Arc<AppState>) {
    let app_state = Arc::new(AppState::new(source));

    let app = Router::new()
        .route("/api/layout/preview", post(handlers::layout::preview))
        .route("/api/layout/fit", post(handlers::layout::fit))
        .route("/api/layout/commit", post(handlers::layout::commit))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());

    (app, app_state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use stencil::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), stencil::error::StencilError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), StencilError> {
    let source: Arc<dyn ImageSource> = Arc::new(HttpImageSource::new()?);
    let (app, app_state) = build(source);

    tokio::spawn(cleanup_backgrounds(app_state));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            StencilError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    tracing::info!(addr = %config.listen_addr, "stencil preview server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| StencilError::Transport(format!("Server error: {}", e)))?;

    Ok(())
}

/// Background task to drop backgrounds nobody asked for in a while.
async fn cleanup_backgrounds(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    let expiration = Duration::from_secs(BACKGROUND_EXPIRATION_SECS);

    loop {
        interval.tick().await;
        let removed = state.backgrounds.evict_idle(expiration).await;
        if removed > 0 {
            let remaining = state.backgrounds.len().await;
            tracing::debug!(removed, remaining, "evicted idle backgrounds");
        }
    }
}
