//! Dropview - upload a file, keep it, look at it.
//!
//! Serves an upload form, stores submitted files in a flat directory and
//! answers each upload with an HTML preview of what was stored.

use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use dropview::{api, config::Config, AppState};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dropview=debug,tower_http=debug".into());
    if config.server.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        upload_dir = %config.upload.upload_dir.display(),
        max_display_bytes = config.upload.max_display_bytes,
        serve_uploads = config.upload.serve_uploads,
        "Starting Dropview on {}:{}",
        config.server.host,
        config.server.port
    );

    let state = AppState::new(config.upload.clone());

    // Build router
    let app = Router::new()
        .merge(api::routes(state.clone()))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
