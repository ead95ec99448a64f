//! # mdi Upload Receiver
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! The axum server behind `mdi serve`. Routes:
//!
//! - `POST /create_tar[?image=<name>]`: stage the body as a temp archive,
//!   check it is a non-empty tar, import it with the container tool, and
//!   answer with the tool output.
//! - `GET /health`: liveness probe, answers `ok`.
//!
//! ## Architecture
//!
//! 1. `run_server` binds the listener and serves until Ctrl+C or SIGTERM.
//! 2. `create_app` builds the router with request tracing and an upload size
//!    limit.
//! 3. `create_tar` handles one upload. Requests are independent, and each
//!    one owns its own `TempArchive`, so the staged file is removed when the
//!    handler finishes, whatever the outcome.
//!
//! Status codes: `400` for a body that is not a usable tar archive, `500` for
//! a failure to stage or import, `200` otherwise.
//!
use crate::common::archive::tar::list_members;
use crate::common::docker::import;
use crate::common::fs::temp::TempArchive;
use crate::common::network::http::UPLOAD_PATH;
use crate::core::config::{ContainerConfig, ServeConfig};
use crate::core::error::Result;
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;

/// Per-server settings shared by all requests.
#[derive(Debug)]
pub struct AppState {
    pub image: String,
    pub work_dir: PathBuf,
    pub container: ContainerConfig,
}

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    image: Option<String>,
}

/// # Run Upload Receiver (`run_server`)
///
/// Binds `serve.host:serve.port` and serves the receiver until a shutdown
/// signal arrives.
///
/// ## Errors
///
/// Fails if the listener cannot be bound or the server stops with an error.
pub async fn run_server(serve: ServeConfig, container: ContainerConfig) -> Result<()> {
    let addr = SocketAddr::new(serve.host, serve.port);
    let app = create_app(Arc::new(AppState {
        image: serve.image.clone(),
        work_dir: serve.work_dir.clone(),
        container,
    }));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    println!("📦 Receiving uploads on http://{}/{}", addr, UPLOAD_PATH);
    println!("🏷️  Default image:     {}", serve.image);
    println!("📂 Staging directory: {}", serve.work_dir.display());
    info!("Starting upload receiver on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Builds the router: upload and health routes plus tracing.
pub fn create_app(state: Arc<AppState>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default())
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route(&format!("/{}", UPLOAD_PATH), post(create_tar))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(trace_layer)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn create_tar(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImportQuery>,
    body: Bytes,
) -> (StatusCode, String) {
    // A per-request `?image=` wins over the server default; blank means unset.
    let image = query
        .image
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.image.clone());
    info!("Received {} byte archive for image '{}'", body.len(), image);

    match receive_archive(&state, &image, body).await {
        Ok(output) => (StatusCode::OK, output),
        Err((status, message)) => {
            error!("Upload for '{}' rejected ({}): {}", image, status, message);
            (status, message)
        }
    }
}

async fn receive_archive(
    state: &AppState,
    image: &str,
    body: Bytes,
) -> std::result::Result<String, (StatusCode, String)> {
    // Stage the body; the guard removes it however this request ends.
    let staged = TempArchive::new_in(&state.work_dir).map_err(internal)?;
    tokio::fs::write(staged.path(), &body)
        .await
        .map_err(|e| internal(e.into()))?;

    // Reading the archive is blocking I/O, keep it off the async workers.
    let path = staged.path().to_path_buf();
    let members = tokio::task::spawn_blocking(move || list_members(&path))
        .await
        .map_err(|e| internal(e.into()))?
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Not a valid tar archive: {:#}", e),
            )
        })?;
    if members.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Archive contains no files".to_string(),
        ));
    }
    info!("Archive holds {} member(s)", members.len());

    // Only a well-formed, non-empty archive reaches the container tool.
    let output = import::import_archive(&state.container, staged.path(), image)
        .await
        .map_err(internal)?;

    if let Err(e) = staged.close() {
        warn!("{:#}", e);
    }
    Ok(output)
}

fn internal(err: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", err))
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, initiating graceful shutdown...");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
