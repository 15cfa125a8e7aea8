//! HTTP surface: `POST /transform` streams the annotated array back,
//! `GET /health` reports liveness.

use crate::config::ServerConfig;
use crate::core::json_stream::{decode_records, encode_array};
use crate::core::transform::UtmTransformer;
use crate::utils::error::{Result, TransformError};
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use futures::{stream, StreamExt};
use serde_json::json;
use tower_http::trace::TraceLayer;

pub const TRANSFORM_FAILURE_BODY: &str = "An error occured during transform of input";

#[derive(Clone, Debug)]
pub struct AppState {
    pub transformer: UtmTransformer,
}

impl AppState {
    pub fn new(transformer: UtmTransformer) -> Self {
        Self { transformer }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/transform", post(transform))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The first chunk (opening bracket plus first record) is produced before
/// any header is sent, so failures there become a clean 500. Later failures
/// can only cut the body short.
pub async fn transform(State(state): State<AppState>, body: Body) -> Response {
    let records = decode_records(body.into_data_stream());
    let mut output = Box::pin(encode_array(records, state.transformer.clone()));

    let first = match output.next().await {
        Some(Ok(first)) => first,
        Some(Err(e)) => return failure_response(&e),
        None => {
            return failure_response(&TransformError::InvalidStream {
                message: "no output produced".to_string(),
            })
        }
    };

    let rest = output.map(|chunk| {
        if let Err(e) = &chunk {
            tracing::error!(
                category = ?e.category(),
                "Transform failed mid-stream, response truncated: {}",
                e
            );
        }
        chunk
    });
    let body = Body::from_stream(stream::once(async move { Ok(first) }).chain(rest));

    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn failure_response(error: &TransformError) -> Response {
    tracing::error!(category = ?error.category(), "Transform failed: {}", error);
    (StatusCode::INTERNAL_SERVER_ERROR, TRANSFORM_FAILURE_BODY).into_response()
}

pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
