//! HTTP surface for idea-forge
//!
//! Axum router serving the input and result views, the sandboxed frame
//! documents for webpage results, downloads, and plain health/info
//! endpoints.

use axum::{
    Form, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{
    config::Config,
    error::{IdeaForgeError, Result},
    forge::Forge,
    input::SubmitForm,
    pages,
    render::{FrameRegistry, frame::FRAME_SANDBOX},
};

/// Shared state for HTTP server
#[derive(Clone)]
pub struct HttpState {
    pub config: Arc<Config>,
    pub forge: Forge,
    pub frames: FrameRegistry,
    pub has_credential: bool,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Info endpoint
pub async fn info_handler(State(state): State<HttpState>) -> impl IntoResponse {
    axum::Json(json!({
        "generation": {
            "model": state.forge.model(),
            "credential_configured": state.has_credential,
        },
        "server": {
            "bind": state.config.server.bind.to_string(),
        },
        "frames_live": state.frames.len(),
    }))
}

/// Current view: result when one is displayed, the input form otherwise
pub async fn index_handler(State(state): State<HttpState>) -> Html<String> {
    Html(
        state
            .forge
            .with_session(|session| match session.displayed() {
                Some(displayed) => pages::result_page(displayed),
                None => pages::input_page(
                    session.draft(),
                    session.is_generating(),
                    session.error(),
                ),
            })
            .await,
    )
}

pub async fn generate_handler(
    State(state): State<HttpState>,
    Form(form): Form<SubmitForm>,
) -> Response {
    let Some(request) = form.into_request() else {
        tracing::debug!("Ignoring submit with blank idea and URL");
        return Redirect::to("/").into_response();
    };

    match state.forge.submit(request).await {
        // Failures are already in the session as the banner
        Ok(()) | Err(IdeaForgeError::Generation(_)) => Redirect::to("/").into_response(),
        Err(IdeaForgeError::Busy) => {
            let page = state
                .forge
                .with_session(|session| {
                    pages::input_page(session.draft(), true, None)
                })
                .await;
            (StatusCode::CONFLICT, Html(page)).into_response()
        }
        Err(err) => {
            tracing::error!("Submit failed: {}", err);
            (err.status_code(), err.user_message()).into_response()
        }
    }
}

pub async fn reset_handler(State(state): State<HttpState>) -> Response {
    match state.forge.reset().await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(err) => (err.status_code(), err.user_message()).into_response(),
    }
}

/// Webpage result document. The CSP sandbox applies even when the frame
/// URL is opened directly, so the document never runs same-origin.
pub async fn frame_handler(
    State(state): State<HttpState>,
    Path(id): Path<String>,
) -> Response {
    let Some(document) = Uuid::parse_str(&id).ok().and_then(|id| state.frames.get(&id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (
                header::CONTENT_SECURITY_POLICY,
                format!("sandbox {FRAME_SANDBOX}"),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        document.to_string(),
    )
        .into_response()
}

pub async fn download_handler(State(state): State<HttpState>) -> Response {
    match state.forge.download().await {
        Some(file) => (
            [
                (header::CONTENT_TYPE, file.content_type()),
                (header::CONTENT_DISPOSITION, file.content_disposition()),
            ],
            file.body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Build the application router
pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/generate", post(generate_handler))
        .route("/reset", post(reset_handler))
        .route("/frame/:id", get(frame_handler))
        .route("/download", get(download_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_http_server(state: HttpState) -> Result<()> {
    let bind = state.config.server.bind;
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!(
        "Starting Idea Forge on http://{} (model {})",
        bind,
        state.forge.model()
    );

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
