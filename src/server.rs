//! JSON HTTP server.
//!
//! Exposes the engine operations to editors and dashboards.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/analyze` | Keywords and link suggestions for `{document_id, content}` |
//! | `GET`  | `/orphaned` | One page of orphaned documents (`post_type`, `page`, `per_page`) |
//! | `GET`  | `/stats/{id}` | Outgoing and incoming link counts for one document |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one shape:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "invalid input: content must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based editors
//! can call the API directly.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use linkpilot_core::links::SiteContext;
use linkpilot_core::models::{Analysis, DocumentId, LinkStats, OrphanResult};
use linkpilot_core::signals::ExclusionSignals;
use linkpilot_core::{Engine, EngineError, EngineSettings};

use crate::config::Config;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: Arc<SqliteStore>,
    site: Arc<SiteContext>,
    signals: Arc<ExclusionSignals>,
    settings: Arc<EngineSettings>,
}

impl AppState {
    /// Open the database and build the engine collaborators from `config`.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            store: Arc::new(SqliteStore::open(config).await?),
            site: Arc::new(config.site_context()?),
            signals: Arc::new(config.exclusion_signals()),
            settings: Arc::new(config.engine_settings()),
            config: Arc::new(config.clone()),
        })
    }

    fn engine(&self) -> Engine<'_, SqliteStore> {
        Engine::new(
            self.store.as_ref(),
            self.site.as_ref(),
            self.signals.as_ref(),
            self.settings.as_ref(),
        )
    }
}

/// The application router with CORS applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/orphaned", get(handle_orphaned))
        .route("/stats/{id}", get(handle_stats))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server.
///
/// Binds to the address configured in `[server].bind` and runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config).await?;
    let bind_addr = config.server.bind.clone();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server listening");
    println!("LinkPilot server listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Engine errors keep their meaning; anything else is a 500.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<EngineError>() {
            Some(EngineError::InvalidInput(_)) => bad_request(err.to_string()),
            Some(EngineError::NotFound(_)) => not_found(err.to_string()),
            _ => {
                tracing::error!(error = %format!("{:#}", err), "request failed");
                internal(err.to_string())
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /analyze ============

#[derive(Deserialize)]
struct AnalyzeRequest {
    document_id: DocumentId,
    #[serde(default)]
    content: String,
}

/// Handler for `POST /analyze`.
///
/// Returns `400` when the body is malformed or `content` is blank.
async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Analysis>, AppError> {
    let Json(req) = payload.map_err(|e| bad_request(e.body_text()))?;
    let analysis = state
        .engine()
        .analyze(req.document_id, &req.content)
        .await?;
    Ok(Json(analysis))
}

// ============ GET /orphaned ============

#[derive(Deserialize)]
struct OrphanedParams {
    /// Comma-separated document types.
    post_type: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

fn split_types(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Handler for `GET /orphaned`.
async fn handle_orphaned(
    State(state): State<AppState>,
    params: Result<Query<OrphanedParams>, QueryRejection>,
) -> Result<Json<OrphanResult>, AppError> {
    let Query(params) = params.map_err(|e| bad_request(e.body_text()))?;
    let types = split_types(params.post_type.as_deref());
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(state.config.orphans.per_page);

    // The graph build is CPU-bound; keep it off the async workers.
    let runtime = tokio::runtime::Handle::current();
    let result = tokio::task::spawn_blocking(move || {
        runtime.block_on(async { state.engine().list_orphans(&types, page, per_page).await })
    })
    .await
    .map_err(|e| internal(format!("orphan scan failed: {}", e)))??;
    Ok(Json(result))
}

// ============ GET /stats/{id} ============

/// Handler for `GET /stats/{id}`.
async fn handle_stats(
    State(state): State<AppState>,
    id: Result<Path<DocumentId>, PathRejection>,
) -> Result<Json<LinkStats>, AppError> {
    let Path(id) = id.map_err(|e| bad_request(e.body_text()))?;
    let stats = state.engine().get_stats(id).await?;
    Ok(Json(stats))
}
