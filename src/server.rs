use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::catalog::ToolCatalog;
use crate::config::Config;
use crate::history::HistoryLog;
use crate::models::{
    AppSettings, ErrorResponse, HealthResponse, MessageResponse, Tool, ToolHistoryEntry,
    ToolRequest, ToolResponse,
};
use crate::tools;

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<ToolCatalog>,
    settings: Arc<RwLock<AppSettings>>,
    history: Arc<RwLock<HistoryLog>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: Arc::new(ToolCatalog::builtin()),
            settings: Arc::new(RwLock::new(AppSettings::default())),
            history: Arc::new(RwLock::new(HistoryLog::new(config.history_limit))),
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<Tool>> {
    Json(state.catalog.all().to_vec())
}

async fn get_tool(
    State(state): State<AppState>,
    Path(tool_id): Path<String>,
) -> Result<Json<Tool>, ApiError> {
    match state.catalog.get(&tool_id) {
        Some(tool) => Ok(Json(tool.clone())),
        None => Err(not_found(&tool_id)),
    }
}

async fn process_tool(
    State(state): State<AppState>,
    Path(tool_id): Path<String>,
    Json(request): Json<ToolRequest>,
) -> Result<Json<ToolResponse>, ApiError> {
    if !state.catalog.contains(&tool_id) {
        return Err(not_found(&tool_id));
    }

    let response = tools::process(&tool_id, &request);
    match &response.error {
        None => {
            info!(tool_id = %tool_id, input_len = request.input.len(), "Processed tool request");
            if state.settings.read().await.tool_history {
                state.history.write().await.record(&tool_id, &request, &response);
            }
        }
        Some(error) => {
            warn!(tool_id = %tool_id, error = %error, "Tool processing failed");
        }
    }

    Ok(Json(response))
}

async fn get_settings(State(state): State<AppState>) -> Json<AppSettings> {
    Json(state.settings.read().await.clone())
}

async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> Json<MessageResponse> {
    info!(?settings, "Settings updated");
    *state.settings.write().await = settings;
    Json(MessageResponse {
        message: "Settings updated successfully".to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
    tool: Option<String>,
}

async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<ToolHistoryEntry>> {
    let limit = query.limit.unwrap_or(50);
    let history = state.history.read().await;
    let entries = match query.tool {
        Some(tool_id) => history.for_tool(&tool_id, limit),
        None => history.recent(limit),
    };
    Json(entries)
}

fn not_found(tool_id: &str) -> ApiError {
    let mut error = ErrorResponse::new("Tool not found", "NOT_FOUND");
    error.details = Some(format!("No tool with id '{}'", tool_id));
    (StatusCode::NOT_FOUND, Json(error))
}

pub fn create_router(state: AppState, config: &Config) -> Router {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/health", get(health))
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:tool_id", get(get_tool))
        .route("/api/tools/:tool_id/process", post(process_tool))
        .route("/api/settings", get(get_settings).post(update_settings))
        .route("/api/history", get(get_history))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(state: AppState, config: &Config) -> Result<()> {
    let app = create_router(state, config);

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to {}", addr))?;

    info!("Web tools API listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
