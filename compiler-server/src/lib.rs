use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use compile_api::{ClientConfig, CompileClient, CompileError};
use compiler_core::{CompilerService, Embed};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Compile error: {0}")]
    Compile(CompileError),
    #[error("Compile service unavailable: {0}")]
    Unavailable(String),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<compiler_core::Error> for ServerError {
    fn from(e: compiler_core::Error) -> Self {
        match e {
            compiler_core::Error::NotFound(what) => ServerError::NotFound(what),
            compiler_core::Error::MalformedInput(why) => ServerError::MalformedInput(why),
            compiler_core::Error::Compile(e) => ServerError::Compile(e),
            compiler_core::Error::ServiceUnavailable(why) => ServerError::Unavailable(why),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            ServerError::MalformedInput(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "You must attach a code-block containing code to your message" }),
            ),
            ServerError::Compile(e) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": e.summary(), "status_code": e.status_code }),
            ),
            ServerError::Unavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": self.to_string() }),
            ),
            ServerError::ServerError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthorQuery {
    #[serde(default = "default_author")]
    pub author: String,
}

fn default_author() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CompileBody {
    #[serde(default = "default_author")]
    pub author: String,
    /// Language or compiler name
    pub target: String,
    /// Chat message holding a fenced code block
    pub message: String,
    /// Set once the user has approved the preview
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CompileResponse {
    pub confirmation_required: bool,
    pub compiler: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Embed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Embed>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TemplateResponse {
    pub message: String,
}

#[derive(Clone)]
pub struct AppState {
    service: CompilerService,
}

pub fn create_app(config: ClientConfig) -> Result<Router, ServerError> {
    let client = CompileClient::new(config).map_err(|e| ServerError::ServerError(e.to_string()))?;
    Ok(router(CompilerService::new(Arc::new(client))))
}

pub fn router(service: CompilerService) -> Router {
    let state = AppState { service };

    let cors = CorsLayer::permissive();

    Router::new()
        .route("/health", get(health_check))
        .route("/languages", get(languages))
        .route("/languages/{name}", get(language_info))
        .route("/templates/{id}", get(template))
        .route("/compile", post(compile))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("Starting compiler server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn languages(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> Result<Json<Vec<Embed>>, ServerError> {
    Ok(Json(state.service.list_languages(&query.author).await?))
}

async fn language_info(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<AuthorQuery>,
) -> Result<Json<Vec<Embed>>, ServerError> {
    Ok(Json(state.service.language_info(&query.author, &name).await?))
}

async fn template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TemplateResponse>, ServerError> {
    let message = state.service.template(&id).await?;
    Ok(Json(TemplateResponse { message }))
}

async fn compile(
    State(state): State<AppState>,
    Json(payload): Json<CompileBody>,
) -> Result<Json<CompileResponse>, ServerError> {
    let prepared = state
        .service
        .prepare_compile(&payload.author, &payload.target, &payload.message)
        .await?;

    if !payload.confirmed {
        return Ok(Json(CompileResponse {
            confirmation_required: true,
            compiler: prepared.compiler.name,
            preview: Some(prepared.preview),
            result: None,
        }));
    }

    let result = state
        .service
        .run_compile(&payload.author, &prepared)
        .await
        .inspect_err(|e| error!("Compile request failed: {}", e))?;

    Ok(Json(CompileResponse {
        confirmation_required: false,
        compiler: prepared.compiler.name,
        preview: None,
        result: Some(result),
    }))
}
