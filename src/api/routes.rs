//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::ChatRelay;
use crate::config::Config;
use crate::llm::{LlmClient, OpenAiCompatClient, Role};
use crate::tools::{ToolInvocation, ToolRegistry};

use super::types::{ChatRequest, ChatResponse, ErrorResponse, ExecuteToolResponse, HealthResponse};

/// Shared, read-only state for all handlers.
pub struct AppState {
    pub config: Config,
    pub tools: ToolRegistry,
    pub relay: ChatRelay,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiCompatClient::new(
            config.llm.base_url.clone(),
            config.llm.api_key.clone(),
            config.llm.timeout,
        ));
        Self::with_llm(config, llm)
    }

    pub fn with_llm(config: Config, llm: Arc<dyn LlmClient>) -> Self {
        let tools = ToolRegistry::new(&config);
        let relay = ChatRelay::new(llm, config.llm.model.clone(), &tools);
        Self {
            config,
            tools,
            relay,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/execute_tool", post(execute_tool))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        llm: state.config.llm.base_url.clone(),
    })
}

/// POST /chat - relay the conversation to the LLM.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let reply = state
        .relay
        .reply(&request.messages, &request.context_files)
        .await
        .map_err(|e| {
            tracing::error!("Chat relay failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    detail: e.to_string(),
                }),
            )
        })?;

    Ok(Json(ChatResponse {
        role: Role::Assistant,
        content: reply.content,
        tool_call: reply.tool_call,
    }))
}

/// POST /execute_tool - run one tool call; failures come back as text.
pub async fn execute_tool(
    State(state): State<Arc<AppState>>,
    Json(invocation): Json<ToolInvocation>,
) -> Json<ExecuteToolResponse> {
    Json(ExecuteToolResponse {
        result: state.tools.execute(&invocation).await,
    })
}
