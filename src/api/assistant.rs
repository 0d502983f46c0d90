//! Legal assistant endpoints

use axum::extract::State;
use tracing::info;

use super::middleware::truncate_for_log;
use super::state::AppState;
use super::types::{
    AnswerResponse, ApiError, CacheStatsResponse, ChatRequest, EvaluateRequest, Json,
    ProjectChatRequest,
};
use crate::domain::Audience;

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let audience: Audience = request.user_type.parse()?;
    info!(
        audience = %audience,
        message = %truncate_for_log(&request.message, 80),
        "Chat request"
    );

    let answer = state.assistant.chat(&request.message, audience).await?;

    Ok(Json(answer.into()))
}

/// POST /evaluate
pub async fn evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    info!(project_id = %request.id, "Evaluation request");

    let answer = state
        .assistant
        .evaluate(&request.id, &request.description)
        .await?;

    Ok(Json(answer.into()))
}

/// POST /project_chat
pub async fn project_chat(
    State(state): State<AppState>,
    Json(request): Json<ProjectChatRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    info!(project_id = %request.project_id, "Project chat request");

    let answer = state
        .assistant
        .project_chat(&request.project_id, &request.message)
        .await?;

    Ok(Json(answer.into()))
}

/// GET /cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache = state.cache();

    Json(CacheStatsResponse::new(cache.is_enabled(), cache.stats().await))
}
