use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dashboard_engine::{AggregationView, AlertTriage, ChartsView, DashboardPage, Surface};
use models::AnalysisResult;
use serde::{Deserialize, Serialize};
use session::{AskOutcome, Rejection, RenderedMessage};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState, Result};

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "leakscope-api"
    }))
}

/// POST /api/results
/// Loads an analysis result, replacing the current one, and starts a fresh chat.
/// Responds with the compact summary of what was loaded.
pub async fn load_result(
    State(state): State<AppState>,
    Json(result): Json<AnalysisResult>,
) -> Result<impl IntoResponse> {
    let result = state.context.load(result);
    state.chat.reset();

    Ok((StatusCode::CREATED, Json(AggregationView::summary(&result))))
}

/// GET /api/results
/// Returns the raw loaded result
pub async fn get_result(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let result = state.context.current()?;
    Ok(Json(result.as_ref().clone()))
}

/// DELETE /api/results
/// Ends the session: forgets the result and the chat transcript
pub async fn clear_result(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.context.clear()?;
    state.chat.reset();
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/dashboard
/// Full results page: every list uncapped, banner, both charts
pub async fn get_dashboard(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let result = state.context.current()?;
    Ok(Json(DashboardPage::build(&result, Surface::Full)))
}

/// GET /api/summary
/// Compact results page: same sections, flagged lines capped
pub async fn get_summary(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let result = state.context.current()?;
    Ok(Json(DashboardPage::build(&result, Surface::Compact)))
}

/// GET /api/alerts
pub async fn get_alerts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let result = state.context.current()?;
    Ok(Json(AlertTriage::new(&result.alerts).panel()))
}

/// GET /api/charts
pub async fn get_charts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let result = state.context.current()?;
    let view = AggregationView::dashboard(&result);
    Ok(Json(ChartsView::from_view(&view)))
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Only present in answer to a question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<AskOutcome>,
    pub in_flight: bool,
    pub messages: Vec<RenderedMessage>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

/// GET /api/chat
/// Current transcript, escaped for display
pub async fn get_chat(State(state): State<AppState>) -> impl IntoResponse {
    Json(ChatResponse {
        ask: None,
        in_flight: state.chat.is_in_flight(),
        messages: state.chat.rendered_transcript(),
    })
}

/// POST /api/chat
/// Asks the assistant about the loaded result. Blank and overlapping questions
/// are reported in `ask` and leave the transcript alone.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<impl IntoResponse> {
    let outcome = state.chat.ask(&request.query, &state.context).await;
    if outcome == AskOutcome::Rejected(Rejection::NotLoaded) {
        return Err(ApiError::NotLoaded);
    }

    Ok(Json(ChatResponse {
        ask: Some(outcome),
        in_flight: state.chat.is_in_flight(),
        messages: state.chat.rendered_transcript(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NewDoubt {
    pub text: String,
}

/// GET /api/doubts
pub async fn list_doubts(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(Json(state.doubts.view()?))
}

/// POST /api/doubts
pub async fn add_doubt(
    State(state): State<AppState>,
    Json(doubt): Json<NewDoubt>,
) -> Result<impl IntoResponse> {
    let doubt = state.doubts.add(&doubt.text)?;
    Ok((StatusCode::CREATED, Json(doubt)))
}

/// DELETE /api/doubts/:id
pub async fn remove_doubt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.doubts.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/doubts/:id/toggle
/// Flips the resolved flag and returns the updated list
pub async fn toggle_doubt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.doubts.toggle_resolved(id)?;
    Ok(Json(state.doubts.view()?))
}
