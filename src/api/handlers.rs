//! HTTP request handlers for the study endpoints

use crate::api::form::FormData;
use crate::api::models::{
    AddGoalResponse, ChatForm, ChatResponse, ErrorResponse, GoalForm, HealthResponse,
    OcrResponse, PlannerResponse, SummarizeResponse, UploadForm,
};
use crate::error::AppError;
use crate::study::{
    flashcards::derive_flashcards,
    planner::{goal_added_message, planned_goals, GoalRecord},
    raster::decode_to_png_blocking,
    DOCUMENT_SUMMARY, MISSING_CONTEXT_RESPONSE, OCR_SUMMARY,
};
use crate::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Summarize an uploaded text document and cut flashcards from it
#[utoipa::path(
    post,
    path = "/summarize",
    tag = "Study",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Summary and flashcards", body = SummarizeResponse),
        (status = 422, description = "Missing upload", body = ErrorResponse),
        (status = 500, description = "Undecodable text or model failure", body = ErrorResponse),
    )
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    mut form: FormData,
) -> Result<Json<SummarizeResponse>, AppError> {
    let upload = form.file("file")?;
    info!(
        file_name = ?upload.file_name,
        bytes = upload.bytes.len(),
        "Received summarize request"
    );

    let text = String::from_utf8(upload.bytes.to_vec())?;
    let summary = state.models.summarizer.summarize(&text, DOCUMENT_SUMMARY).await?;
    let flashcards = derive_flashcards(&text);

    info!(flashcards = flashcards.len(), "Summarize completed");

    Ok(Json(SummarizeResponse { summary, flashcards }))
}

/// Recognize text in an uploaded image and summarize it
#[utoipa::path(
    post,
    path = "/ocr",
    tag = "Study",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Recognized text and summary", body = OcrResponse),
        (status = 422, description = "Missing upload", body = ErrorResponse),
        (status = 500, description = "Undecodable image or model failure", body = ErrorResponse),
    )
)]
pub async fn ocr(
    State(state): State<Arc<AppState>>,
    mut form: FormData,
) -> Result<Json<OcrResponse>, AppError> {
    let upload = form.file("file")?;
    info!(
        file_name = ?upload.file_name,
        content_type = ?upload.content_type,
        bytes = upload.bytes.len(),
        "Received OCR request"
    );

    let png = decode_to_png_blocking(upload.bytes.to_vec()).await?;
    let text = state.models.text_recognizer.recognize(&png).await?;
    debug!(chars = text.len(), "Text recognized");

    let summary = state.models.summarizer.summarize(&text, OCR_SUMMARY).await?;

    Ok(Json(OcrResponse { text, summary }))
}

/// Answer a question from the supplied document context
#[utoipa::path(
    post,
    path = "/chat",
    tag = "Study",
    request_body(content = ChatForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Answer span, or a prompt for context", body = ChatResponse),
        (status = 422, description = "Missing query", body = ErrorResponse),
        (status = 500, description = "Model failure", body = ErrorResponse),
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    mut form: FormData,
) -> Result<Json<ChatResponse>, AppError> {
    let request = ChatForm::from_form(&mut form)?;
    info!(
        query_len = request.query.len(),
        context_len = request.context.len(),
        "Received chat request"
    );

    let response = if request.context.is_empty() {
        MISSING_CONTEXT_RESPONSE.to_string()
    } else {
        state
            .models
            .question_answerer
            .answer(&request.query, &request.context)
            .await?
    };

    Ok(Json(ChatResponse { response }))
}

/// List study goals
#[utoipa::path(
    get,
    path = "/planner",
    tag = "Planner",
    responses((status = 200, description = "Planned goals", body = PlannerResponse))
)]
pub async fn planner() -> Json<PlannerResponse> {
    Json(PlannerResponse {
        goals: planned_goals(),
    })
}

/// Acknowledge a study goal; it is not stored
#[utoipa::path(
    post,
    path = "/add_goal",
    tag = "Planner",
    request_body(content = GoalForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Confirmation message", body = AddGoalResponse),
        (status = 422, description = "Missing field", body = ErrorResponse),
    )
)]
pub async fn add_goal(mut form: FormData) -> Result<Json<AddGoalResponse>, AppError> {
    let goal: GoalRecord = GoalForm::from_form(&mut form)?.into();
    info!(text = %goal.text, deadline = %goal.deadline, "Received goal");

    Ok(Json(AddGoalResponse {
        message: goal_added_message(&goal),
    }))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Model backend status", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let models = state.models.statuses();
    let all_up = models.iter().all(|m| m.enabled && m.healthy);

    Json(HealthResponse {
        status: if all_up { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        models,
    })
}
