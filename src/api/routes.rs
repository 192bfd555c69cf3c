//! HTTP route definitions

use crate::api::handlers;
use crate::api::models::*;
use crate::backend::BackendStatus;
use crate::study::planner::GoalRecord;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Study Serving Gateway API",
        version = "0.1.0",
        description = "Summarization, question answering and OCR for study material, plus a study planner.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        handlers::summarize,
        handlers::ocr,
        handlers::chat,
        handlers::planner,
        handlers::add_goal,
        handlers::health_check,
    ),
    components(schemas(
        UploadForm,
        SummarizeResponse,
        OcrResponse,
        ChatForm,
        ChatResponse,
        GoalForm,
        GoalRecord,
        PlannerResponse,
        AddGoalResponse,
        HealthResponse,
        BackendStatus,
        ErrorResponse,
    )),
    tags(
        (name = "Study", description = "Document, image and chat endpoints"),
        (name = "Planner", description = "Study goal endpoints"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    let max_upload_bytes = state.settings.server.max_upload_bytes;
    let request_timeout = Duration::from_secs(state.settings.server.request_timeout_secs);

    Router::new()
        // Study endpoints
        .route("/summarize", post(handlers::summarize))
        .route("/ocr", post(handlers::ocr))
        .route("/chat", post(handlers::chat))
        // Planner endpoints
        .route("/planner", get(handlers::planner))
        .route("/add_goal", post(handlers::add_goal))
        // Health check endpoint
        .route("/health", get(handlers::health_check))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add shared state
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
