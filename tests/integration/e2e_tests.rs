//! End-to-end tests: router, real backend clients, mock inference servers

mod common;

use axum::http::StatusCode;
use common::{body_json, form_request, sample_png, upload_request};
use serde_json::json;
use std::sync::Arc;
use study_serving_gateway::api::routes::create_router;
use study_serving_gateway::backend::ModelSet;
use study_serving_gateway::config::{BackendConfig, ProtocolType, Settings};
use study_serving_gateway::AppState;
use tower::ServiceExt;
use wiremock::matchers::{body_json as body_matches, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_settings(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.health.interval_secs = 0;
    settings.models.summarizer = BackendConfig {
        name: "bart".to_string(),
        protocol: ProtocolType::HuggingFace,
        endpoints: vec![format!("{}/summarize", server.uri())],
        ..Default::default()
    };
    settings.models.question_answerer = BackendConfig {
        name: "squad".to_string(),
        protocol: ProtocolType::HuggingFace,
        endpoints: vec![format!("{}/qa", server.uri())],
        ..Default::default()
    };
    settings.models.text_recognizer = BackendConfig {
        name: "ocr".to_string(),
        protocol: ProtocolType::Http,
        endpoints: vec![server.uri()],
        ..Default::default()
    };
    settings
}

fn create_test_app_state(settings: Settings) -> Arc<AppState> {
    let models = ModelSet::from_config(&settings.models).unwrap();
    Arc::new(AppState::new(settings, models))
}

#[tokio::test]
async fn test_summarize_through_inference_server() {
    let server = MockServer::start().await;
    let text = "Photosynthesis converts light. Plants store sugar. Oxygen is released.";

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(body_matches(json!({
            "inputs": text,
            "parameters": {"max_length": 150, "min_length": 50}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"summary_text": "Plants turn light into sugar."}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_router(create_test_app_state(create_test_settings(&server)));
    let response = app
        .oneshot(upload_request("/summarize", "bio.txt", text.as_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "summary": "Plants turn light into sugar.",
            "flashcards": [
                "Photosynthesis converts light",
                "Plants store sugar",
                "Oxygen is released"
            ]
        })
    );
}

#[tokio::test]
async fn test_short_input_fails_generically() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Input is too short for min_length=50"
        })))
        .mount(&server)
        .await;

    let app = create_router(create_test_app_state(create_test_settings(&server)));
    let response = app
        .oneshot(upload_request("/summarize", "tiny.txt", b"Hi."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"detail": "Internal Server Error"}));
}

#[tokio::test]
async fn test_ocr_through_inference_servers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ocr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "text": "Chapter one. The beginning."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(body_matches(json!({
            "inputs": "Chapter one. The beginning.",
            "parameters": {"max_length": 100}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"summary_text": "A beginning."}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_router(create_test_app_state(create_test_settings(&server)));
    let response = app
        .oneshot(upload_request("/ocr", "scan.png", &sample_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"text": "Chapter one. The beginning.", "summary": "A beginning."})
    );
}

#[tokio::test]
async fn test_chat_through_inference_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/qa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "mitochondria", "score": 0.9, "start": 4, "end": 16
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = create_test_app_state(create_test_settings(&server));

    let response = create_router(state.clone())
        .oneshot(form_request(
            "/chat",
            "query=What+is+the+powerhouse%3F&context=The+mitochondria+is+the+powerhouse.",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"response": "mitochondria"}));

    // Empty context never reaches the server; `expect(1)` verifies on drop
    let response = create_router(state)
        .oneshot(form_request("/chat", "query=Anything&context="))
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await,
        json!({"response": "Please provide context from a document."})
    );
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let server = MockServer::start().await;
    let mut settings = create_test_settings(&server);
    settings.server.max_upload_bytes = 1024;

    let app = create_router(create_test_app_state(settings));
    let response = app
        .oneshot(upload_request("/summarize", "big.txt", &vec![b'a'; 4096]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
