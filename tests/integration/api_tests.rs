//! API endpoint integration tests against stub models

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use study_serving_gateway::api::routes::create_router;
use tower::ServiceExt;

#[tokio::test]
async fn test_summarize_returns_summary_and_flashcards() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let text = "Cells divide. Mitosis has four phases. DNA replicates first. \
                Chromosomes align. They separate. Cytokinesis follows.";
    let response = app
        .oneshot(upload_request("/summarize", "notes.txt", text.as_bytes()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"], format!("summary of {} chars", text.len()));
    assert_eq!(
        body["flashcards"],
        json!([
            "Cells divide",
            "Mitosis has four phases",
            "DNA replicates first",
            "Chromosomes align",
            "They separate"
        ])
    );

    let calls = stubs.summarizer.calls.lock();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, text);
    assert_eq!(calls[0].1.max_length, 150);
    assert_eq!(calls[0].1.min_length, Some(50));
}

#[tokio::test]
async fn test_summarize_rejects_non_utf8() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(upload_request("/summarize", "notes.bin", &[0x66, 0x6f, 0xff, 0xfe, 0x2e]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"detail": "Internal Server Error"}));
    assert!(stubs.summarizer.calls.lock().is_empty());
}

#[tokio::test]
async fn test_summarize_model_failure_is_server_error() {
    let stubs = Stubs::failing_summarizer();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(upload_request("/summarize", "short.txt", b"Too short."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(stubs.summarizer.calls.lock().len(), 1);
}

#[tokio::test]
async fn test_summarize_without_file_is_unprocessable() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(form_request("/summarize", "other=value"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_summarize_requires_a_file_part() {
    let stubs = Stubs::new();

    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\n",
        b = BOUNDARY
    )
    .into_bytes();
    body.extend_from_slice(&[0x66, 0x6f, 0xff, 0xfe, 0x2e]);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    let multipart = axum::http::Request::builder()
        .method("POST")
        .uri("/summarize")
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = create_router(stubs.app_state()).oneshot(multipart).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = create_router(stubs.app_state())
        .oneshot(form_request("/summarize", "file=fo%FF%FE."))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert!(stubs.summarizer.calls.lock().is_empty());
}

#[tokio::test]
async fn test_ocr_recognizes_and_summarizes() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(upload_request("/ocr", "page.png", &sample_png()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["text"], "Recognized words on a page.");
    assert_eq!(body["summary"], "summary of 27 chars");

    let images = stubs.text_recognizer.images.lock();
    assert_eq!(images.len(), 1);
    assert_eq!(image::guess_format(&images[0]).unwrap(), image::ImageFormat::Png);

    let calls = stubs.summarizer.calls.lock();
    assert_eq!(calls[0].1.max_length, 100);
    assert_eq!(calls[0].1.min_length, None);
}

#[tokio::test]
async fn test_ocr_rejects_non_image() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(upload_request("/ocr", "page.png", b"definitely not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(stubs.text_recognizer.images.lock().is_empty());
    assert!(stubs.summarizer.calls.lock().is_empty());
}

#[tokio::test]
async fn test_chat_without_context_skips_model() {
    let stubs = Stubs::new();

    for body in ["query=What+is+DNA%3F", "query=What+is+DNA%3F&context="] {
        let app = create_router(stubs.app_state());
        let response = app.oneshot(form_request("/chat", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"response": "Please provide context from a document."})
        );
    }

    assert_eq!(stubs.question_answerer.calls(), 0);
}

#[tokio::test]
async fn test_chat_with_context_answers() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(form_request("/chat", "query=Who&context=Ada+wrote+it"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"response": "Who <- Ada wrote it"}));
    assert_eq!(stubs.question_answerer.calls(), 1);
}

#[tokio::test]
async fn test_chat_whitespace_context_still_invokes_model() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(form_request("/chat", "query=Who&context=+"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stubs.question_answerer.calls(), 1);
}

#[tokio::test]
async fn test_chat_missing_query_is_unprocessable() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app
        .oneshot(form_request("/chat", "context=something"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stubs.question_answerer.calls(), 0);
}

#[tokio::test]
async fn test_planner_returns_fixed_goals() {
    let stubs = Stubs::new();
    let expected = json!({
        "goals": [
            {"text": "Study Math", "deadline": "2023-10-01"},
            {"text": "Finish Project", "deadline": "2023-10-05"}
        ]
    });

    for _ in 0..2 {
        let app = create_router(stubs.app_state());
        let response = app.oneshot(get_request("/planner")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, expected);
    }
}

#[tokio::test]
async fn test_add_goal_does_not_persist() {
    let stubs = Stubs::new();
    let state = stubs.app_state();

    let response = create_router(state.clone())
        .oneshot(form_request("/add_goal", "text=Read&deadline=2023-12-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Goal 'Read' added with deadline 2023-12-01"})
    );

    let response = create_router(state).oneshot(get_request("/planner")).await.unwrap();
    let goals = body_json(response).await;
    assert_eq!(goals["goals"].as_array().unwrap().len(), 2);
    assert!(!goals.to_string().contains("Read"));
}

#[tokio::test]
async fn test_add_goal_accepts_multipart() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\nRevise\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"deadline\"\r\n\r\n2024-01-15\r\n\
         --{b}--\r\n",
        b = BOUNDARY
    );
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/add_goal")
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(axum::body::Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Goal 'Revise' added with deadline 2024-01-15"})
    );
}

#[tokio::test]
async fn test_add_goal_missing_deadline_is_unprocessable() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app.oneshot(form_request("/add_goal", "text=Read")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_reports_models() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["models"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let stubs = Stubs::new();
    let app = create_router(stubs.app_state());

    let response = app.oneshot(get_request("/api-docs/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let doc = body_json(response).await;
    for path in ["/summarize", "/ocr", "/chat", "/planner", "/add_goal", "/health"] {
        assert!(doc["paths"].get(path).is_some(), "missing {}", path);
    }
}
