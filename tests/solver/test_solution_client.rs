// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tests for the HTTP solve client against an in-process backend

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use learning_assistant::error::PROCESSING_FAILED_MESSAGE;
use learning_assistant::solver::{request_solution, READINESS_PATH, SOLVE_PATH};
use learning_assistant::{AssistantError, SolutionClient, SolutionService};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorded(Arc<Mutex<Vec<Value>>>);

async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn answer_four(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.0.lock().unwrap().push(body);
    Json(json!({ "solution": "```html<p>Answer: 4</p>```" }))
}

#[tokio::test]
async fn test_solve_posts_base64_payload() {
    let recorded = Recorded::default();
    let router = Router::new()
        .route(SOLVE_PATH, post(answer_four))
        .with_state(recorded.clone());
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    let solution = client.solve("/9j/AAAA").await.unwrap();

    assert_eq!(solution, "```html<p>Answer: 4</p>```");
    assert_eq!(*recorded.0.lock().unwrap(), vec![json!({ "data": "/9j/AAAA" })]);
}

#[tokio::test]
async fn test_request_solution_strips_data_uri_prefix() {
    let recorded = Recorded::default();
    let router = Router::new()
        .route(SOLVE_PATH, post(answer_four))
        .with_state(recorded.clone());
    let endpoint = spawn_backend(router).await;

    // Trailing slash on the configured endpoint must not double up
    let client = SolutionClient::new(&format!("{}/", endpoint)).unwrap();
    request_solution(&client, "data:image/jpeg;base64,/9j/BBBB")
        .await
        .unwrap();

    let bodies = recorded.0.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["data"], "/9j/BBBB");
}

#[tokio::test]
async fn test_server_error_reports_status_text() {
    let router = Router::new().route(
        SOLVE_PATH,
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    let err = client.solve("/9j/AAAA").await.unwrap_err();

    match &err {
        AssistantError::RequestFailed {
            status,
            status_text,
        } => {
            assert_eq!(*status, 500);
            assert_eq!(status_text, "Internal Server Error");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    assert_eq!(err.user_message(), PROCESSING_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_unregistered_status_still_has_status_text() {
    let router = Router::new().route(
        SOLVE_PATH,
        post(|| async { StatusCode::from_u16(599).unwrap() }),
    );
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    let err = client.solve("/9j/AAAA").await.unwrap_err();

    match err {
        AssistantError::RequestFailed {
            status,
            status_text,
        } => {
            assert_eq!(status, 599);
            assert!(status_text.contains("599"));
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_numeric_solution_is_invalid_response() {
    let router = Router::new().route(
        SOLVE_PATH,
        post(|| async { Json(json!({ "solution": 42 })) }),
    );
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    let err = client.solve("/9j/AAAA").await.unwrap_err();

    assert!(matches!(err, AssistantError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_missing_solution_field_is_invalid_response() {
    let router = Router::new().route(
        SOLVE_PATH,
        post(|| async { Json(json!({ "answer": "4" })) }),
    );
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    let err = client.solve("/9j/AAAA").await.unwrap_err();

    assert!(matches!(err, AssistantError::InvalidResponse(_)));
    assert_eq!(err.user_message(), PROCESSING_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_empty_solution_is_invalid_response() {
    let router = Router::new().route(
        SOLVE_PATH,
        post(|| async { Json(json!({ "solution": "" })) }),
    );
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    let err = client.solve("/9j/AAAA").await.unwrap_err();

    assert!(matches!(err, AssistantError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_non_json_body_is_processing_error() {
    let router = Router::new().route(SOLVE_PATH, post(|| async { "four" }));
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    let err = client.solve("/9j/AAAA").await.unwrap_err();

    assert!(matches!(err, AssistantError::Processing(_)));
}

#[tokio::test]
async fn test_health_check_uses_readiness_route() {
    let router = Router::new().route(READINESS_PATH, get(|| async { "ok" }));
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    assert!(client.health_check().await);
}

#[tokio::test]
async fn test_health_check_false_without_readiness_route() {
    let router = Router::new().route(SOLVE_PATH, post(answer_four));
    let router = router.with_state(Recorded::default());
    let endpoint = spawn_backend(router).await;

    let client = SolutionClient::new(&endpoint).unwrap();
    assert!(!client.health_check().await);
}
