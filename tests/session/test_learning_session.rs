// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end tests for the learning session with still-image cameras

use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use image::{ImageFormat, Rgb, RgbImage};
use learning_assistant::camera::{FacingMode, StillDevice, StillFrameBackend};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use learning_assistant::capture::check_payload;
use learning_assistant::config::AssistantConfig;
use learning_assistant::error::{CAMERA_UNAVAILABLE_MESSAGE, PROCESSING_FAILED_MESSAGE};
use learning_assistant::solver::SOLVE_PATH;
use learning_assistant::speech::SpeechAnnouncer;
use learning_assistant::{
    AssistantError, LearningSession, Phase, Result, SolutionClient, SolutionService,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

fn write_frame(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    RgbImage::from_pixel(16, 12, Rgb([200, 180, 160]))
        .save(&path)
        .unwrap();
    path
}

async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn wait_for_phase(session: &LearningSession, phase: Phase) {
    for _ in 0..400 {
        if session.phase() == phase {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session never reached {:?}", phase);
}

/// Solver that takes its time and counts calls
struct SlowSolver {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowSolver {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SolutionService for SlowSolver {
    async fn solve(&self, _image_base64: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok("<p>slow answer</p>".to_string())
    }
}

fn front_only_session(dir: &TempDir, solver: Arc<dyn SolutionService>) -> LearningSession {
    let front = write_frame(dir, "front.png");
    let camera = StillFrameBackend::new(vec![StillDevice::new(front, Some(FacingMode::User))]);
    LearningSession::new(Arc::new(camera), solver, SpeechAnnouncer::disabled())
}

#[tokio::test]
async fn test_rear_refused_front_granted() {
    let dir = TempDir::new().unwrap();
    let session = front_only_session(&dir, SlowSolver::new(Duration::ZERO));

    session.start_camera().await.unwrap();

    let state = session.snapshot();
    assert!(state.recording);
    assert!(state.error.is_none());
    assert_eq!(session.phase(), Phase::Recording);
}

#[tokio::test]
async fn test_no_camera_sets_access_error() {
    let session = LearningSession::new(
        Arc::new(StillFrameBackend::new(vec![])),
        SlowSolver::new(Duration::ZERO),
        SpeechAnnouncer::disabled(),
    );

    let err = session.start_camera().await.unwrap_err();

    assert!(matches!(err, AssistantError::CameraUnavailable(_)));
    let state = session.snapshot();
    assert!(!state.recording);
    assert_eq!(state.error.as_deref(), Some(CAMERA_UNAVAILABLE_MESSAGE));
    assert_eq!(session.phase(), Phase::ErrorShown);
}

#[tokio::test]
async fn test_missing_solution_field_sets_error_only() {
    let dir = TempDir::new().unwrap();
    let router = Router::new().route(SOLVE_PATH, post(|| async { Json(json!({})) }));
    let endpoint = spawn_backend(router).await;
    let session = front_only_session(&dir, Arc::new(SolutionClient::new(&endpoint).unwrap()));
    session.start_camera().await.unwrap();

    let err = session.solve_question().await.unwrap_err();

    assert!(matches!(err, AssistantError::InvalidResponse(_)));
    let state = session.snapshot();
    assert!(!state.processing);
    assert!(state.solution.is_none());
    assert_eq!(state.error.as_deref(), Some(PROCESSING_FAILED_MESSAGE));
}

#[tokio::test]
async fn test_concurrent_solve_is_ignored() {
    let dir = TempDir::new().unwrap();
    let solver = SlowSolver::new(Duration::from_millis(200));
    let session = Arc::new(front_only_session(&dir, solver.clone()));
    session.start_camera().await.unwrap();

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.solve_question().await })
    };
    wait_for_phase(&session, Phase::Processing).await;

    assert!(session.solve_question().await.unwrap().is_none());

    let solution = first.await.unwrap().unwrap().unwrap();
    assert_eq!(solution.plain, "slow answer");
    assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
    assert!(!session.snapshot().processing);
}

#[tokio::test]
async fn test_teardown_abandons_in_flight_solve() {
    let dir = TempDir::new().unwrap();
    let solver = SlowSolver::new(Duration::from_secs(30));
    let session = Arc::new(front_only_session(&dir, solver));
    session.start_camera().await.unwrap();

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.solve_question().await })
    };
    wait_for_phase(&session, Phase::Processing).await;

    session.teardown().await;

    let outcome = tokio::time::timeout(Duration::from_secs(2), pending)
        .await
        .expect("solve should return promptly after teardown")
        .unwrap()
        .unwrap();
    assert!(outcome.is_none());

    let state = session.snapshot();
    assert!(!state.processing);
    assert!(!state.recording);
    assert!(state.error.is_none());
    assert!(state.solution.is_none());
}

/// Solver whose request fails at the moment the session is torn down
#[derive(Default)]
struct FailsOnTeardown {
    shutdown: OnceLock<CancellationToken>,
}

#[async_trait]
impl SolutionService for FailsOnTeardown {
    async fn solve(&self, _image_base64: &str) -> Result<String> {
        match self.shutdown.get() {
            Some(token) => token.cancelled().await,
            None => std::future::pending::<()>().await,
        }
        Err(AssistantError::Processing("connection reset".to_string()))
    }
}

#[tokio::test]
async fn test_failure_racing_teardown_sets_no_error() {
    let dir = TempDir::new().unwrap();
    let solver = Arc::new(FailsOnTeardown::default());
    let session = Arc::new(front_only_session(&dir, solver.clone()));
    assert!(solver.shutdown.set(session.shutdown_token()).is_ok());
    session.start_camera().await.unwrap();

    let pending = {
        let session = session.clone();
        tokio::spawn(async move { session.solve_question().await })
    };
    wait_for_phase(&session, Phase::Processing).await;

    session.teardown().await;

    let outcome = pending.await.unwrap().unwrap();
    assert!(outcome.is_none());
    let state = session.snapshot();
    assert!(state.error.is_none());
    assert!(!state.processing);
}

#[derive(Clone, Default)]
struct Recorded(Arc<Mutex<Vec<Value>>>);

async fn answer_four(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    recorded.0.lock().unwrap().push(body);
    Json(json!({ "solution": "  ```html<p>Answer: 4</p>```  " }))
}

#[tokio::test]
async fn test_full_flow_from_config() {
    let dir = TempDir::new().unwrap();
    let recorded = Recorded::default();
    let router = Router::new()
        .route(SOLVE_PATH, post(answer_four))
        .with_state(recorded.clone());
    let endpoint = spawn_backend(router).await;

    let mut config = AssistantConfig::default();
    config.endpoint = endpoint;
    config.speech.enabled = false;
    config.camera.devices = vec![StillDevice::new(
        write_frame(&dir, "rear.png"),
        Some(FacingMode::Environment),
    )];

    let session = LearningSession::from_config(&config).unwrap();
    session.start_camera().await.unwrap();
    let solution = session.solve_question().await.unwrap().unwrap();

    assert_eq!(solution.display, "<p>Answer: 4</p>");
    assert_eq!(solution.plain, "Answer: 4");
    assert_eq!(session.phase(), Phase::ResultShown);

    let bodies = recorded.0.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let payload = bodies[0]["data"].as_str().unwrap();
    assert!(!payload.starts_with("data:"));
    assert_eq!(check_payload(payload).unwrap(), ImageFormat::Jpeg);
    let frame = image::load_from_memory(&STANDARD.decode(payload).unwrap()).unwrap();
    assert_eq!((frame.width(), frame.height()), (16, 12));
}

#[tokio::test]
async fn test_second_solve_replaces_solution() {
    let dir = TempDir::new().unwrap();
    let solver = SlowSolver::new(Duration::ZERO);
    let session = front_only_session(&dir, solver.clone());
    session.start_camera().await.unwrap();

    let first = session.solve_question().await.unwrap().unwrap();
    let second = session.solve_question().await.unwrap().unwrap();

    assert_eq!(solver.calls.load(Ordering::SeqCst), 2);
    assert!(second.received_at >= first.received_at);
    assert_eq!(session.snapshot().solution, Some(second));
}
