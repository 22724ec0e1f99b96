// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The learning-assistant screen, minus the pixels
//!
//! ```text
//! start_camera ──► CameraController (rear → any)
//! solve_question ─► FrameCapturer ─► SolutionService ─► sanitize ─► SpeechAnnouncer
//! ```
//!
//! Camera, solver and speech are injected so any of them can be swapped for
//! a fake. All flags live in [`SessionState`]; at most one solve is in flight.

pub mod state;

pub use state::{Phase, SessionState};

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::camera::{CameraBackend, CameraController, StillFrameBackend};
use crate::capture::FrameCapturer;
use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::sanitize::{sanitize, SanitizedSolution};
use crate::solver::{request_solution, SolutionClient, SolutionService};
use crate::speech::{CommandSynthesizer, SpeechAnnouncer};

fn read(state: &RwLock<SessionState>) -> RwLockReadGuard<'_, SessionState> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(state: &RwLock<SessionState>) -> RwLockWriteGuard<'_, SessionState> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clears the processing flag however the solve ends, including when the
/// solve future is dropped mid-request
struct ProcessingGuard {
    state: Arc<RwLock<SessionState>>,
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        write(&self.state).processing = false;
    }
}

pub struct LearningSession {
    camera: tokio::sync::Mutex<CameraController>,
    capturer: Mutex<FrameCapturer>,
    solver: Arc<dyn SolutionService>,
    announcer: SpeechAnnouncer,
    state: Arc<RwLock<SessionState>>,
    shutdown: CancellationToken,
}

impl LearningSession {
    pub fn new(
        camera: Arc<dyn CameraBackend>,
        solver: Arc<dyn SolutionService>,
        announcer: SpeechAnnouncer,
    ) -> Self {
        Self {
            camera: tokio::sync::Mutex::new(CameraController::new(camera)),
            capturer: Mutex::new(FrameCapturer::new()),
            solver,
            announcer,
            state: Arc::new(RwLock::new(SessionState::default())),
            shutdown: CancellationToken::new(),
        }
    }

    /// Wire the still-image camera, HTTP solver and command synthesizer
    /// described by `config`
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        let camera = Arc::new(StillFrameBackend::new(config.camera.devices.clone()));
        let solver = Arc::new(SolutionClient::new(&config.endpoint)?);
        let announcer = if config.speech.enabled {
            SpeechAnnouncer::new(Arc::new(CommandSynthesizer::new(
                config.speech.program.clone(),
            )))
        } else {
            SpeechAnnouncer::disabled()
        };

        Ok(Self::new(camera, solver, announcer))
    }

    /// Copy of the current flags
    pub fn snapshot(&self) -> SessionState {
        read(&self.state).clone()
    }

    pub fn phase(&self) -> Phase {
        read(&self.state).phase()
    }

    /// Whether the last solution is still being read aloud
    pub fn is_speaking(&self) -> bool {
        self.announcer.is_speaking()
    }

    /// Token cancelled by [`LearningSession::teardown`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn start_camera(&self) -> Result<()> {
        let mut camera = self.camera.lock().await;
        match camera.start().await {
            Ok(()) => {
                let mut state = write(&self.state);
                state.recording = true;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                let mut state = write(&self.state);
                state.recording = false;
                state.error = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }

    pub async fn stop_camera(&self) {
        self.camera.lock().await.stop();
        write(&self.state).recording = false;
    }

    /// Capture the current frame, solve it, and store the sanitized answer
    ///
    /// Returns `Ok(None)` without doing anything when the camera is off or a
    /// solve is already running, and when the session is torn down while the
    /// request is in flight. On failure the previous solution is kept and the
    /// generic error message is set.
    pub async fn solve_question(&self) -> Result<Option<SanitizedSolution>> {
        let _guard = {
            let mut state = write(&self.state);
            if self.shutdown.is_cancelled() || !state.can_solve() {
                debug!(
                    "Solve ignored (recording={}, processing={})",
                    state.recording, state.processing
                );
                return Ok(None);
            }
            state.processing = true;
            state.error = None;
            ProcessingGuard {
                state: self.state.clone(),
            }
        };

        let request_id = Uuid::new_v4();
        let span = info_span!("solve", %request_id);

        self.speech(|announcer| announcer.cancel()).await;

        match self.run_solve().instrument(span).await {
            Ok(Some(solution)) => {
                write(&self.state).solution = Some(solution.clone());
                let text = solution.plain.clone();
                self.speech(move |announcer| announcer.announce(&text)).await;
                Ok(Some(solution))
            }
            Ok(None) => Ok(None),
            Err(e) if self.shutdown.is_cancelled() => {
                debug!("Dropping failure that arrived after teardown: {}", e);
                Ok(None)
            }
            Err(e) => {
                error!("Error processing image ({}): {}", request_id, e);
                write(&self.state).error = Some(e.user_message().to_string());
                Err(e)
            }
        }
    }

    async fn run_solve(&self) -> Result<Option<SanitizedSolution>> {
        let data_uri = {
            let camera = self.camera.lock().await;
            let mut capturer = self
                .capturer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            capturer.capture(camera.stream())?.to_data_uri()
        };

        let raw = tokio::select! {
            biased;

            _ = self.shutdown.cancelled() => {
                info!("Session torn down, abandoning in-flight solve");
                return Ok(None);
            }
            result = request_solution(self.solver.as_ref(), &data_uri) => result?,
        };

        if self.shutdown.is_cancelled() {
            debug!("Dropping solution that arrived after teardown");
            return Ok(None);
        }

        let solution = sanitize(&raw);
        info!("Solution received ({} chars)", solution.plain.len());
        Ok(Some(solution))
    }

    /// Run a speech call on the blocking pool; synthesizers manage processes
    async fn speech<F>(&self, call: F)
    where
        F: FnOnce(&SpeechAnnouncer) + Send + 'static,
    {
        if !self.announcer.is_enabled() {
            return;
        }
        let announcer = self.announcer.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || call(&announcer)).await {
            warn!("Speech task failed: {}", e);
        }
    }

    /// Abandon any in-flight solve, silence speech and release the camera
    pub async fn teardown(&self) {
        self.shutdown.cancel();
        self.speech(|announcer| announcer.cancel()).await;
        self.stop_camera().await;
        info!("Learning session torn down");
    }
}
