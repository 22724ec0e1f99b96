// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::camera::{FacingMode, StillDevice};
use crate::config::AssistantConfig;
use crate::sanitize::RenderMode;
use crate::session::LearningSession;

const SPEECH_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args, Debug, Default)]
pub struct SolveArgs {
    /// Image served as the rear (environment-facing) camera
    #[arg(long, value_name = "IMG")]
    pub rear: Option<PathBuf>,

    /// Image served as the front (user-facing) camera
    #[arg(long, value_name = "IMG")]
    pub front: Option<PathBuf>,

    /// Do not read the solution aloud
    #[arg(long)]
    pub no_speech: bool,

    /// Print the cleaned markup instead of plain text
    #[arg(long)]
    pub trust_markup: bool,
}

impl SolveArgs {
    /// Overlay the flags on `config`; camera flags replace configured devices
    pub fn apply(&self, config: &mut AssistantConfig) {
        let mut devices = Vec::new();
        if let Some(rear) = &self.rear {
            devices.push(StillDevice::new(rear.clone(), Some(FacingMode::Environment)));
        }
        if let Some(front) = &self.front {
            devices.push(StillDevice::new(front.clone(), Some(FacingMode::User)));
        }
        if !devices.is_empty() {
            config.camera.devices = devices;
        }
        if self.no_speech {
            config.speech.enabled = false;
        }
        if self.trust_markup {
            config.render_mode = RenderMode::TrustedMarkup;
        }
    }
}

/// One camera → solve → speak cycle
pub async fn run(config: AssistantConfig) -> Result<()> {
    config.validate_for_solve()?;
    let session = LearningSession::from_config(&config)?;

    if let Err(e) = session.start_camera().await {
        return Err(anyhow!("{} ({})", e.user_message(), e));
    }
    info!("Camera started, solving question via {}", config.endpoint);

    let outcome = tokio::select! {
        result = session.solve_question() => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, abandoning solve");
            session.teardown().await;
            return Ok(());
        }
    };

    let result = match outcome {
        Ok(Some(solution)) => {
            println!("{}", solution.render(config.render_mode));
            wait_for_speech(&session).await;
            Ok(())
        }
        Ok(None) => Err(anyhow!("no solution was produced")),
        Err(e) => Err(anyhow!(e.user_message())),
    };

    session.teardown().await;
    result
}

async fn wait_for_speech(session: &LearningSession) {
    while session.is_speaking() {
        tokio::select! {
            _ = tokio::time::sleep(SPEECH_POLL_INTERVAL) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Speech interrupted");
                break;
            }
        }
    }
}
