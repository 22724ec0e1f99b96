// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::Serialize;

use crate::sanitize::SanitizedSolution;

/// What the user currently sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Recording,
    Processing,
    ResultShown,
    ErrorShown,
}

/// Transient flags of one assistant session; nothing here outlives the process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub recording: bool,
    pub processing: bool,
    /// User-facing message of the last failure
    pub error: Option<String>,
    pub solution: Option<SanitizedSolution>,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        if self.processing {
            Phase::Processing
        } else if self.error.is_some() {
            Phase::ErrorShown
        } else if self.solution.is_some() {
            Phase::ResultShown
        } else if self.recording {
            Phase::Recording
        } else {
            Phase::Idle
        }
    }

    /// Whether a solve may start now
    pub fn can_solve(&self) -> bool {
        self.recording && !self.processing
    }
}
