// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the capture → solve → sanitize flow
//!
//! Every failure is caught at the user action that triggered it. Only two
//! messages ever reach the user: one for camera acquisition and one generic
//! "failed to process" message for everything else.

use thiserror::Error;

/// Shown when neither the rear camera nor any fallback camera could be opened
pub const CAMERA_UNAVAILABLE_MESSAGE: &str = "Failed to access camera";

/// Shown for every capture, request, or response failure
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process the question. Please try again.";

#[derive(Debug, Error)]
pub enum AssistantError {
    /// Both camera acquisition attempts failed
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// No active video surface to capture from, or the frame could not be encoded
    #[error("failed to capture image: {0}")]
    CaptureFailed(String),

    /// The solve endpoint answered with a non-success status
    #[error("backend request failed: {status_text}")]
    RequestFailed { status: u16, status_text: String },

    /// The solve endpoint answered 2xx but without a usable `solution` field
    #[error("invalid response shape: {0}")]
    InvalidResponse(String),

    /// Network or JSON failure while talking to the endpoint
    #[error("processing error: {0}")]
    Processing(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AssistantError {
    /// The message surfaced to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            AssistantError::CameraUnavailable(_) => CAMERA_UNAVAILABLE_MESSAGE,
            _ => PROCESSING_FAILED_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Processing(err.to_string())
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::Processing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
