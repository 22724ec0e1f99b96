// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Solution requester: sends a captured frame to the remote solver

pub mod client;
pub mod types;

pub use client::SolutionClient;
pub use types::{SolveRequest, SolveResponse, READINESS_PATH, SOLVE_PATH};

use async_trait::async_trait;

use tracing::debug;

use crate::capture::{check_payload, strip_data_uri_prefix};
use crate::error::{AssistantError, Result};

/// Something that turns a base64 JPEG into solution text
#[async_trait]
pub trait SolutionService: Send + Sync {
    async fn solve(&self, image_base64: &str) -> Result<String>;
}

/// Strip the data-URI prefix from `data_uri` and ask `service` for a solution
///
/// Payloads that are not a supported image within the size cap never leave
/// the process.
pub async fn request_solution(service: &dyn SolutionService, data_uri: &str) -> Result<String> {
    let payload =
        strip_data_uri_prefix(data_uri).map_err(|e| AssistantError::Processing(e.to_string()))?;
    let format = check_payload(payload).map_err(|e| AssistantError::Processing(e.to_string()))?;
    debug!("Sending {:?} payload ({} base64 chars)", format, payload.len());
    service.solve(payload).await
}
