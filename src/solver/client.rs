// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP client for the remote solve endpoint

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::types::{SolveRequest, SolveResponse, READINESS_PATH, SOLVE_PATH};
use super::SolutionService;
use crate::error::{AssistantError, Result};

/// Client for `POST <endpoint>/generate-solution`
///
/// No timeout and no retry: one request, one answer.
pub struct SolutionClient {
    client: Client,
    endpoint: String,
}

impl SolutionClient {
    /// Create a new client for `endpoint` (scheme + host, optional base path)
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AssistantError::Config(e.to_string()))?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Solution client configured: endpoint={}", endpoint);

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if the solve backend reports ready
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}{}", self.endpoint, READINESS_PATH))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Readiness check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl SolutionService for SolutionClient {
    async fn solve(&self, image_base64: &str) -> Result<String> {
        let url = format!("{}{}", self.endpoint, SOLVE_PATH);
        debug!("Solve POST {} ({} base64 chars)", url, image_base64.len());

        let request = SolveRequest {
            data: image_base64.to_string(),
        };
        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::RequestFailed {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        let body: SolveResponse = response.json().await?;
        body.into_solution()
    }
}
