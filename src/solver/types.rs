// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wire types for the remote solve endpoint

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AssistantError, Result};

/// Path of the solve route under the configured endpoint
pub const SOLVE_PATH: &str = "/generate-solution";

/// Path of the readiness check under the configured endpoint
pub const READINESS_PATH: &str = "/readiness";

/// `{"data": "<base64 JPEG>"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub data: String,
}

/// `{"solution": "<string>"}`; the field is loosely typed on the wire so that
/// a missing or non-text value is a shape error rather than a parse error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolveResponse {
    #[serde(default)]
    pub solution: Option<Value>,
}

impl SolveResponse {
    /// The solution text, which must be a non-empty string
    pub fn into_solution(self) -> Result<String> {
        match self.solution {
            Some(Value::String(text)) if !text.is_empty() => Ok(text),
            Some(Value::String(_)) => Err(AssistantError::InvalidResponse(
                "'solution' is empty".to_string(),
            )),
            None | Some(Value::Null) => Err(AssistantError::InvalidResponse(
                "no 'solution' field in response".to_string(),
            )),
            Some(other) => Err(AssistantError::InvalidResponse(format!(
                "'solution' is not text: {}",
                other
            ))),
        }
    }
}
