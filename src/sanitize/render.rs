// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::SanitizedSolution;

/// How a solution is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Tag-free text only
    #[default]
    PlainText,
    /// Backend markup, passed through an allow-list cleaner. Only for a
    /// backend that is explicitly trusted.
    TrustedMarkup,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "plain_text" | "text" => Ok(RenderMode::PlainText),
            "markup" | "trusted_markup" | "html" => Ok(RenderMode::TrustedMarkup),
            other => Err(format!("unknown render mode '{}'", other)),
        }
    }
}

pub(super) fn render(solution: &SanitizedSolution, mode: RenderMode) -> String {
    match mode {
        RenderMode::PlainText => solution.plain.clone(),
        RenderMode::TrustedMarkup => ammonia::clean(&solution.display),
    }
}
