// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Learning assistant: point a camera at a question, get a solution back
//!
//! A frame is captured from the camera, sent as a base64 JPEG to a remote
//! solve endpoint, and the returned HTML is cleaned into plain text that can
//! be printed and read aloud.

pub mod camera;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod session;
pub mod solver;
pub mod speech;
pub mod version;

pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use sanitize::{sanitize, RenderMode, SanitizedSolution};
pub use session::{LearningSession, Phase, SessionState};
pub use solver::{SolutionClient, SolutionService};
