// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Assistant configuration
//!
//! Layers, lowest precedence first: built-in defaults, a TOML file, then
//! `LEARNING_ASSISTANT_*` environment variables. The CLI applies its flags
//! on top.
//!
//! ```toml
//! endpoint = "https://solver.example.com"
//! render_mode = "plain_text"
//!
//! [speech]
//! enabled = true
//! program = "espeak-ng"
//!
//! [[camera.devices]]
//! path = "rear.jpg"
//! facing = "environment"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::camera::StillDevice;
use crate::sanitize::RenderMode;
use crate::speech::DEFAULT_SPEECH_PROGRAM;

pub const ENV_ENDPOINT: &str = "LEARNING_ASSISTANT_ENDPOINT";
pub const ENV_SPEECH: &str = "LEARNING_ASSISTANT_SPEECH";
pub const ENV_SPEECH_PROGRAM: &str = "LEARNING_ASSISTANT_SPEECH_PROGRAM";
pub const ENV_RENDER_MODE: &str = "LEARNING_ASSISTANT_RENDER_MODE";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Read solutions aloud
    pub enabled: bool,
    /// espeak-compatible program used for synthesis
    pub program: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: DEFAULT_SPEECH_PROGRAM.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub devices: Vec<StillDevice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Base URL of the solve backend
    pub endpoint: String,
    pub render_mode: RenderMode,
    pub speech: SpeechConfig,
    pub camera: CameraConfig,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            render_mode: RenderMode::default(),
            speech: SpeechConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// File (when given) overlaid with the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(value) = lookup(ENV_SPEECH) {
            self.speech.enabled = parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: ENV_SPEECH.to_string(),
                reason: format!("expected true/false, got '{}'", value),
            })?;
        }
        if let Some(program) = lookup(ENV_SPEECH_PROGRAM) {
            self.speech.program = program;
        }
        if let Some(value) = lookup(ENV_RENDER_MODE) {
            self.render_mode = value
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: ENV_RENDER_MODE.to_string(),
                    reason,
                })?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidValue {
            key: "endpoint".to_string(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidValue {
                key: "endpoint".to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.speech.enabled && self.speech.program.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "speech.program must be set when speech is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Validation for a solve run, which also needs a camera
    pub fn validate_for_solve(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.camera.devices.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one camera device must be configured".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
