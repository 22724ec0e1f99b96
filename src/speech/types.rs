// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for speech synthesis

use thiserror::Error;

/// A system voice
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    /// Human-readable name, e.g. "Microsoft Zira"
    pub name: String,
    /// BCP 47 tag, e.g. "en-US"
    pub lang: String,
    /// Identifier the synthesizer uses to select the voice
    pub voice_uri: String,
    pub is_default: bool,
}

/// Text plus the parameters to speak it with
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// `None` means the platform default voice
    pub voice: Option<Voice>,
    pub pitch: f32,
    pub rate: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            pitch: 1.0,
            rate: 1.0,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis unavailable: {0}")]
    Unavailable(String),

    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

/// Platform text-to-speech
pub trait SpeechSynthesizer: Send + Sync {
    fn voices(&self) -> Vec<Voice>;

    /// Stop anything currently being spoken
    fn cancel(&self);

    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError>;

    /// Whether an utterance is still playing
    fn is_speaking(&self) -> bool {
        false
    }
}
