// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text-to-speech for solutions
//!
//! Speech is optional and never fails the flow: a missing synthesizer or a
//! synthesis error only produces a log line.

pub mod announcer;
pub mod command;
pub mod types;

pub use announcer::{select_voice, SpeechAnnouncer};
pub use command::{parse_voice_list, CommandSynthesizer, DEFAULT_SPEECH_PROGRAM};
pub use types::{SpeechError, SpeechSynthesizer, Utterance, Voice};
