// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for recorder setup.
//!
//! Transcription itself cannot fail; these errors come from building
//! tempo maps and validating recorder configuration.

use thiserror::Error;

/// Errors raised while constructing recorder collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecorderError {
    #[error("Invalid tempo: {bpm} BPM with gap {gap_ms}ms")]
    InvalidTempo { bpm: f64, gap_ms: f64 },

    #[error("Invalid mic delay: {0}ms (must be finite and >= 0)")]
    InvalidMicDelay(f64),

    #[error("Invalid syllable separator: {0:?}")]
    InvalidSeparator(char),
}
