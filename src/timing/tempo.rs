// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback time to beat conversion.

use crate::error::RecorderError;

/// Converts playback positions (milliseconds) to beats and back
pub trait TempoMap {
    /// Beat sounding at a playback position
    fn beat_at(&self, position_ms: f64) -> i64;

    /// Playback position where a beat starts
    fn position_at(&self, beat: i64) -> f64;
}

/// Constant tempo starting after a gap
///
/// Beats before the gap are negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmTempoMap {
    bpm: f64,
    gap_ms: f64,
}

impl BpmTempoMap {
    /// Create a tempo map
    pub fn new(bpm: f64, gap_ms: f64) -> Result<Self, RecorderError> {
        if !bpm.is_finite() || bpm <= 0.0 || !gap_ms.is_finite() {
            return Err(RecorderError::InvalidTempo { bpm, gap_ms });
        }
        Ok(Self { bpm, gap_ms })
    }

    /// Beats per minute
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Offset of beat zero from the start of playback
    pub fn gap_ms(&self) -> f64 {
        self.gap_ms
    }

    /// Duration of one beat in milliseconds
    pub fn beat_duration_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }
}

impl TempoMap for BpmTempoMap {
    fn beat_at(&self, position_ms: f64) -> i64 {
        ((position_ms - self.gap_ms) / self.beat_duration_ms()).floor() as i64
    }

    fn position_at(&self, beat: i64) -> f64 {
        self.gap_ms + beat as f64 * self.beat_duration_ms()
    }
}
