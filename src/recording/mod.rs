// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Recording system.
//!
//! This module provides:
//! - Microphone and button input mapping
//! - Real-time transcription of input ticks into notes
//! - Lyric words for button-recorded notes

pub mod engine;
pub mod input;
pub mod lyrics;

pub use engine::{TranscriptionEngine, UndoCheckpoint};
pub use input::{InputEvent, InputKind};
pub use lyrics::{LyricsDispenser, NoText, TextSupplier, DEFAULT_SYLLABLE_SEPARATOR};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::BpmTempoMap;

    #[test]
    fn test_engine_creation() {
        let tempo = BpmTempoMap::new(120.0, 0.0).unwrap();
        let engine = TranscriptionEngine::new(tempo, InputKind::Microphone { delay_ms: 0.0 });
        assert!(!engine.is_recording_enabled());
    }

    #[test]
    fn test_dispenser_creation() {
        let lyrics = LyricsDispenser::new("la la");
        assert_eq!(lyrics.cursor(), 0);
        assert!(!lyrics.is_exhausted());
    }
}
