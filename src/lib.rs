// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Real-time note recording for a karaoke song editor.
//!
//! Singing into a microphone or tapping a button while the song plays
//! produces a stream of "pitch at playback time T" ticks. The
//! [`TranscriptionEngine`] turns that stream into beat-quantized notes in
//! a [`NoteLayer`], cutting back any existing notes the recording runs
//! over so the layer never holds overlapping notes.

pub mod config;
pub mod error;
pub mod notes;
pub mod recording;
pub mod timing;

pub use config::RecorderFile;
pub use error::RecorderError;
pub use notes::{LayerId, Note, NoteId, NoteLayer, Pitch};
pub use recording::{
    InputEvent, InputKind, LyricsDispenser, NoText, TextSupplier, TranscriptionEngine,
    UndoCheckpoint,
};
pub use timing::{BpmTempoMap, ClockState, PlaybackClock, PlaybackEvent, TempoMap};
