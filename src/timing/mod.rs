// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! This module provides the playback clock and tempo conversion
//! between song positions and beats.

pub mod clock;
pub mod tempo;

pub use clock::{ClockState, PlaybackClock, PlaybackEvent};
pub use tempo::{BpmTempoMap, TempoMap};
