// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note model.
//!
//! This module provides:
//! - Beat-quantized notes with lyric text
//! - Note layers with stable, invalidation-safe handles

pub mod layer;
pub mod note;

pub use layer::{NoteId, NoteLayer};
pub use note::{LayerId, Note, Pitch};
