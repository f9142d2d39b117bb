// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note layer storage.
//!
//! A layer is an arena of note slots addressed by generational
//! [`NoteId`] handles. Removing a note bumps its slot generation, so any
//! handle still pointing at it stops resolving instead of aliasing
//! whatever note reuses the slot later.

use super::note::{LayerId, Note, Pitch};

/// Handle to a note inside a [`NoteLayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    note: Option<Note>,
}

/// An independently editable collection of notes
#[derive(Debug, Clone)]
pub struct NoteLayer {
    /// Layer identity, stamped onto every inserted note
    id: LayerId,
    slots: Vec<Slot>,
    /// Indices of empty slots available for reuse
    free: Vec<u32>,
    len: usize,
    /// Bumped on every observable change
    revision: u64,
}

impl NoteLayer {
    /// Create an empty layer
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            revision: 0,
        }
    }

    /// Get layer identity
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Number of notes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the layer holds no notes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Change counter observed by hosts to refresh views
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Signal that notes were edited in place
    pub fn mark_changed(&mut self) {
        self.revision += 1;
    }

    /// Insert a note and return its handle
    pub fn insert(&mut self, mut note: Note) -> NoteId {
        note.layer = self.id;
        self.len += 1;
        self.revision += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.note = Some(note);
            return NoteId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            note: Some(note),
        });
        NoteId {
            index,
            generation: 0,
        }
    }

    /// Insert a note built from its parts
    pub fn add(
        &mut self,
        pitch: Pitch,
        start_beat: i64,
        end_beat: i64,
        text: impl Into<String>,
    ) -> NoteId {
        self.insert(Note::new(pitch, start_beat, end_beat, text, self.id))
    }

    /// Remove a note, invalidating every handle to it
    pub fn remove(&mut self, id: NoteId) -> Option<Note> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let note = slot.note.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        self.revision += 1;
        Some(note)
    }

    /// Look up a note
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.note.as_ref())
    }

    /// Look up a note for in-place editing
    pub fn get_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.note.as_mut())
    }

    /// Check if a handle still resolves
    pub fn contains(&self, id: NoteId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate notes in storage order
    pub fn iter(&self) -> impl Iterator<Item = (NoteId, &Note)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.note.as_ref().map(|note| {
                (
                    NoteId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    note,
                )
            })
        })
    }

    /// All notes sorted by start beat
    pub fn sorted(&self) -> Vec<(NoteId, &Note)> {
        let mut notes: Vec<_> = self.iter().collect();
        notes.sort_by_key(|(_, n)| (n.start_beat, n.end_beat));
        notes
    }

    /// Handles of notes matching a predicate, sorted by start beat
    pub fn notes_with<F>(&self, predicate: F) -> Vec<NoteId>
    where
        F: Fn(&Note) -> bool,
    {
        let mut matches: Vec<(NoteId, &Note)> =
            self.iter().filter(|(_, note)| predicate(note)).collect();
        matches.sort_by_key(|(_, n)| (n.start_beat, n.end_beat));
        matches.into_iter().map(|(id, _)| id).collect()
    }

    /// Find a pair of overlapping notes, if any
    pub fn find_overlap(&self) -> Option<(NoteId, NoteId)> {
        // Sorted by start, any overlap implies an overlapping neighbour pair
        self.sorted()
            .windows(2)
            .find(|pair| pair[0].1.overlaps(pair[1].1))
            .map(|pair| (pair[0].0, pair[1].0))
    }

    /// Remove every note
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.note.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.len = 0;
        self.revision += 1;
    }
}
