use std::ops::{Index, IndexMut};

use id_arena::Arena;

use super::note::{Note, NoteId};

/// The flat, time-ordered note list of a chart.
///
/// Notes live in an arena and are addressed by stable [`NoteId`]s; `order`
/// holds the ids sorted non-decreasing by time. This list is the single
/// source of truth for a chart: the stage projection is derived from it and
/// rebuilt on demand, never the other way around (except for the save-time
/// merge).
#[derive(Debug, Clone, Default)]
pub struct NoteList {
    arena: Arena<Note>,
    order: Vec<NoteId>,
}

impl NoteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from notes already sorted by the caller, preserving the
    /// given order.
    pub fn from_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let mut list = Self::new();
        for note in notes {
            let id = list.arena.alloc(note);
            list.order.push(id);
        }
        debug_assert!(list.is_time_ordered());
        list
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in time order.
    pub fn ids(&self) -> impl Iterator<Item = NoteId> + '_ {
        self.order.iter().copied()
    }

    /// Notes with their ids, in time order.
    pub fn iter(&self) -> impl Iterator<Item = (NoteId, &Note)> + '_ {
        self.order.iter().map(|&id| (id, &self.arena[id]))
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.arena.get(id)
    }

    pub fn get_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.arena.get_mut(id)
    }

    /// Appends a note. The caller guarantees its time is not less than the
    /// last note's time.
    pub fn push(&mut self, note: Note) -> NoteId {
        debug_assert!(
            self.order
                .last()
                .is_none_or(|&last| self.arena[last].time <= note.time)
        );
        let id = self.arena.alloc(note);
        self.order.push(id);
        id
    }

    /// Inserts a note at the position keeping the list time-ordered. Among
    /// equal times the new note goes last, so insertion is stable.
    pub fn insert_ordered(&mut self, note: Note) -> NoteId {
        let time = note.time;
        let index = self
            .order
            .partition_point(|&id| self.arena[id].time <= time);
        let id = self.arena.alloc(note);
        self.order.insert(index, id);
        id
    }

    /// Links `first -> second` as consecutive notes of a slide chain.
    ///
    /// Two-sided update: `first.next_link` and `second.prev_link` are set
    /// together. No cycle detection is performed; that is the caller's
    /// responsibility.
    pub fn link(&mut self, first: NoteId, second: NoteId) {
        self.arena[first].next_link = Some(second);
        self.arena[second].prev_link = Some(first);
    }

    /// Removes `id` from its slide chain.
    ///
    /// Clears both links of `id` and the reciprocal link of each previously
    /// linked neighbor. The chain is severed, not bridged: a former
    /// predecessor keeps its own `prev_link` and a former successor keeps
    /// its own `next_link`, they are just no longer connected through `id`.
    pub fn unlink(&mut self, id: NoteId) {
        let prev = self.arena[id].prev_link.take();
        let next = self.arena[id].next_link.take();
        if let Some(prev) = prev {
            self.arena[prev].next_link = None;
        }
        if let Some(next) = next {
            self.arena[next].prev_link = None;
        }
    }

    /// Deep copy of a stored note, always unlinked.
    pub fn clone_note(&self, id: NoteId) -> Note {
        self.arena[id].clone_unlinked()
    }

    /// Checks the non-decreasing-by-time invariant.
    pub fn is_time_ordered(&self) -> bool {
        self.order
            .windows(2)
            .all(|pair| self.arena[pair[0]].time <= self.arena[pair[1]].time)
    }
}

impl Index<NoteId> for NoteList {
    type Output = Note;

    fn index(&self, id: NoteId) -> &Note {
        &self.arena[id]
    }
}

impl IndexMut<NoteId> for NoteList {
    fn index_mut(&mut self, id: NoteId) -> &mut Note {
        &mut self.arena[id]
    }
}
