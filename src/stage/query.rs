use super::config::StageConfig;
use super::projection::{StageEntry, StageProjection};
use crate::model::{NoteId, NoteList};

impl StageProjection {
    fn is_head_of(entry: &StageEntry, note: NoteId) -> bool {
        matches!(entry, StageEntry::Head(head) if head.note == note)
    }

    /// Finds the visible-sequence index of the head entry wrapping `note`.
    ///
    /// Binary search by time, then disambiguation by id among equal-time
    /// entries, scanning left and right from the hit. Returns
    /// `Err(insertion_point)` when no entry for `note` exists, like a failed
    /// [`slice::binary_search`].
    pub fn search(&self, notes: &NoteList, note: NoteId) -> Result<usize, usize> {
        let time = notes[note].time;
        let visible = self.visible();
        let index = visible.binary_search_by(|entry| entry.time(notes).total_cmp(&time))?;

        if Self::is_head_of(&visible[index], note) {
            return Ok(index);
        }

        for i in (0..index).rev() {
            if visible[i].time(notes) != time {
                break;
            }
            if Self::is_head_of(&visible[i], note) {
                return Ok(i);
            }
        }

        for (i, entry) in visible.iter().enumerate().skip(index + 1) {
            if entry.time(notes) != time {
                break;
            }
            if Self::is_head_of(entry, note) {
                return Ok(i);
            }
        }

        Err(index)
    }

    /// Finds the tail entry closing the hold head at `head_index`.
    ///
    /// Returns `None` when the entry is not a hold head. A well-formed
    /// projection contains exactly one tail per hold, so a missing tail is a
    /// builder bug and panics rather than returning a sentinel.
    pub fn tail_of(&self, notes: &NoteList, head_index: usize) -> Option<usize> {
        let visible = self.visible();
        let head = match &visible[head_index] {
            StageEntry::Head(head) if notes[head.note].is_hold() => head.note,
            _ => return None,
        };

        for (i, entry) in visible.iter().enumerate().skip(head_index + 1) {
            if let StageEntry::Tail(tail) = entry {
                if tail.head == head {
                    return Some(i);
                }
            }
        }

        panic!("projection contains a hold note but not its tail entry");
    }

    /// [`StageProjection::tail_of`] addressed by note id instead of index.
    pub fn tail_of_note(&self, notes: &NoteList, note: NoteId) -> Option<usize> {
        if !notes[note].is_hold() {
            return None;
        }
        let index = self.search(notes, note).ok()?;
        self.tail_of(notes, index)
    }

    /// Collects the heads visually overlapping the head at `head_index`.
    ///
    /// Scans outward in both directions, skipping tail entries; each
    /// direction stops at the first head outside the time-collision window.
    /// Heads inside the window are collected when they also collide in
    /// position.
    pub fn collided_neighbors(
        &self,
        notes: &NoteList,
        config: &StageConfig,
        head_index: usize,
    ) -> Vec<NoteId> {
        let visible = self.visible();
        let center = match &visible[head_index] {
            StageEntry::Head(head) => &notes[head.note],
            StageEntry::Tail(_) => panic!("collision query requires a head entry"),
        };

        let mut collided = Vec::new();

        for i in (0..head_index).rev() {
            let head = match &visible[i] {
                StageEntry::Head(head) => head,
                StageEntry::Tail(_) => continue,
            };
            let other = &notes[head.note];
            if !config.is_time_collided(other, center) {
                break;
            }
            if config.is_position_collided(other, center) {
                collided.push(head.note);
            }
        }

        for entry in visible.iter().skip(head_index + 1) {
            let head = match entry {
                StageEntry::Head(head) => head,
                StageEntry::Tail(_) => continue,
            };
            let other = &notes[head.note];
            if !config.is_time_collided(center, other) {
                break;
            }
            if config.is_position_collided(center, other) {
                collided.push(head.note);
            }
        }

        collided
    }
}
