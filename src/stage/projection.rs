use tracing::debug;

use super::config::StageConfig;
use crate::model::{Note, NoteId, NoteList};

/// A visible-sequence entry wrapping one on-stage note, plus transient
/// editor state that does not survive a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadEntry {
    pub note: NoteId,
    selected: bool,
    in_selection: bool,
    pub collision_count: i32,
}

impl HeadEntry {
    pub fn new(note: NoteId) -> Self {
        Self {
            note,
            selected: false,
            in_selection: false,
            collision_count: 0,
        }
    }

    /// Effective selection state. While a box-selection drag is in progress
    /// the `in_selection` flag toggles the committed state, hence the XOR.
    pub fn is_selected(&self) -> bool {
        self.selected ^ self.in_selection
    }

    pub fn set_selected(&mut self, value: bool) {
        self.selected = value;
        self.in_selection = false;
    }

    pub fn set_in_selection(&mut self, value: bool) {
        self.in_selection = value;
    }

    pub fn is_collided(&self) -> bool {
        self.collision_count > 0
    }
}

/// A synthesized visible-sequence entry marking where a hold note's interval
/// ends. Owns no note data; `head` is the hold note it closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailEntry {
    pub head: NoteId,
}

/// One element of the visible sequence: either a note head or a hold tail.
#[derive(Debug, Clone, PartialEq)]
pub enum StageEntry {
    Head(HeadEntry),
    Tail(TailEntry),
}

impl StageEntry {
    /// Stage time of the entry: a head sits at its note's time, a tail at
    /// the hold's end time.
    pub fn time(&self, notes: &NoteList) -> f32 {
        match self {
            StageEntry::Head(head) => notes[head.note].time,
            StageEntry::Tail(tail) => notes[tail.head].end_time(),
        }
    }

    pub fn position(&self, notes: &NoteList) -> f32 {
        match self {
            StageEntry::Head(head) => notes[head.note].position,
            StageEntry::Tail(tail) => notes[tail.head].position,
        }
    }

    pub fn as_head(&self) -> Option<&HeadEntry> {
        match self {
            StageEntry::Head(head) => Some(head),
            StageEntry::Tail(_) => None,
        }
    }

    pub fn as_head_mut(&mut self) -> Option<&mut HeadEntry> {
        match self {
            StageEntry::Head(head) => Some(head),
            StageEntry::Tail(_) => None,
        }
    }

    pub fn is_tail(&self) -> bool {
        matches!(self, StageEntry::Tail(_))
    }
}

/// Display-ready views derived from a chart's flat note list.
///
/// `visible` interleaves note heads with synthesized hold tails, both
/// non-decreasing by time; `background` holds the off-stage notes in their
/// original order. A derived cache: rebuilt in one pass from the flat list,
/// never edited structurally in place.
#[derive(Debug, Clone, Default)]
pub struct StageProjection {
    visible: Vec<StageEntry>,
    background: Vec<NoteId>,
    hold_count: usize,
}

impl StageProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> &[StageEntry] {
        &self.visible
    }

    pub fn background(&self) -> &[NoteId] {
        &self.background
    }

    /// Length of the visible sequence, tails included.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Number of hold notes, which equals the number of tail entries.
    pub fn hold_count(&self) -> usize {
        self.hold_count
    }

    /// Number of scorable events: visible entries minus synthesized tails.
    /// This is the total combo of the chart.
    pub fn note_count(&self) -> usize {
        self.visible.len() - self.hold_count
    }

    pub fn entry(&self, index: usize) -> &StageEntry {
        &self.visible[index]
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut StageEntry {
        &mut self.visible[index]
    }

    /// Head entries of the visible sequence, in order.
    pub fn heads(&self) -> impl Iterator<Item = &HeadEntry> + '_ {
        self.visible.iter().filter_map(StageEntry::as_head)
    }

    /// Rebuilds both sequences from the flat note list in a single forward
    /// pass.
    ///
    /// The caller guarantees `notes` is non-decreasing by time. Hold tails
    /// are buffered in ascending end-time order and flushed in front of the
    /// first later head whose time passes their end time, so insertion stays
    /// O(open holds) and ordering among equal times is stable.
    pub fn rebuild(&mut self, notes: &NoteList, config: &StageConfig) {
        self.visible.clear();
        self.background.clear();
        self.hold_count = 0;

        // Holds already emitted as heads, ascending by end time, waiting for
        // their tail entry.
        let mut pending_tails: Vec<(f32, NoteId)> = Vec::new();

        for (id, note) in notes.iter() {
            if !note.is_visible(config) {
                self.background.push(id);
                continue;
            }

            while let Some(&(end_time, head)) = pending_tails.first() {
                if end_time >= note.time {
                    break;
                }
                self.visible.push(StageEntry::Tail(TailEntry { head }));
                self.hold_count += 1;
                pending_tails.remove(0);
            }

            self.visible.push(StageEntry::Head(HeadEntry::new(id)));
            if note.is_hold() {
                let end_time = note.end_time();
                let mut index = 0;
                while index < pending_tails.len() {
                    if pending_tails[index].0 > end_time {
                        break;
                    }
                    index += 1;
                }
                pending_tails.insert(index, (end_time, id));
            }
        }

        for (_, head) in pending_tails {
            self.visible.push(StageEntry::Tail(TailEntry { head }));
            self.hold_count += 1;
        }

        debug!(
            visible = self.visible.len(),
            background = self.background.len(),
            holds = self.hold_count,
            "rebuilt stage projection"
        );

        debug_assert!(
            self.visible_in_order(notes),
            "visible sequence must be non-decreasing by time"
        );
        debug_assert!(
            self.background_in_order(notes),
            "background sequence must be non-decreasing by time"
        );
    }

    /// Reconstructs a flat, time-ordered note list for persistence.
    ///
    /// Stable two-pointer merge of the visible head entries (tails are
    /// derived data and dropped) with the background sequence; ties emit the
    /// visible entry first. Every emitted note is a deep, unlinked clone,
    /// and swipe durations are zeroed here so the swipe/hold exclusion
    /// holds in every saved file.
    pub fn merged_notes(&self, notes: &NoteList) -> Vec<Note> {
        debug_assert!(self.visible_in_order(notes));
        debug_assert!(self.background_in_order(notes));

        let mut merged = Vec::with_capacity(self.note_count() + self.background.len());
        let mut heads = self.heads().map(|head| head.note).peekable();
        let mut background = self.background.iter().copied().peekable();

        loop {
            let id = match (heads.peek(), background.peek()) {
                (Some(&front), Some(&back)) => {
                    if notes[front].time <= notes[back].time {
                        heads.next();
                        front
                    } else {
                        background.next();
                        back
                    }
                }
                (Some(&front), None) => {
                    heads.next();
                    front
                }
                (None, Some(&back)) => {
                    background.next();
                    back
                }
                (None, None) => break,
            };

            let mut clone = notes.clone_note(id);
            if clone.is_swipe {
                clone.duration = 0.0;
            }
            merged.push(clone);
        }

        merged
    }

    fn visible_in_order(&self, notes: &NoteList) -> bool {
        self.visible
            .windows(2)
            .all(|pair| pair[0].time(notes) <= pair[1].time(notes))
    }

    fn background_in_order(&self, notes: &NoteList) -> bool {
        self.background
            .windows(2)
            .all(|pair| notes[pair[0]].time <= notes[pair[1]].time)
    }
}
