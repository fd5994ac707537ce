use id_arena::Id;

use super::sound::PianoSound;
use crate::stage::StageConfig;

/// Stable identifier of a note inside a [`NoteList`](super::NoteList) arena.
///
/// Links between notes are stored as ids, never as pointers, so removing or
/// cloning notes can never leave a dangling reference behind.
pub type NoteId = Id<Note>;

/// Legacy note kind carried by both file formats.
///
/// Kept for serialization compatibility only; nothing in the engine branches
/// on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteKind {
    #[default]
    Hit,
    Slide,
}

impl NoteKind {
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => NoteKind::Slide,
            _ => NoteKind::Hit,
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            NoteKind::Hit => 0,
            NoteKind::Slide => 1,
        }
    }
}

/// Warning type of a note or speed line.
///
/// Only the default ("none") variant is known; unrecognized values in either
/// file format fall back to it instead of failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningType {
    #[default]
    Default,
}

impl WarningType {
    pub fn from_i32(_value: i32) -> Self {
        WarningType::Default
    }

    pub fn to_i32(self) -> i32 {
        match self {
            WarningType::Default => 0,
        }
    }
}

/// A single timed performance event in a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Time in seconds from the start of the music.
    pub time: f32,
    /// Lane coordinate; 0 is the stage center.
    pub position: f32,
    pub size: f32,
    /// Interval duration in seconds; 0 for point events.
    pub duration: f32,
    /// Per-note playback speed multiplier.
    pub speed: f32,
    pub shift: f32,
    pub vibrate: bool,
    pub is_swipe: bool,
    pub warning_type: WarningType,
    pub event_id: String,
    /// Piano sounds emitted when the note is hit.
    pub sounds: Vec<PianoSound>,
    /// Legacy serialized field, see [`NoteKind`].
    pub kind: NoteKind,
    /// Slide link to the preceding note of the slide chain.
    ///
    /// Maintained by [`NoteList::link`](super::NoteList::link) and
    /// [`NoteList::unlink`](super::NoteList::unlink); both sides must be
    /// updated together.
    pub prev_link: Option<NoteId>,
    /// Slide link to the following note of the slide chain.
    pub next_link: Option<NoteId>,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            time: 0.0,
            position: 0.0,
            size: 0.0,
            duration: 0.0,
            speed: 1.0,
            shift: 0.0,
            vibrate: false,
            is_swipe: false,
            warning_type: WarningType::Default,
            event_id: String::new(),
            sounds: Vec::new(),
            kind: NoteKind::Hit,
            prev_link: None,
            next_link: None,
        }
    }
}

impl Note {
    /// A note is part of a slide chain iff at least one link is set.
    pub fn is_linked(&self) -> bool {
        self.prev_link.is_some() || self.next_link.is_some()
    }

    /// A hold spans an interval; swipes never count as holds even when their
    /// in-memory duration is nonzero.
    pub fn is_hold(&self) -> bool {
        !self.is_swipe && self.duration > 0.0
    }

    pub fn end_time(&self) -> f32 {
        self.time + self.duration
    }

    pub fn has_sound(&self) -> bool {
        !self.sounds.is_empty()
    }

    /// Whether the note lands on the visible stage. Pure function of the
    /// position and the stage bound, independent of any edit state.
    pub fn is_visible(&self, config: &StageConfig) -> bool {
        config.is_on_stage(self.position)
    }

    /// Deep copy of all value fields and the sound list.
    ///
    /// The clone is always unlinked: link ids belong to the source arena and
    /// carrying them over would alias the original's slide chain.
    pub fn clone_unlinked(&self) -> Note {
        Note {
            time: self.time,
            position: self.position,
            size: self.size,
            duration: self.duration,
            speed: self.speed,
            shift: self.shift,
            vibrate: self.vibrate,
            is_swipe: self.is_swipe,
            warning_type: self.warning_type,
            event_id: self.event_id.clone(),
            sounds: self.sounds.clone(),
            kind: self.kind,
            prev_link: None,
            next_link: None,
        }
    }
}
