//! JSON chart interchange subformat.
//!
//! A chart is an object with a `speed` and a `notes` array; every other
//! chart-level parameter keeps its default. The note field contract follows
//! the established interchange keys (`pos`, `_time`, `w`/`d`/`p`/`v` sounds
//! and so on); unknown keys and unknown warning types are tolerated, missing
//! keys fall back to documented defaults.

use serde::{Deserialize, Serialize};

use crate::model::{ChartData, Note, NoteKind, NoteList, PianoSound, WarningType};

#[derive(Debug, Serialize, Deserialize)]
struct ChartJson {
    #[serde(default = "default_speed")]
    speed: f32,
    #[serde(default)]
    notes: Vec<NoteJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NoteJson {
    #[serde(rename = "type", default)]
    kind: i32,
    #[serde(default)]
    sounds: Vec<SoundJson>,
    #[serde(default)]
    pos: f32,
    #[serde(default)]
    size: f32,
    /// Authoritative note time.
    #[serde(rename = "_time", default, skip_serializing_if = "Option::is_none")]
    time: Option<f32>,
    /// Alias some writers emit instead of (or along with) `_time`. Never
    /// written back; when both keys are present `_time` wins.
    #[serde(rename = "time", default, skip_serializing)]
    time_alias: Option<f32>,
    #[serde(default)]
    shift: f32,
    #[serde(default = "default_speed")]
    speed: f32,
    #[serde(default)]
    duration: f32,
    #[serde(default)]
    vibrate: bool,
    #[serde(default)]
    swipe: bool,
    #[serde(rename = "warningType", default)]
    warning_type: i32,
    #[serde(rename = "eventId", default)]
    event_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SoundJson {
    #[serde(default)]
    w: f32,
    #[serde(default)]
    d: f32,
    #[serde(default)]
    p: i32,
    #[serde(default)]
    v: i32,
}

fn default_speed() -> f32 {
    1.0
}

/// Parses an interchange chart document.
///
/// Notes are sorted by time (stable) after parsing so the resulting flat
/// list satisfies the projection builder's ordering contract even for
/// hand-edited files.
pub fn chart_from_json(text: &str) -> Result<ChartData, serde_json::Error> {
    let chart: ChartJson = serde_json::from_str(text)?;

    let mut notes: Vec<Note> = chart.notes.into_iter().map(note_from_json).collect();
    notes.sort_by(|a, b| a.time.total_cmp(&b.time));

    Ok(ChartData {
        speed: chart.speed,
        notes: NoteList::from_notes(notes),
        ..Default::default()
    })
}

/// Serializes a chart to the interchange format. Only `_time` is written;
/// the `time` alias is a read-side compatibility measure.
pub fn chart_to_json(data: &ChartData) -> Result<String, serde_json::Error> {
    let chart = ChartJson {
        speed: data.speed,
        notes: data.notes.iter().map(|(_, note)| note_to_json(note)).collect(),
    };
    serde_json::to_string(&chart)
}

fn note_from_json(json: NoteJson) -> Note {
    Note {
        time: json.time.or(json.time_alias).unwrap_or(0.0),
        position: json.pos,
        size: json.size,
        duration: json.duration,
        speed: json.speed,
        shift: json.shift,
        vibrate: json.vibrate,
        is_swipe: json.swipe,
        warning_type: WarningType::from_i32(json.warning_type),
        event_id: json.event_id,
        sounds: json
            .sounds
            .into_iter()
            .map(|s| PianoSound::new(s.w, s.d, s.p, s.v))
            .collect(),
        kind: NoteKind::from_i32(json.kind),
        prev_link: None,
        next_link: None,
    }
}

fn note_to_json(note: &Note) -> NoteJson {
    NoteJson {
        kind: note.kind.to_i32(),
        sounds: note
            .sounds
            .iter()
            .map(|s| SoundJson {
                w: s.delay,
                d: s.duration,
                p: s.pitch,
                v: s.velocity,
            })
            .collect(),
        pos: note.position,
        size: note.size,
        time: Some(note.time),
        time_alias: None,
        shift: note.shift,
        speed: note.speed,
        duration: note.duration,
        vibrate: note.vibrate,
        swipe: note.is_swipe,
        warning_type: note.warning_type.to_i32(),
        event_id: note.event_id.clone(),
    }
}
