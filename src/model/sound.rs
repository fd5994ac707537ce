/// A single piano sound emission attached to a note.
///
/// Pure value data: `delay` and `duration` are in seconds, `pitch` is a MIDI
/// note number, `velocity` a MIDI velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PianoSound {
    pub delay: f32,
    pub duration: f32,
    pub pitch: i32,
    pub velocity: i32,
}

impl PianoSound {
    pub fn new(delay: f32, duration: f32, pitch: i32, velocity: i32) -> Self {
        Self {
            delay,
            duration,
            pitch,
            velocity,
        }
    }
}
