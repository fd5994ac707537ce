//! Binary project codec.
//!
//! Single-pass, little-endian, no random access. Counts and enums are 4-byte
//! signed integers, floats are 4-byte IEEE, bools are single bytes, strings
//! carry a 7-bit variable-length byte count followed by UTF-8 data.
//!
//! Slide-link relations are never serialized: the per-note `isLinked` byte is
//! written for compatibility and discarded on read, so a reloaded project
//! always contains unlinked notes.

use std::io::{self, Read, Write};

use crate::model::{
    AudioSource, Chart, ChartData, Difficulty, Note, NoteKind, NoteList, PianoSound, Project,
    SpeedLine, Tempo, WarningType,
};
use crate::stage::StageConfig;

pub const PROJECT_MAGIC: u16 = 0xDEE0;
pub const PROJECT_VERSION: u8 = 1;

/// Encodes a whole project, header included.
pub fn encode_project<W: Write>(writer: &mut W, project: &Project) -> io::Result<()> {
    write_u16(writer, PROJECT_MAGIC)?;
    write_u8(writer, PROJECT_VERSION)?;

    write_string(writer, &project.music_name)?;
    write_string(writer, &project.composer)?;
    write_string(writer, &project.chart_designer)?;
    match &project.audio {
        AudioSource::Reference(path) => {
            write_bool(writer, true)?;
            write_string(writer, path)?;
        }
        AudioSource::Embedded(data) => {
            write_bool(writer, false)?;
            write_i32(writer, data.len() as i32)?;
            writer.write_all(data)?;
        }
    }

    write_i32(writer, project.charts.len() as i32)?;
    for chart in &project.charts {
        write_chart(writer, chart)?;
    }

    write_i32(writer, project.tempos.len() as i32)?;
    for tempo in &project.tempos {
        write_f32(writer, tempo.bpm)?;
        write_f32(writer, tempo.start_time)?;
    }

    Ok(())
}

/// Decodes a whole project.
///
/// An unrecognized magic number or version yields `Ok(None)`: the stream is
/// simply not a project file, which the caller surfaces as "could not open".
/// Any read failure after the header propagates as an error.
pub fn decode_project<R: Read>(
    reader: &mut R,
    config: &StageConfig,
) -> io::Result<Option<Project>> {
    let magic = read_u16(reader)?;
    if magic != PROJECT_MAGIC {
        return Ok(None);
    }
    let version = read_u8(reader)?;
    if version != PROJECT_VERSION {
        return Ok(None);
    }

    let music_name = read_string(reader)?;
    let composer = read_string(reader)?;
    let chart_designer = read_string(reader)?;
    let audio = if read_bool(reader)? {
        AudioSource::Reference(read_string(reader)?)
    } else {
        let len = read_len(reader)?;
        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;
        AudioSource::Embedded(data)
    };

    let chart_count = read_len(reader)?;
    let mut charts = Vec::with_capacity(chart_count);
    for _ in 0..chart_count {
        charts.push(read_chart(reader, config)?);
    }

    let tempo_count = read_len(reader)?;
    let mut tempos = Vec::with_capacity(tempo_count);
    for _ in 0..tempo_count {
        let bpm = read_f32(reader)?;
        let start_time = read_f32(reader)?;
        tempos.push(Tempo::new(bpm, start_time));
    }

    Ok(Some(Project {
        music_name,
        composer,
        chart_designer,
        audio,
        charts,
        tempos,
    }))
}

fn write_chart<W: Write>(writer: &mut W, chart: &Chart) -> io::Result<()> {
    write_i32(writer, chart.difficulty.to_i32())?;
    write_string(writer, &chart.level)?;
    write_chart_data(writer, &chart.data)
}

fn read_chart<R: Read>(reader: &mut R, config: &StageConfig) -> io::Result<Chart> {
    let difficulty = Difficulty::from_i32(read_i32(reader)?);
    let level = read_string(reader)?;
    let data = read_chart_data(reader)?;

    let mut chart = Chart::new(data, config);
    chart.difficulty = difficulty;
    chart.level = level;
    Ok(chart)
}

fn write_chart_data<W: Write>(writer: &mut W, data: &ChartData) -> io::Result<()> {
    write_f32(writer, data.speed)?;
    write_i32(writer, data.min_velocity)?;
    write_i32(writer, data.max_velocity)?;
    write_i32(writer, data.remap_min_velocity)?;
    write_i32(writer, data.remap_max_velocity)?;

    write_i32(writer, data.notes.len() as i32)?;
    for (_, note) in data.notes.iter() {
        write_note(writer, note)?;
    }

    write_i32(writer, data.speed_lines.len() as i32)?;
    for line in &data.speed_lines {
        write_f32(writer, line.speed)?;
        write_f32(writer, line.start_time)?;
        write_f32(writer, line.end_time)?;
        write_i32(writer, line.warning_type.to_i32())?;
    }

    Ok(())
}

fn read_chart_data<R: Read>(reader: &mut R) -> io::Result<ChartData> {
    let speed = read_f32(reader)?;
    let min_velocity = read_i32(reader)?;
    let max_velocity = read_i32(reader)?;
    let remap_min_velocity = read_i32(reader)?;
    let remap_max_velocity = read_i32(reader)?;

    let note_count = read_len(reader)?;
    let mut notes = Vec::with_capacity(note_count);
    for _ in 0..note_count {
        notes.push(read_note(reader)?);
    }

    let line_count = read_len(reader)?;
    let mut speed_lines = Vec::with_capacity(line_count);
    for _ in 0..line_count {
        speed_lines.push(SpeedLine {
            speed: read_f32(reader)?,
            start_time: read_f32(reader)?,
            end_time: read_f32(reader)?,
            warning_type: WarningType::from_i32(read_i32(reader)?),
        });
    }

    Ok(ChartData {
        speed,
        min_velocity,
        max_velocity,
        remap_min_velocity,
        remap_max_velocity,
        notes: NoteList::from_notes(notes),
        speed_lines,
    })
}

fn write_note<W: Write>(writer: &mut W, note: &Note) -> io::Result<()> {
    write_i32(writer, note.kind.to_i32())?;
    write_i32(writer, note.sounds.len() as i32)?;
    for sound in &note.sounds {
        write_f32(writer, sound.delay)?;
        write_f32(writer, sound.duration)?;
        write_i32(writer, sound.pitch)?;
        write_i32(writer, sound.velocity)?;
    }
    write_f32(writer, note.position)?;
    write_f32(writer, note.size)?;
    write_f32(writer, note.time)?;
    write_f32(writer, note.shift)?;
    write_f32(writer, note.speed)?;
    write_f32(writer, note.duration)?;
    write_bool(writer, note.vibrate)?;
    write_bool(writer, note.is_swipe)?;
    write_i32(writer, note.warning_type.to_i32())?;
    write_string(writer, &note.event_id)?;
    write_bool(writer, note.is_linked())?;
    Ok(())
}

fn read_note<R: Read>(reader: &mut R) -> io::Result<Note> {
    let kind = NoteKind::from_i32(read_i32(reader)?);

    let sound_count = read_len(reader)?;
    let mut sounds = Vec::with_capacity(sound_count);
    for _ in 0..sound_count {
        sounds.push(PianoSound {
            delay: read_f32(reader)?,
            duration: read_f32(reader)?,
            pitch: read_i32(reader)?,
            velocity: read_i32(reader)?,
        });
    }

    let position = read_f32(reader)?;
    let size = read_f32(reader)?;
    let time = read_f32(reader)?;
    let shift = read_f32(reader)?;
    let speed = read_f32(reader)?;
    let duration = read_f32(reader)?;
    let vibrate = read_bool(reader)?;
    let is_swipe = read_bool(reader)?;
    let warning_type = WarningType::from_i32(read_i32(reader)?);
    let event_id = read_string(reader)?;
    // Link relations are not serialized; the flag alone carries no usable
    // information, so a reloaded note is always unlinked.
    let _was_linked = read_bool(reader)?;

    Ok(Note {
        time,
        position,
        size,
        duration,
        speed,
        shift,
        vibrate,
        is_swipe,
        warning_type,
        event_id,
        sounds,
        kind,
        prev_link: None,
        next_link: None,
    })
}

fn write_u8<W: Write>(writer: &mut W, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

fn write_u16<W: Write>(writer: &mut W, value: u16) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_f32<W: Write>(writer: &mut W, value: f32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

fn write_bool<W: Write>(writer: &mut W, value: bool) -> io::Result<()> {
    write_u8(writer, value as u8)
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    let mut len = value.len() as u32;
    loop {
        let byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            write_u8(writer, byte)?;
            break;
        }
        write_u8(writer, byte | 0x80)?;
    }
    writer.write_all(value.as_bytes())
}

fn read_u8<R: Read>(reader: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_f32<R: Read>(reader: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

fn read_bool<R: Read>(reader: &mut R) -> io::Result<bool> {
    Ok(read_u8(reader)? != 0)
}

/// Reads a 4-byte count, rejecting negative values as corrupt data.
fn read_len<R: Read>(reader: &mut R) -> io::Result<usize> {
    let value = read_i32(reader)?;
    usize::try_from(value)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "negative element count"))
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut len: u64 = 0;
    let mut shift = 0;
    loop {
        let byte = read_u8(reader)?;
        len |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
        if shift > 28 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "string length prefix too long",
            ));
        }
    }
    let len = usize::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "string length out of range"))?;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "string is not valid UTF-8"))
}
