use super::chart::Chart;
use crate::stage::StageConfig;

/// Where a project's music audio lives.
///
/// Either the raw bytes are embedded in the project file, or the file only
/// stores a path relative to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    Embedded(Vec<u8>),
    Reference(String),
}

impl Default for AudioSource {
    fn default() -> Self {
        AudioSource::Embedded(Vec::new())
    }
}

/// A tempo marker: `bpm` takes effect at `start_time` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tempo {
    pub bpm: f32,
    pub start_time: f32,
}

impl Tempo {
    pub fn new(bpm: f32, start_time: f32) -> Self {
        Self { bpm, start_time }
    }

    /// Seconds per beat at this tempo.
    pub fn beat_interval(&self) -> f32 {
        60.0 / self.bpm
    }
}

/// A whole authoring project: music metadata, audio, charts and tempo list.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub music_name: String,
    pub composer: String,
    pub chart_designer: String,
    pub audio: AudioSource,
    pub charts: Vec<Chart>,
    pub tempos: Vec<Tempo>,
}

impl Project {
    /// Produces a save-ready copy: each chart's flat note list is
    /// reconstructed from its projection via [`Chart::clone_for_save`].
    pub fn clone_for_save(&self, config: &StageConfig) -> Project {
        Project {
            music_name: self.music_name.clone(),
            composer: self.composer.clone(),
            chart_designer: self.chart_designer.clone(),
            audio: self.audio.clone(),
            charts: self
                .charts
                .iter()
                .map(|chart| chart.clone_for_save(config))
                .collect(),
            tempos: self.tempos.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_beat_interval() {
        let tempo = Tempo::new(160.0, 1.5);
        assert!((tempo.beat_interval() - 0.375).abs() < 1e-6);
    }
}
