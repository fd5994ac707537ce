use super::note::WarningType;
use super::note_list::NoteList;
use crate::stage::{StageConfig, StageProjection};

/// Chart difficulty tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Unknown,
    Easy,
    Normal,
    Hard,
    Extra,
}

impl Difficulty {
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Difficulty::Easy,
            1 => Difficulty::Normal,
            2 => Difficulty::Hard,
            3 => Difficulty::Extra,
            _ => Difficulty::Unknown,
        }
    }

    pub fn to_i32(self) -> i32 {
        match self {
            Difficulty::Unknown => -1,
            Difficulty::Easy => 0,
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
            Difficulty::Extra => 3,
        }
    }
}

/// A speed-change segment of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedLine {
    pub speed: f32,
    pub start_time: f32,
    pub end_time: f32,
    pub warning_type: WarningType,
}

/// The persistable payload of a chart: the flat note list plus chart-level
/// parameters.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub speed: f32,
    pub min_velocity: i32,
    pub max_velocity: i32,
    pub remap_min_velocity: i32,
    pub remap_max_velocity: i32,
    pub notes: NoteList,
    pub speed_lines: Vec<SpeedLine>,
}

impl Default for ChartData {
    fn default() -> Self {
        Self {
            speed: 1.0,
            min_velocity: 0,
            max_velocity: 0,
            remap_min_velocity: 0,
            remap_max_velocity: 0,
            notes: NoteList::new(),
            speed_lines: Vec::new(),
        }
    }
}

/// A named, leveled, difficulty-tagged chart.
///
/// Owns exactly one flat note list (the authoritative data) and exactly one
/// stage projection derived from it. The projection is a rebuildable cache:
/// after mutating `data.notes`, call [`Chart::rebuild_projection`].
#[derive(Debug, Clone)]
pub struct Chart {
    pub name: String,
    pub difficulty: Difficulty,
    pub level: String,
    pub data: ChartData,
    projection: StageProjection,
}

impl Chart {
    pub fn new(data: ChartData, config: &StageConfig) -> Self {
        let mut chart = Self {
            name: String::new(),
            difficulty: Difficulty::Unknown,
            level: String::new(),
            data,
            projection: StageProjection::new(),
        };
        chart.rebuild_projection(config);
        chart
    }

    pub fn projection(&self) -> &StageProjection {
        &self.projection
    }

    /// Mutable access to the projection, for transient per-entry state
    /// (selection, collision counters). Structural changes go through
    /// [`Chart::rebuild_projection`] instead.
    pub fn projection_mut(&mut self) -> &mut StageProjection {
        &mut self.projection
    }

    /// Rebuilds the derived visible/background sequences from the flat note
    /// list.
    pub fn rebuild_projection(&mut self, config: &StageConfig) {
        self.projection.rebuild(&self.data.notes, config);
    }

    /// Produces a save-ready copy of this chart.
    ///
    /// The new flat note list is reconstructed by merging the projection's
    /// head entries with the background sequence (see
    /// [`StageProjection::merged_notes`]); every note is deep-cloned and
    /// swipe durations are zeroed at this boundary.
    pub fn clone_for_save(&self, config: &StageConfig) -> Chart {
        let notes = NoteList::from_notes(self.projection.merged_notes(&self.data.notes));
        let data = ChartData {
            speed: self.data.speed,
            min_velocity: self.data.min_velocity,
            max_velocity: self.data.max_velocity,
            remap_min_velocity: self.data.remap_min_velocity,
            remap_max_velocity: self.data.remap_max_velocity,
            notes,
            speed_lines: self.data.speed_lines.clone(),
        };
        let mut chart = Chart::new(data, config);
        chart.name = self.name.clone();
        chart.difficulty = self.difficulty;
        chart.level = self.level.clone();
        chart
    }
}
