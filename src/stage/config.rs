use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::model::Note;

/// Stage geometry and collision thresholds.
///
/// Passed explicitly into the projection builder and the query surface so
/// that none of the core algorithms depend on ambient state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageConfig {
    /// Symmetric lane bound; a note is visible iff its position is within
    /// `[-max_position, max_position]`.
    pub max_position: f32,
    /// Two notes collide in time when their times differ by at most this.
    pub time_collision_threshold: f32,
    /// Two notes collide in position when their positions differ by at most
    /// this.
    pub position_collision_threshold: f32,
    pub min_note_size: f32,
    pub max_note_size: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            max_position: 2.0,
            time_collision_threshold: 0.001,
            position_collision_threshold: 0.01,
            min_note_size: 0.1,
            max_note_size: 5.0,
        }
    }
}

impl StageConfig {
    /// Loads config from a JSON file. Returns the default config if the file
    /// doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves config to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn is_on_stage(&self, position: f32) -> bool {
        position >= -self.max_position && position <= self.max_position
    }

    pub fn clamp_position(&self, position: f32) -> f32 {
        position.clamp(-self.max_position, self.max_position)
    }

    pub fn clamp_size(&self, size: f32) -> f32 {
        size.clamp(self.min_note_size, self.max_note_size)
    }

    pub fn is_time_collided(&self, left: &Note, right: &Note) -> bool {
        (right.time - left.time).abs() <= self.time_collision_threshold
    }

    pub fn is_position_collided(&self, left: &Note, right: &Note) -> bool {
        (right.position - left.position).abs() <= self.position_collision_threshold
    }

    pub fn is_collided(&self, left: &Note, right: &Note) -> bool {
        self.is_time_collided(left, right) && self.is_position_collided(left, right)
    }
}
