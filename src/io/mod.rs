// Persistence: binary project files, the JSON chart interchange subformat,
// and extension-based dispatch between them.

mod binary;
mod error;
mod interchange;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Result;
use tracing::info;

pub use binary::*;
pub use error::*;
pub use interchange::*;

use crate::model::{ChartData, Project};
use crate::stage::StageConfig;

/// Preferred extension of binary project files.
pub const PROJECT_EXTENSION: &str = "dnt";
/// Extensions parsed through the chart interchange path.
pub const CHART_EXTENSIONS: [&str; 2] = ["json", "txt"];

/// Whether a path should be parsed as an interchange chart document.
pub fn is_chart_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CHART_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c)))
}

/// Result of opening an arbitrary supported file.
#[derive(Debug)]
pub enum LoadedFile {
    Project(Project),
    Chart(ChartData),
}

/// Opens a file by extension: interchange extensions go through the chart
/// parser, everything else through the binary protocol. `Ok(None)` means
/// the file is not a recognized project (bad magic or version).
pub fn load_file(path: &Path, config: &StageConfig) -> Result<Option<LoadedFile>> {
    if is_chart_path(path) {
        return Ok(Some(LoadedFile::Chart(load_chart(path)?)));
    }
    Ok(load_project(path, config)?.map(LoadedFile::Project))
}

/// Loads a binary project file.
///
/// `Ok(None)` is the recoverable "not a project file" outcome; a truncated
/// or corrupted body is a hard error.
pub fn load_project(path: &Path, config: &StageConfig) -> Result<Option<Project>> {
    let file = File::open(path).map_err(|e| ProjectFileError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = BufReader::new(file);

    let project = decode_project(&mut reader, config).map_err(ProjectFileError::Stream)?;
    match &project {
        Some(project) => info!(
            path = %path.display(),
            charts = project.charts.len(),
            "loaded project"
        ),
        None => info!(path = %path.display(), "not a recognized project file"),
    }
    Ok(project)
}

/// Saves a project: merges each chart's projection back into a flat note
/// list, then encodes the result.
pub fn save_project(path: &Path, project: &Project, config: &StageConfig) -> Result<()> {
    let save_ready = project.clone_for_save(config);

    let file = File::create(path).map_err(|e| ProjectFileError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    encode_project(&mut writer, &save_ready).map_err(ProjectFileError::Stream)?;

    info!(path = %path.display(), charts = save_ready.charts.len(), "saved project");
    Ok(())
}

/// Loads an interchange chart document.
pub fn load_chart(path: &Path) -> Result<ChartData> {
    let text = std::fs::read_to_string(path).map_err(|e| ProjectFileError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let data = chart_from_json(&text).map_err(ProjectFileError::ChartParse)?;
    info!(path = %path.display(), notes = data.notes.len(), "loaded chart");
    Ok(data)
}

/// Writes an interchange chart document.
pub fn save_chart(path: &Path, data: &ChartData) -> Result<()> {
    let text = chart_to_json(data).map_err(ProjectFileError::ChartParse)?;
    std::fs::write(path, text).map_err(|e| ProjectFileError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
