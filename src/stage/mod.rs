// Stage projection: the display-ready views derived from a chart's flat
// note list, and the queries the editor runs against them.

pub mod config;
pub mod projection;
pub mod query;

pub use config::StageConfig;
pub use projection::{HeadEntry, StageEntry, StageProjection, TailEntry};
