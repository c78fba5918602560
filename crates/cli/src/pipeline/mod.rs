//! Pipeline orchestration: decoder, dispatch, and final report assembly.

mod orchestrator;
mod stats;

pub use orchestrator::{Pipeline, PipelineConfig};
pub use stats::PipelineStats;
