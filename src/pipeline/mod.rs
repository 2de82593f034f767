//! The analysis pipeline: state machine, step policy, model calls, and
//! the orchestrator that ties them together.

pub mod orchestrator;
pub mod prompts;
pub mod schema;
pub mod stage;
pub mod state;
pub mod structured;

pub use orchestrator::{analyze, rank_files, simulate, Analysis, AnalyzeOptions, Pipeline};
pub use schema::{
    ArchitectureAnalysis, Component, Pitfall, PitfallReport, ProjectSummary, SetupGuide, Severity,
};
pub use stage::{settle, Requirement};
pub use state::{PipelineState, Step};
