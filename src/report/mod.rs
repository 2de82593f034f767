//! The Cached Report, its single-slot store, and rendering.

pub mod model;
pub mod render;
pub mod store;

pub use model::{AnalysisResult, CachedReport};
pub use render::render_markdown;
pub use store::{is_expired, FileReportStore, ReportStore};
