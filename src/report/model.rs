//! The full result of one analysis run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::schema::{ArchitectureAnalysis, Pitfall, ProjectSummary, SetupGuide};
use crate::ports::RepositoryInfo;
use crate::repo::FileExcerpt;
use crate::symbols::FileSymbols;

/// Output of the two required analysis steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Project summary.
    pub summary: ProjectSummary,
    /// Architecture analysis.
    pub architecture: ArchitectureAnalysis,
}

/// Everything one run produced. Cached and replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedReport {
    /// Identifier of the run that produced this report.
    pub run_id: String,
    /// When the run finished; freshness is measured from here.
    pub timestamp: DateTime<Utc>,
    /// Repository metadata.
    pub repo_info: RepositoryInfo,
    /// README text, empty when the repository has none.
    #[serde(default)]
    pub readme: String,
    /// Language name to byte count.
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
    /// Summary and architecture.
    pub analysis: AnalysisResult,
    /// Excerpts of the selected files.
    #[serde(default)]
    pub deep_scan: Vec<FileExcerpt>,
    /// Setup instructions.
    #[serde(default)]
    pub setup: SetupGuide,
    /// Pitfalls, most important first.
    #[serde(default)]
    pub pitfalls: Vec<Pitfall>,
    /// Symbol tables for the top-ranked files.
    #[serde(default)]
    pub static_analysis: Vec<FileSymbols>,
    /// Generated documentation.
    pub wiki_markdown: String,
    /// Dependency manifests found at the root.
    #[serde(default)]
    pub dependency_files: Vec<FileExcerpt>,
}
