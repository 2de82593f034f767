//! Ranks a repository tree and picks the files worth sending to the model.
//!
//! Filtering drops build output, binaries and lockfiles; what remains is
//! scored by path heuristics and the best `max_files` entries are kept,
//! ties in tree order.

use serde::Serialize;

use crate::ports::{CandidateFile, EntryKind};

/// Default cap on the number of selected files.
pub const DEFAULT_MAX_FILES: usize = 12;

/// Path-based score bonuses. Terms are independent and additive.
const PREFIX_BONUSES: &[(&str, i32)] = &[("src/", 10), ("app/", 10), ("lib/", 8)];
const MARKER_BONUSES: &[(&str, i32)] = &[("main", 5), ("index", 5), ("server", 5), ("App", 5)];
const SHALLOW_BONUS: i32 = 2;
const SHALLOW_SEGMENTS: usize = 3;

/// Filtering and ranking parameters.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Maximum number of files returned.
    pub max_files: usize,
    /// A path containing any of these is never selected.
    pub excluded_substrings: Vec<String>,
    /// Accepted file extensions, including the dot.
    pub allowed_extensions: Vec<String>,
    /// Extensionless build files accepted by exact base name.
    pub build_file_names: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            excluded_substrings: to_strings(&[
                "node_modules",
                "dist",
                "build",
                "coverage",
                "package-lock.json",
                "yarn.lock",
                ".png",
                ".jpg",
                ".jpeg",
                ".gif",
                ".svg",
                ".ico",
                ".webp",
                ".git/",
            ]),
            allowed_extensions: to_strings(&[
                ".js", ".jsx", ".ts", ".tsx", ".mjs", ".py", ".rs", ".go", ".java", ".kt", ".rb",
                ".php", ".c", ".h", ".cpp", ".hpp", ".cs", ".swift", ".vue", ".svelte", ".json",
                ".toml", ".yml", ".yaml", ".md",
            ]),
            build_file_names: to_strings(&[
                "Dockerfile",
                "Makefile",
                "Gemfile",
                "Rakefile",
                "Procfile",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// A selected file and the score that ranked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredFile {
    /// The tree entry.
    pub file: CandidateFile,
    /// Heuristic importance.
    pub score: i32,
}

/// Filters and ranks tree entries.
#[derive(Debug, Clone, Default)]
pub struct FileSelector {
    config: SelectorConfig,
}

impl FileSelector {
    /// Creates a selector with the given configuration.
    #[must_use]
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Returns `true` if the entry may be selected at all.
    #[must_use]
    pub fn is_eligible(&self, entry: &CandidateFile) -> bool {
        if entry.kind != EntryKind::Blob {
            return false;
        }
        let path = entry.path.as_str();
        if self.config.excluded_substrings.iter().any(|ex| path.contains(ex.as_str())) {
            return false;
        }
        let base = path.rsplit('/').next().unwrap_or(path);
        self.config.allowed_extensions.iter().any(|ext| path.ends_with(ext.as_str()))
            || self.config.build_file_names.iter().any(|name| name == base)
    }

    /// Picks at most `max_files` eligible entries, highest score first.
    ///
    /// The sort is stable, so equal scores keep their tree order and the
    /// output is a pure function of the input.
    #[must_use]
    pub fn select(&self, entries: &[CandidateFile]) -> Vec<ScoredFile> {
        let mut scored: Vec<ScoredFile> = entries
            .iter()
            .filter(|entry| self.is_eligible(entry))
            .map(|entry| ScoredFile { file: entry.clone(), score: score_path(&entry.path) })
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(self.config.max_files);
        scored
    }
}

/// Heuristic importance of a path.
#[must_use]
pub fn score_path(path: &str) -> i32 {
    let prefix: i32 =
        PREFIX_BONUSES.iter().filter(|(p, _)| path.starts_with(p)).map(|(_, w)| w).sum();
    let markers: i32 =
        MARKER_BONUSES.iter().filter(|(m, _)| path.contains(m)).map(|(_, w)| w).sum();
    let shallow = if path.split('/').count() < SHALLOW_SEGMENTS { SHALLOW_BONUS } else { 0 };
    prefix + markers + shallow
}
