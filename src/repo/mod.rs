//! Repository-side helpers: identifiers, file selection, excerpts.

pub mod excerpt;
pub mod identifier;
pub mod selector;

pub use excerpt::{probe_manifests, truncate_chars, FileExcerpt, DEPENDENCY_MANIFESTS};
pub use identifier::RepoId;
pub use selector::{score_path, FileSelector, ScoredFile, SelectorConfig};
