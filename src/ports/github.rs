//! Repository host port for the GitHub REST API.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repo::RepoId;

/// Boxed future type alias used by [`RepoHost`] to keep the trait dyn-compatible.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HostError>> + Send + 'a>>;

/// Failure talking to the repository host.
///
/// Serializable so that cassettes preserve the variant: replayed
/// `NotFound` must still read as "absent".
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HostError {
    /// The repository, branch, or path does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The API rate limit is exhausted.
    #[error("GitHub API rate limit exceeded: {0}")]
    RateLimited(String),
    /// Any other non-success HTTP status.
    #[error("GitHub API error ({status}): {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, if any.
        message: String,
    },
    /// The request never produced a response.
    #[error("GitHub request failed: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("could not decode GitHub response: {0}")]
    Decode(String),
}

/// Repository metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// `owner/name` as reported by the host.
    pub full_name: String,
    /// Short description, if the owner set one.
    pub description: Option<String>,
    /// Browser URL of the repository.
    pub html_url: String,
    /// Branch analyzed when no other is requested.
    pub default_branch: String,
    /// Primary language as detected by the host.
    pub language: Option<String>,
    /// Star count.
    #[serde(default)]
    pub stars: u64,
    /// Fork count.
    #[serde(default)]
    pub forks: u64,
    /// Open issue count.
    #[serde(default)]
    pub open_issues: u64,
    /// Topic tags.
    #[serde(default)]
    pub topics: Vec<String>,
    /// SPDX license identifier, if detected.
    pub license: Option<String>,
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file.
    Blob,
    /// A directory.
    Tree,
    /// A submodule pointer.
    Commit,
    /// Anything the host adds later.
    #[serde(other)]
    Other,
}

/// One entry of a recursive tree listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes. Directories report none.
    #[serde(default)]
    pub size: u64,
}

impl CandidateFile {
    /// Creates a regular-file entry.
    pub fn blob(path: impl Into<String>, size: u64) -> Self {
        Self { path: path.into(), kind: EntryKind::Blob, size }
    }
}

/// Read-only access to a hosted repository.
pub trait RepoHost: Send + Sync {
    /// Fetches repository metadata.
    fn repository(&self, repo: &RepoId) -> HostFuture<'_, RepositoryInfo>;

    /// Fetches the decoded README. `NotFound` when the repository has none.
    fn readme(&self, repo: &RepoId) -> HostFuture<'_, String>;

    /// Fetches language name to byte count.
    fn languages(&self, repo: &RepoId) -> HostFuture<'_, BTreeMap<String, u64>>;

    /// Lists every entry of `branch`, recursively, in host order.
    fn tree(&self, repo: &RepoId, branch: &str) -> HostFuture<'_, Vec<CandidateFile>>;

    /// Fetches one file's content decoded to UTF-8.
    fn file_content(&self, repo: &RepoId, path: &str, branch: &str) -> HostFuture<'_, String>;
}
