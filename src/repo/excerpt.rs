//! Bounded file excerpts and dependency-manifest probing.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::ServiceContext;
use crate::ports::HostError;
use crate::repo::RepoId;

/// Manifest paths probed at the repository root, in report order.
pub const DEPENDENCY_MANIFESTS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "Pipfile",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "Gemfile",
    "composer.json",
];

/// A length-bounded slice of one file, as sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileExcerpt {
    /// Path relative to the repository root.
    pub path: String,
    /// At most the configured number of characters from the file start.
    pub excerpt: String,
    /// Size of the whole file in bytes.
    pub size: u64,
}

impl FileExcerpt {
    /// Builds an excerpt of at most `limit` characters.
    #[must_use]
    pub fn from_content(path: impl Into<String>, content: &str, size: u64, limit: usize) -> Self {
        Self { path: path.into(), excerpt: truncate_chars(content, limit).to_string(), size }
    }
}

/// Returns the prefix of `text` holding at most `limit` characters.
#[must_use]
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Fetches every known dependency manifest concurrently.
///
/// Missing manifests are simply absent from the result. Other failures are
/// logged and also skipped; nothing here stops the pipeline.
pub async fn probe_manifests(
    ctx: &ServiceContext,
    repo: &RepoId,
    branch: &str,
    limit: usize,
) -> Vec<FileExcerpt> {
    let fetches =
        DEPENDENCY_MANIFESTS.iter().map(|path| ctx.github.file_content(repo, path, branch));
    let results = join_all(fetches).await;

    DEPENDENCY_MANIFESTS
        .iter()
        .zip(results)
        .filter_map(|(path, result)| match result {
            Ok(content) => {
                let size = content.len() as u64;
                Some(FileExcerpt::from_content(*path, &content, size, limit))
            }
            Err(HostError::NotFound(_)) => {
                debug!(manifest = path, "manifest absent");
                None
            }
            Err(err) => {
                warn!(manifest = path, error = %err, "manifest probe failed; treating as absent");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::cassette::config::CassetteConfig;
    use crate::ports::{CandidateFile, HostFuture, RepoHost, RepositoryInfo};

    /// Serves manifests from the root; everything else is unsupported.
    struct ManifestHost;

    impl RepoHost for ManifestHost {
        fn repository(&self, _repo: &RepoId) -> HostFuture<'_, RepositoryInfo> {
            Box::pin(async { Err(HostError::Transport("unsupported".into())) })
        }

        fn readme(&self, _repo: &RepoId) -> HostFuture<'_, String> {
            Box::pin(async { Err(HostError::Transport("unsupported".into())) })
        }

        fn languages(&self, _repo: &RepoId) -> HostFuture<'_, BTreeMap<String, u64>> {
            Box::pin(async { Err(HostError::Transport("unsupported".into())) })
        }

        fn tree(&self, _repo: &RepoId, _branch: &str) -> HostFuture<'_, Vec<CandidateFile>> {
            Box::pin(async { Err(HostError::Transport("unsupported".into())) })
        }

        fn file_content(
            &self,
            _repo: &RepoId,
            path: &str,
            _branch: &str,
        ) -> HostFuture<'_, String> {
            let result = match path {
                "package.json" => Ok(r#"{"name": "widgets"}"#.to_string()),
                "Cargo.toml" => Ok("[package]\nname = \"widgets\"\n".to_string()),
                "pyproject.toml" => {
                    Err(HostError::Http { status: 500, message: "upstream".into() })
                }
                other => Err(HostError::NotFound(other.to_string())),
            };
            Box::pin(async move { result })
        }
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("短い文字列です", 3), "短い文");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn excerpt_keeps_full_size() {
        let content = "x".repeat(800);
        let excerpt = FileExcerpt::from_content("src/lib.rs", &content, 800, 500);
        assert_eq!(excerpt.excerpt.len(), 500);
        assert_eq!(excerpt.size, 800);
        assert_eq!(excerpt.path, "src/lib.rs");
    }

    #[tokio::test]
    async fn server_error_on_one_manifest_keeps_the_others_in_order() {
        let mut ctx = ServiceContext::replaying_from(&CassetteConfig::panic_on_unspecified())
            .expect("panic config should always succeed");
        ctx.github = Box::new(ManifestHost);
        let repo = RepoId { owner: "acme".into(), name: "widgets".into() };

        let manifests = probe_manifests(&ctx, &repo, "main", 500).await;

        let paths: Vec<&str> = manifests.iter().map(|m| m.path.as_str()).collect();
        assert_eq!(paths, vec!["package.json", "Cargo.toml"]);
        assert_eq!(manifests[1].excerpt, "[package]\nname = \"widgets\"\n");
        assert_eq!(manifests[1].size, 27);
    }
}
