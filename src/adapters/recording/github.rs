//! Recording adapter for the `RepoHost` port.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{CandidateFile, HostFuture, RepoHost, RepositoryInfo};
use crate::repo::RepoId;

/// Records GitHub responses, including typed errors, while delegating.
pub struct RecordingRepoHost {
    inner: Box<dyn RepoHost>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingRepoHost {
    /// Wraps `inner`, recording every response into `recorder`.
    pub fn new(inner: Box<dyn RepoHost>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// Input recorded for every host call; also the replay match key.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct HostInput {
    pub(crate) repo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) path: Option<String>,
}

impl HostInput {
    pub(crate) fn repo(repo: &RepoId) -> Self {
        Self { repo: repo.to_string(), branch: None, path: None }
    }

    pub(crate) fn branch(repo: &RepoId, branch: &str) -> Self {
        Self { branch: Some(branch.to_string()), ..Self::repo(repo) }
    }

    pub(crate) fn file(repo: &RepoId, path: &str, branch: &str) -> Self {
        Self { path: Some(path.to_string()), ..Self::branch(repo, branch) }
    }
}

impl RepoHost for RecordingRepoHost {
    fn repository(&self, repo: &RepoId) -> HostFuture<'_, RepositoryInfo> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.repository(&repo).await;
            let input = HostInput::repo(&repo);
            record_interaction(&self.recorder, "github", "repository", &input, &result);
            result
        })
    }

    fn readme(&self, repo: &RepoId) -> HostFuture<'_, String> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.readme(&repo).await;
            let input = HostInput::repo(&repo);
            record_interaction(&self.recorder, "github", "readme", &input, &result);
            result
        })
    }

    fn languages(&self, repo: &RepoId) -> HostFuture<'_, BTreeMap<String, u64>> {
        let repo = repo.clone();
        Box::pin(async move {
            let result = self.inner.languages(&repo).await;
            let input = HostInput::repo(&repo);
            record_interaction(&self.recorder, "github", "languages", &input, &result);
            result
        })
    }

    fn tree(&self, repo: &RepoId, branch: &str) -> HostFuture<'_, Vec<CandidateFile>> {
        let input = HostInput::branch(repo, branch);
        let repo = repo.clone();
        let branch = branch.to_string();
        Box::pin(async move {
            let result = self.inner.tree(&repo, &branch).await;
            record_interaction(&self.recorder, "github", "tree", &input, &result);
            result
        })
    }

    fn file_content(&self, repo: &RepoId, path: &str, branch: &str) -> HostFuture<'_, String> {
        let input = HostInput::file(repo, path, branch);
        let repo = repo.clone();
        let path = path.to_string();
        let branch = branch.to_string();
        Box::pin(async move {
            let result = self.inner.file_content(&repo, &path, &branch).await;
            record_interaction(&self.recorder, "github", "file_content", &input, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::adapters::replaying::ReplayingRepoHost;
    use crate::cassette::config::CassetteConfig;
    use crate::ports::HostError;

    /// Host that knows one README and nothing else.
    struct OneReadme;

    impl RepoHost for OneReadme {
        fn repository(&self, repo: &RepoId) -> HostFuture<'_, RepositoryInfo> {
            let name = repo.to_string();
            let info = RepositoryInfo { full_name: name, ..RepositoryInfo::default() };
            Box::pin(async move { Ok(info) })
        }
        fn readme(&self, repo: &RepoId) -> HostFuture<'_, String> {
            let missing = HostError::NotFound(format!("README of {repo}"));
            Box::pin(async move { Err(missing) })
        }
        fn languages(&self, _repo: &RepoId) -> HostFuture<'_, BTreeMap<String, u64>> {
            Box::pin(async { Ok(BTreeMap::new()) })
        }
        fn tree(&self, _repo: &RepoId, _branch: &str) -> HostFuture<'_, Vec<CandidateFile>> {
            Box::pin(async { Ok(vec![CandidateFile::blob("src/main.rs", 40)]) })
        }
        fn file_content(
            &self,
            _repo: &RepoId,
            path: &str,
            _branch: &str,
        ) -> HostFuture<'_, String> {
            let body = format!("// {path}");
            Box::pin(async move { Ok(body) })
        }
    }

    #[tokio::test]
    async fn typed_errors_survive_record_and_replay() {
        let dir = std::env::temp_dir().join("reposcope_rec_github_test");
        let path = dir.join("github.cassette.yaml");
        let repo = RepoId { owner: "acme".into(), name: "widgets".into() };

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test")));
        {
            let host = RecordingRepoHost::new(Box::new(OneReadme), Arc::clone(&recorder));
            assert!(host.readme(&repo).await.is_err());
            let manifest = host.file_content(&repo, "Cargo.toml", "main").await.unwrap();
            assert_eq!(manifest, "// Cargo.toml");
        }
        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        recorder.finish().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let cassette: crate::cassette::format::Cassette = serde_yaml::from_str(&raw).unwrap();
        assert_eq!(
            cassette.interactions[1].input,
            json!({"repo": "acme/widgets", "branch": "main", "path": "Cargo.toml"})
        );

        let replay = ReplayingRepoHost::new(CassetteConfig::load_cassette(&path).unwrap());
        assert_eq!(
            replay.readme(&repo).await,
            Err(HostError::NotFound("README of acme/widgets".into()))
        );
        let manifest = replay.file_content(&repo, "Cargo.toml", "main").await.unwrap();
        assert_eq!(manifest, "// Cargo.toml");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
