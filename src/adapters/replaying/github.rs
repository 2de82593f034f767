//! Replaying adapter for the `RepoHost` port.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;

use super::matching_output;
use crate::adapters::recording::github::HostInput;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CandidateFile, HostError, HostFuture, RepoHost, RepositoryInfo};
use crate::repo::RepoId;

/// Serves recorded GitHub responses, matched by repository, branch and path.
pub struct ReplayingRepoHost {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingRepoHost {
    /// Creates a replaying host from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn serve<T>(&self, method: &str, input: &HostInput) -> HostFuture<'static, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let output = matching_output(&self.replayer, "github", method, input);
        let result = serde_json::from_value::<Result<T, HostError>>(output).unwrap_or_else(|e| {
            Err(HostError::Decode(format!("github::{method}: malformed recording: {e}")))
        });
        Box::pin(async move { result })
    }
}

impl RepoHost for ReplayingRepoHost {
    fn repository(&self, repo: &RepoId) -> HostFuture<'_, RepositoryInfo> {
        self.serve("repository", &HostInput::repo(repo))
    }

    fn readme(&self, repo: &RepoId) -> HostFuture<'_, String> {
        self.serve("readme", &HostInput::repo(repo))
    }

    fn languages(&self, repo: &RepoId) -> HostFuture<'_, BTreeMap<String, u64>> {
        self.serve("languages", &HostInput::repo(repo))
    }

    fn tree(&self, repo: &RepoId, branch: &str) -> HostFuture<'_, Vec<CandidateFile>> {
        self.serve("tree", &HostInput::branch(repo, branch))
    }

    fn file_content(&self, repo: &RepoId, path: &str, branch: &str) -> HostFuture<'_, String> {
        self.serve("file_content", &HostInput::file(repo, path, branch))
    }
}
