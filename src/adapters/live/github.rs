//! Live adapter for the `RepoHost` port using the GitHub REST API.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ports::github::{CandidateFile, HostError, HostFuture, RepoHost, RepositoryInfo};
use crate::repo::RepoId;

const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT_VALUE: &str = concat!("reposcope/", env!("CARGO_PKG_VERSION"));

/// Live repository host backed by `api.github.com` (or a compatible base URL).
pub struct LiveRepoHost {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl LiveRepoHost {
    /// Creates a host client. `token` is sent as a bearer token when set.
    #[must_use]
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self { client: Client::new(), api_url: api_url.into(), token }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, HostError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| HostError::Transport(format!("invalid API URL {}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| {
                HostError::Transport(format!("API URL {} cannot be a base", self.api_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_endpoint(&self, repo: &RepoId, rest: &[&str]) -> Result<Url, HostError> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, HostError> {
        debug!(url = %url, "GET");
        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HostError::Transport(format!("{what}: {e}")))?;
        let status = response.status().as_u16();
        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| HostError::Transport(format!("{what}: {e}")))?;

        if !(200..300).contains(&status) {
            return Err(classify_failure(status, remaining.as_deref(), &body, what));
        }
        serde_json::from_str(&body).map_err(|e| HostError::Decode(format!("{what}: {e}")))
    }
}

#[derive(Deserialize)]
struct RepositoryResponse {
    full_name: String,
    description: Option<String>,
    html_url: String,
    default_branch: String,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    topics: Vec<String>,
    license: Option<LicenseResponse>,
}

#[derive(Deserialize)]
struct LicenseResponse {
    spdx_id: Option<String>,
}

impl From<RepositoryResponse> for RepositoryInfo {
    fn from(r: RepositoryResponse) -> Self {
        Self {
            full_name: r.full_name,
            description: r.description.filter(|d| !d.is_empty()),
            html_url: r.html_url,
            default_branch: r.default_branch,
            language: r.language,
            stars: r.stargazers_count,
            forks: r.forks_count,
            open_issues: r.open_issues_count,
            topics: r.topics,
            license: r.license.and_then(|l| l.spdx_id).filter(|id| id != "NOASSERTION"),
        }
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<CandidateFile>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// Maps a non-success response to a `HostError`.
fn classify_failure(
    status: u16,
    rate_remaining: Option<&str>,
    body: &str,
    what: &str,
) -> HostError {
    let message = serde_json::from_str::<GitHubErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    match status {
        404 => HostError::NotFound(what.to_string()),
        429 => HostError::RateLimited(message),
        403 if rate_remaining == Some("0") => HostError::RateLimited(message),
        _ => HostError::Http { status, message },
    }
}

/// Decodes a contents-API payload. Files too large for inline content come
/// back with encoding `none` and are returned empty.
fn decode_content(response: &ContentResponse, what: &str) -> Result<String, HostError> {
    match response.encoding.as_str() {
        "base64" => {
            let compact: String =
                response.content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = STANDARD
                .decode(compact)
                .map_err(|e| HostError::Decode(format!("{what}: {e}")))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        "" | "none" => {
            warn!(file = what, "content not inlined by the host; treating as empty");
            Ok(String::new())
        }
        other => Err(HostError::Decode(format!("{what}: unsupported encoding {other:?}"))),
    }
}

impl RepoHost for LiveRepoHost {
    fn repository(&self, repo: &RepoId) -> HostFuture<'_, RepositoryInfo> {
        let repo = repo.clone();
        Box::pin(async move {
            let url = self.repo_endpoint(&repo, &[])?;
            let response: RepositoryResponse =
                self.get_json(url, &format!("repository {repo}")).await?;
            Ok(response.into())
        })
    }

    fn readme(&self, repo: &RepoId) -> HostFuture<'_, String> {
        let repo = repo.clone();
        Box::pin(async move {
            let what = format!("README of {repo}");
            let url = self.repo_endpoint(&repo, &["readme"])?;
            let response: ContentResponse = self.get_json(url, &what).await?;
            decode_content(&response, &what)
        })
    }

    fn languages(&self, repo: &RepoId) -> HostFuture<'_, BTreeMap<String, u64>> {
        let repo = repo.clone();
        Box::pin(async move {
            let url = self.repo_endpoint(&repo, &["languages"])?;
            self.get_json(url, &format!("languages of {repo}")).await
        })
    }

    fn tree(&self, repo: &RepoId, branch: &str) -> HostFuture<'_, Vec<CandidateFile>> {
        let repo = repo.clone();
        let branch = branch.to_string();
        Box::pin(async move {
            let mut url = self.repo_endpoint(&repo, &["git", "trees", branch.as_str()])?;
            url.query_pairs_mut().append_pair("recursive", "1");
            let response: TreeResponse =
                self.get_json(url, &format!("tree {branch} of {repo}")).await?;
            if response.truncated {
                warn!(
                    repo = %repo,
                    entries = response.tree.len(),
                    "tree listing truncated by host"
                );
            }
            Ok(response.tree)
        })
    }

    fn file_content(&self, repo: &RepoId, path: &str, branch: &str) -> HostFuture<'_, String> {
        let repo = repo.clone();
        let path = path.to_string();
        let branch = branch.to_string();
        Box::pin(async move {
            let mut rest = vec!["contents"];
            rest.extend(path.split('/').filter(|s| !s.is_empty()));
            let mut url = self.repo_endpoint(&repo, &rest)?;
            url.query_pairs_mut().append_pair("ref", &branch);
            let what = format!("{path} in {repo}");
            let response: ContentResponse = self.get_json(url, &what).await?;
            decode_content(&response, &what)
        })
    }
}
