//! Service context bundling all port trait objects.

use std::path::{Path, PathBuf};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::github::LiveRepoHost;
use crate::adapters::live::id_gen::LiveIdGenerator;
use crate::adapters::live::llm::LiveLlmClient;
use crate::adapters::recording::{
    RecordingClock, RecordingFileSystem, RecordingIdGenerator, RecordingLlmClient,
    RecordingRepoHost,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingFileSystem, ReplayingIdGenerator, ReplayingLlmClient,
    ReplayingRepoHost,
};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::Settings;
use crate::ports::{
    CandidateFile, Clock, CompletionFuture, CompletionRequest, FileSystem, HostFuture,
    IdGenerator, LlmClient, RepoHost, RepositoryInfo,
};
use crate::repo::RepoId;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, replaying, recording).
pub struct ServiceContext {
    /// Clock for report timestamps and cache expiry.
    pub clock: Box<dyn Clock>,
    /// Filesystem holding the cached-report slot.
    pub fs: Box<dyn FileSystem>,
    /// Run identifier source.
    pub id_gen: Box<dyn IdGenerator>,
    /// Language-model completions.
    pub llm: Box<dyn LlmClient>,
    /// Repository host (GitHub REST).
    pub github: Box<dyn RepoHost>,
}

impl ServiceContext {
    /// Creates a live context talking to the real GitHub and Anthropic APIs.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator::new()),
            llm: Box::new(LiveLlmClient::new()),
            github: Box::new(LiveRepoHost::new(
                settings.github_api_url.clone(),
                settings.github_token.clone(),
            )),
        }
    }

    /// Creates a live context whose every port is recorded into `session`.
    #[must_use]
    pub fn recording(settings: &Settings, session: &RecordingSession) -> Self {
        let live = Self::live(settings);
        Self {
            clock: Box::new(RecordingClock::new(live.clock, session.clock.clone())),
            fs: Box::new(RecordingFileSystem::new(live.fs, session.fs.clone())),
            id_gen: Box::new(RecordingIdGenerator::new(live.id_gen, session.id_gen.clone())),
            llm: Box::new(RecordingLlmClient::new(live.llm, session.llm.clone())),
            github: Box::new(RecordingRepoHost::new(live.github, session.github.clone())),
        }
    }

    /// Starts a recording session under `root` and returns the recording context.
    ///
    /// This is the developer-only mechanism behind `REPOSCOPE_RECORD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(
        settings: &Settings,
        root: PathBuf,
    ) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(&root)?;
        let ctx = Self::recording(settings, &session);
        Ok((ctx, session))
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Every port gets its own replayer over the same cassette, so
    /// per-port streams stay independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;

        Ok(Self {
            clock: Box::new(ReplayingClock::new(CassetteReplayer::new(&cassette))),
            fs: Box::new(ReplayingFileSystem::new(CassetteReplayer::new(&cassette))),
            id_gen: Box::new(ReplayingIdGenerator::new(CassetteReplayer::new(&cassette))),
            llm: Box::new(ReplayingLlmClient::new(CassetteReplayer::new(&cassette))),
            github: Box::new(ReplayingRepoHost::new(CassetteReplayer::new(&cassette))),
        })
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette use an adapter that panics with a
    /// clear message when called.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;

        Ok(Self {
            clock: match replayers.clock {
                Some(r) => Box::new(ReplayingClock::new(r)),
                None => Box::new(PanickingClock),
            },
            fs: match replayers.fs {
                Some(r) => Box::new(ReplayingFileSystem::new(r)),
                None => Box::new(PanickingFileSystem),
            },
            id_gen: match replayers.id_gen {
                Some(r) => Box::new(ReplayingIdGenerator::new(r)),
                None => Box::new(PanickingIdGenerator),
            },
            llm: match replayers.llm {
                Some(r) => Box::new(ReplayingLlmClient::new(r)),
                None => Box::new(PanickingLlmClient),
            },
            github: match replayers.github {
                Some(r) => Box::new(ReplayingRepoHost::new(r)),
                None => Box::new(PanickingRepoHost),
            },
        })
    }
}

// --- Panicking adapters for unspecified ports ---

fn unconfigured(port: &str) -> ! {
    panic!("{port} port not configured in CassetteConfig: no cassette loaded");
}

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        unconfigured("clock")
    }
}

struct PanickingFileSystem;
impl FileSystem for PanickingFileSystem {
    fn read_to_string(
        &self,
        _path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("fs")
    }
    fn write(
        &self,
        _path: &Path,
        _contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("fs")
    }
    fn exists(&self, _path: &Path) -> bool {
        unconfigured("fs")
    }
    fn remove(&self, _path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        unconfigured("fs")
    }
}

struct PanickingIdGenerator;
impl IdGenerator for PanickingIdGenerator {
    fn generate_id(&self) -> String {
        unconfigured("id_gen")
    }
}

struct PanickingLlmClient;
impl LlmClient for PanickingLlmClient {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        unconfigured("llm")
    }
}

struct PanickingRepoHost;
impl RepoHost for PanickingRepoHost {
    fn repository(&self, _repo: &RepoId) -> HostFuture<'_, RepositoryInfo> {
        unconfigured("github")
    }
    fn readme(&self, _repo: &RepoId) -> HostFuture<'_, String> {
        unconfigured("github")
    }
    fn languages(&self, _repo: &RepoId) -> HostFuture<'_, std::collections::BTreeMap<String, u64>> {
        unconfigured("github")
    }
    fn tree(&self, _repo: &RepoId, _branch: &str) -> HostFuture<'_, Vec<CandidateFile>> {
        unconfigured("github")
    }
    fn file_content(&self, _repo: &RepoId, _path: &str, _branch: &str) -> HostFuture<'_, String> {
        unconfigured("github")
    }
}
