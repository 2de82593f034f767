//! Runs the analysis steps in order and assembles the report.

use std::collections::BTreeMap;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use super::prompts;
use super::schema::{ArchitectureAnalysis, PitfallReport, ProjectSummary, SetupGuide};
use super::stage::settle;
use super::state::{PipelineState, Step};
use super::structured::{request_structured, request_text};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::error::ReportError;
use crate::ports::{CompletionRequest, HostError, RepositoryInfo};
use crate::repo::{probe_manifests, FileExcerpt, FileSelector, RepoId, ScoredFile};
use crate::report::{AnalysisResult, CachedReport, ReportStore};
use crate::symbols::{aggregate_symbols, FileSymbols, LlmSymbolExtractor};

type Observer<'a> = Box<dyn FnMut(&PipelineState) + 'a>;

/// A selected file with its full text, kept for symbol extraction.
#[derive(Debug, Clone)]
struct ScannedFile {
    excerpt: FileExcerpt,
    content: String,
}

/// One analysis run over one repository.
pub struct Pipeline<'a> {
    ctx: &'a ServiceContext,
    settings: &'a Settings,
    state: PipelineState,
    observer: Option<Observer<'a>>,
}

impl<'a> Pipeline<'a> {
    /// Creates an idle pipeline.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, settings: &'a Settings) -> Self {
        Self { ctx, settings, state: PipelineState::Idle, observer: None }
    }

    /// Calls `observer` after every state transition.
    #[must_use]
    pub fn with_observer(mut self, observer: impl FnMut(&PipelineState) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Runs every step against `repo`.
    ///
    /// # Errors
    ///
    /// Returns the error of the first required step that fails, or
    /// [`ReportError::Transition`] if this pipeline has already run.
    pub async fn run(&mut self, repo: &RepoId) -> Result<CachedReport, ReportError> {
        if self.state != PipelineState::Idle {
            return Err(ReportError::Transition(format!("pipeline already {}", self.state)));
        }
        info!(repo = %repo, "starting analysis");
        match self.execute(repo).await {
            Ok(report) => {
                info!(repo = %repo, run_id = %report.run_id, "analysis complete");
                Ok(report)
            }
            Err(err) => {
                if let Ok(failed) = self.state.fail(err.to_string()) {
                    self.transition(failed);
                }
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: PipelineState) {
        self.state = next;
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state);
        }
    }

    /// Advances the state machine and returns the step now running.
    fn begin(&mut self) -> Result<Step, ReportError> {
        let next = self.state.advance()?;
        self.transition(next);
        match self.state {
            PipelineState::Running(step) => {
                debug!(step = %step, "step started");
                Ok(step)
            }
            ref other => {
                Err(ReportError::Transition(format!("expected a running step, found {other}")))
            }
        }
    }

    async fn execute(&mut self, repo: &RepoId) -> Result<CachedReport, ReportError> {
        let ctx = self.ctx;
        let settings = self.settings;
        let model = &settings.model;

        let step = self.begin()?;
        let (repo_info, readme, languages) = settle(step, fetch_repository(ctx, repo).await)?;
        let branch = repo_info.default_branch.clone();

        let step = self.begin()?;
        let summary: ProjectSummary = settle(
            step,
            request_structured(
                ctx,
                model,
                step,
                "project_summary",
                prompts::summary(&repo_info, &readme, &languages),
            )
            .await,
        )?;

        let step = self.begin()?;
        let scanned = settle(step, scan_files(ctx, settings, repo, &branch).await)?;
        let excerpts: Vec<FileExcerpt> = scanned.iter().map(|f| f.excerpt.clone()).collect();

        let step = self.begin()?;
        let architecture: ArchitectureAnalysis = settle(
            step,
            request_structured(
                ctx,
                model,
                step,
                "architecture_analysis",
                prompts::architecture(&repo_info, &summary, &excerpts, &languages),
            )
            .await,
        )?;

        self.begin()?;
        let manifests = probe_manifests(ctx, repo, &branch, settings.manifest_excerpt_chars).await;
        debug!(found = manifests.len(), "dependency manifests probed");

        let step = self.begin()?;
        let setup: SetupGuide = settle(
            step,
            request_structured(
                ctx,
                model,
                step,
                "setup_guide",
                prompts::setup(&repo_info, &summary, &manifests),
            )
            .await,
        )?;

        let step = self.begin()?;
        let pitfalls = settle(
            step,
            request_structured::<PitfallReport>(
                ctx,
                model,
                step,
                "pitfall_report",
                prompts::pitfalls(&repo_info, &summary, &architecture, &excerpts, &manifests),
            )
            .await,
        )?
        .pitfalls;

        self.begin()?;
        let extractor = LlmSymbolExtractor::new(ctx, model.clone());
        let mut static_analysis = Vec::new();
        for file in scanned.iter().take(settings.symbol_files) {
            let symbols =
                aggregate_symbols(&extractor, &file.excerpt.path, &file.content, &settings.windows)
                    .await;
            static_analysis.push(FileSymbols { file: file.excerpt.path.clone(), symbols });
        }

        let step = self.begin()?;
        let wiki_markdown = settle(
            step,
            request_text(
                ctx,
                model,
                step,
                prompts::wiki(
                    &repo_info,
                    &summary,
                    &architecture,
                    &setup,
                    &pitfalls,
                    &static_analysis,
                ),
            )
            .await,
        )?;

        let report = CachedReport {
            run_id: ctx.id_gen.generate_id(),
            timestamp: ctx.clock.now(),
            repo_info,
            readme,
            languages,
            analysis: AnalysisResult { summary, architecture },
            deep_scan: excerpts,
            setup,
            pitfalls,
            static_analysis,
            wiki_markdown,
            dependency_files: manifests,
        };

        let done = self.state.advance()?;
        self.transition(done);
        Ok(report)
    }
}

async fn fetch_repository(
    ctx: &ServiceContext,
    repo: &RepoId,
) -> Result<(RepositoryInfo, String, BTreeMap<String, u64>), ReportError> {
    let readme = async {
        match ctx.github.readme(repo).await {
            Err(HostError::NotFound(_)) => {
                debug!(repo = %repo, "repository has no README");
                Ok(String::new())
            }
            other => other,
        }
    };
    tokio::try_join!(ctx.github.repository(repo), readme, ctx.github.languages(repo))
        .map_err(|e| ReportError::upstream(Step::FetchingRepository, e))
}

async fn scan_files(
    ctx: &ServiceContext,
    settings: &Settings,
    repo: &RepoId,
    branch: &str,
) -> Result<Vec<ScannedFile>, ReportError> {
    let selected = select_files(ctx, settings, repo, branch).await?;
    let contents = try_join_all(
        selected.iter().map(|s| ctx.github.file_content(repo, &s.file.path, branch)),
    )
    .await
    .map_err(|e| ReportError::upstream(Step::ScanningFiles, e))?;

    Ok(selected
        .into_iter()
        .zip(contents)
        .map(|(scored, content)| ScannedFile {
            excerpt: FileExcerpt::from_content(
                scored.file.path,
                &content,
                scored.file.size,
                settings.scan_excerpt_chars,
            ),
            content,
        })
        .collect())
}

async fn select_files(
    ctx: &ServiceContext,
    settings: &Settings,
    repo: &RepoId,
    branch: &str,
) -> Result<Vec<ScoredFile>, ReportError> {
    let tree = ctx
        .github
        .tree(repo, branch)
        .await
        .map_err(|e| ReportError::upstream(Step::ScanningFiles, e))?;
    let selected = FileSelector::new(settings.selector.clone()).select(&tree);
    info!(entries = tree.len(), selected = selected.len(), "files selected");
    Ok(selected)
}

/// Ranks the files of `repo`'s default branch without any model calls.
///
/// # Errors
///
/// Returns [`ReportError::Upstream`] if the metadata or tree fetch fails.
pub async fn rank_files(
    ctx: &ServiceContext,
    settings: &Settings,
    repo: &RepoId,
) -> Result<Vec<ScoredFile>, ReportError> {
    let info = ctx
        .github
        .repository(repo)
        .await
        .map_err(|e| ReportError::upstream(Step::FetchingRepository, e))?;
    select_files(ctx, settings, repo, &info.default_branch).await
}

/// Options for [`analyze`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Ignore the cached report and always run the pipeline.
    pub fresh: bool,
}

/// Result of [`analyze`].
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The report.
    pub report: CachedReport,
    /// `true` when the report came from the cache slot.
    pub from_cache: bool,
}

/// Validates `input`, then serves the cached report or runs the pipeline.
///
/// The slot is read at most once and written at most once. A failed write
/// is logged; the fresh report is still returned.
///
/// # Errors
///
/// Returns [`ReportError::InvalidRepository`] before touching any port if
/// `input` is not a repository identifier, otherwise any pipeline error.
pub async fn analyze<'a>(
    ctx: &'a ServiceContext,
    settings: &'a Settings,
    store: &dyn ReportStore,
    input: &str,
    options: AnalyzeOptions,
    observer: impl FnMut(&PipelineState) + 'a,
) -> Result<Analysis, ReportError> {
    let repo = RepoId::parse(input)?;
    let key = repo.cache_key();

    if options.fresh {
        debug!(repo = %repo, "skipping cache");
    } else if let Some(report) = store.get(&key) {
        info!(repo = %repo, run_id = %report.run_id, "serving cached report");
        return Ok(Analysis { report, from_cache: true });
    }

    let mut pipeline = Pipeline::new(ctx, settings).with_observer(observer);
    let report = pipeline.run(&repo).await?;

    if let Err(err) = store.put(&key, &report) {
        warn!(repo = %repo, error = %err, "failed to cache report");
    }
    Ok(Analysis { report, from_cache: false })
}

/// Asks the model what running `command` in the analyzed repository prints.
///
/// Without a command, the first run command from the setup guide is used.
///
/// # Errors
///
/// Returns [`ReportError::Simulation`] if there is no command to run, the
/// model call fails, or the model returns no text.
pub async fn simulate(
    ctx: &ServiceContext,
    settings: &Settings,
    report: &CachedReport,
    command: Option<&str>,
) -> Result<String, ReportError> {
    let command = command
        .map(str::to_string)
        .or_else(|| report.setup.run_commands.first().cloned())
        .ok_or_else(|| {
            ReportError::Simulation("no command given and the report lists no run command".into())
        })?;
    info!(repo = %report.repo_info.full_name, command = %command, "simulating command");

    let request = CompletionRequest {
        model: settings.model.model.clone(),
        prompt: prompts::simulation(
            &report.repo_info,
            &report.analysis.summary,
            &report.setup,
            &command,
        ),
        max_tokens: settings.model.max_tokens,
        schema: None,
    };
    let response = ctx
        .llm
        .complete(&request)
        .await
        .map_err(|e| ReportError::Simulation(format!("model request error: {e}")))?;
    let output = response.text.trim();
    if output.is_empty() {
        return Err(ReportError::Simulation("the model returned an empty response".into()));
    }
    Ok(output.to_string())
}
