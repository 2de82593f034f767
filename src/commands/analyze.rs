//! `reposcope analyze` command.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::pipeline::{self, AnalyzeOptions, PipelineState};
use crate::report::{render_markdown, CachedReport, ReportStore};

/// Execute the `analyze` command.
///
/// Progress goes to stderr as `[n/9] Step`; the report goes to stdout.
///
/// # Errors
///
/// Returns an error string if the input is invalid or a required step fails.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    store: &dyn ReportStore,
    repo: &str,
    fresh: bool,
    json: bool,
) -> Result<(), String> {
    let analysis = pipeline::analyze(
        ctx,
        settings,
        store,
        repo,
        AnalyzeOptions { fresh },
        |state| {
            if let Some(line) = progress_line(state) {
                eprintln!("{line}");
            }
        },
    )
    .await
    .map_err(|e| e.to_string())?;

    if analysis.from_cache {
        let stamp = analysis.report.timestamp.format("%Y-%m-%d %H:%M UTC");
        eprintln!("(cached) report from {stamp}");
    }
    println!("{}", format_report(&analysis.report, json)?);
    Ok(())
}

/// Progress text for a state, or `None` for states not worth a line.
pub(crate) fn progress_line(state: &PipelineState) -> Option<String> {
    match state {
        PipelineState::Running(step) => {
            let (done, total) = state.progress();
            Some(format!("[{}/{total}] {step}", done + 1))
        }
        _ => None,
    }
}

/// Markdown or pretty JSON.
pub(crate) fn format_report(report: &CachedReport, json: bool) -> Result<String, String> {
    if json {
        serde_json::to_string_pretty(report).map_err(|e| format!("failed to serialize report: {e}"))
    } else {
        Ok(render_markdown(report))
    }
}
