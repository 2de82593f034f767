//! `reposcope simulate` command.

use crate::config::Settings;
use crate::context::ServiceContext;
use crate::pipeline;
use crate::report::ReportStore;
use crate::repo::RepoId;

/// Execute the `simulate` command against the cached report for `repo`.
///
/// # Errors
///
/// Returns an error string if there is no fresh report or the simulation fails.
pub async fn run(
    ctx: &ServiceContext,
    settings: &Settings,
    store: &dyn ReportStore,
    repo: &str,
    command: Option<&str>,
) -> Result<(), String> {
    let id = RepoId::parse(repo).map_err(|e| e.to_string())?;
    let report = store.get(&id.cache_key()).ok_or_else(|| {
        format!("no fresh cached report for {id}; run `reposcope analyze {id}` first")
    })?;
    let output =
        pipeline::simulate(ctx, settings, &report, command).await.map_err(|e| e.to_string())?;
    println!("{output}");
    Ok(())
}
