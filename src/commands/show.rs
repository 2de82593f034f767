//! `reposcope show` command.

use super::analyze::format_report;
use crate::report::ReportStore;
use crate::repo::RepoId;

/// Execute the `show` command.
///
/// Prints the cached report when it is for `repo` and still fresh,
/// otherwise a hint to run `analyze`.
///
/// # Errors
///
/// Returns an error string if `repo` is not a repository identifier.
pub fn run(store: &dyn ReportStore, repo: &str, json: bool) -> Result<(), String> {
    let id = RepoId::parse(repo).map_err(|e| e.to_string())?;
    match store.get(&id.cache_key()) {
        Some(report) => println!("{}", format_report(&report, json)?),
        None => println!("No cached report for {id}. Run `reposcope analyze {id}` first."),
    }
    Ok(())
}
