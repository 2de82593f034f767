//! `reposcope clear` command.

use crate::report::ReportStore;

/// Execute the `clear` command.
///
/// # Errors
///
/// Returns an error string if the cache slot cannot be removed.
pub fn run(store: &dyn ReportStore) -> Result<(), String> {
    store.clear().map_err(|e| e.to_string())?;
    println!("Cache cleared.");
    Ok(())
}
