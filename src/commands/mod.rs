//! Command dispatch and handlers.

pub mod analyze;
pub mod clear;
pub mod files;
pub mod show;
pub mod simulate;

use std::env;
use std::path::PathBuf;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::report::FileReportStore;

/// Dispatch a parsed command to its handler.
///
/// When `REPOSCOPE_RECORD` is set to a directory path, all port
/// interactions are recorded to per-port cassette files in that directory.
///
/// # Errors
///
/// Returns an error string if settings are invalid or the selected command
/// handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let settings = Settings::from_env().map_err(|e| e.to_string())?;

    let (ctx, session) = if let Ok(path) = env::var("REPOSCOPE_RECORD") {
        let (ctx, session) = ServiceContext::recording_at(&settings, PathBuf::from(path))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&settings), None)
    };

    let result = dispatch_with_context(command, &ctx, &settings);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the handler fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    settings: &Settings,
) -> Result<(), String> {
    let store = FileReportStore::new(ctx, &settings.cache_dir, settings.cache_ttl);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    match command {
        Command::Analyze { repo, fresh, json } => {
            runtime.block_on(analyze::run(ctx, settings, &store, repo, *fresh, *json))
        }
        Command::Show { repo, json } => show::run(&store, repo, *json),
        Command::Files { repo } => runtime.block_on(files::run(ctx, settings, repo)),
        Command::Simulate { repo, command } => {
            runtime.block_on(simulate::run(ctx, settings, &store, repo, command.as_deref()))
        }
        Command::Clear => clear::run(&store),
    }
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
