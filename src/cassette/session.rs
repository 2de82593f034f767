//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing to a separate cassette file.
/// All cassettes are stored in a timestamped directory.
pub struct RecordingSession {
    /// Recorder for LLM interactions.
    pub llm: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for GitHub interactions.
    pub github: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock interactions.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for ID generator interactions.
    pub id_gen: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Creates a session writing to `<root>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamped directory already exists or
    /// cannot be created.
    pub fn new(root: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            Arc::new(Mutex::new(CassetteRecorder::new(path, format!("{timestamp}-{port}"))))
        };

        Ok(Self {
            llm: make_recorder("llm"),
            github: make_recorder("github"),
            fs: make_recorder("fs"),
            clock: make_recorder("clock"),
            id_gen: make_recorder("id_gen"),
            output_dir,
        })
    }

    /// Directory the cassettes are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// The recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter still holds a recorder or any
    /// cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), String> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| format!("Recording adapter for {port} still has references"))?
                .into_inner()
                .map_err(|e| format!("Recorder lock for {port} poisoned: {e}"))?;
            recorder.finish().map_err(|e| format!("Failed to write {port} cassette: {e}"))?;
            Ok(())
        }

        finish_one(self.llm, "llm")?;
        finish_one(self.github, "github")?;
        finish_one(self.fs, "fs")?;
        finish_one(self.clock, "clock")?;
        finish_one(self.id_gen, "id_gen")?;

        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::config::{CassetteConfig, PORTS};

    #[test]
    fn session_writes_one_cassette_per_port() {
        let root = std::env::temp_dir().join("reposcope_session_test");
        let _ = std::fs::remove_dir_all(&root);

        let session = RecordingSession::new(&root).expect("session should start");
        let dir = session.output_dir().to_path_buf();
        assert!(dir.exists());
        session
            .clock
            .lock()
            .unwrap()
            .record(
                "clock",
                "now",
                serde_json::json!({}),
                serde_json::json!("2025-01-01T00:00:00Z"),
            );

        let written = session.finish().expect("finish should succeed");
        assert_eq!(written, dir);
        for port in PORTS {
            assert!(dir.join(format!("{port}.cassette.yaml")).exists(), "missing {port}");
        }

        let config = CassetteConfig::from_session_dir(&dir);
        assert!(config.clock.is_some() && config.llm.is_some());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn finish_fails_while_an_adapter_holds_a_recorder() {
        let root = std::env::temp_dir().join("reposcope_session_held_test");
        let _ = std::fs::remove_dir_all(&root);

        let session = RecordingSession::new(&root).unwrap();
        let held = Arc::clone(&session.llm);
        let err = session.finish().unwrap_err();
        assert!(err.contains("llm still has references"));
        drop(held);

        let _ = std::fs::remove_dir_all(&root);
    }
}
