//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Port names, matching the `port` field of recorded interactions and the
/// per-port cassette file names.
pub const PORTS: [&str; 5] = ["llm", "github", "fs", "clock", "id_gen"];

/// Per-port cassette file paths. Ports without a cassette path will panic
/// if called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the LLM port cassette file.
    pub llm: Option<PathBuf>,
    /// Path to the GitHub port cassette file.
    pub github: Option<PathBuf>,
    /// Path to the filesystem port cassette file.
    pub fs: Option<PathBuf>,
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
    /// Path to the ID generator port cassette file.
    pub id_gen: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the LLM port.
    pub llm: Option<CassetteReplayer>,
    /// Replayer for the GitHub port.
    pub github: Option<CassetteReplayer>,
    /// Replayer for the filesystem port.
    pub fs: Option<CassetteReplayer>,
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the ID generator port.
    pub id_gen: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Returns a config where all port paths are `None`. Any port called
    /// during replay will panic because no cassette is loaded.
    #[must_use]
    pub fn panic_on_unspecified() -> Self {
        Self::default()
    }

    /// Points every port at `<dir>/<port>.cassette.yaml` when that file exists.
    ///
    /// This is the layout a recording session writes.
    #[must_use]
    pub fn from_session_dir(dir: &Path) -> Self {
        let existing = |port: &str| {
            let path = dir.join(format!("{port}.cassette.yaml"));
            path.exists().then_some(path)
        };
        Self {
            llm: existing("llm"),
            github: existing("github"),
            fs: existing("fs"),
            clock: existing("clock"),
            id_gen: existing("id_gen"),
        }
    }

    /// Load a single cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            llm: self.llm.as_deref().map(Self::load_cassette).transpose()?,
            github: self.github.as_deref().map(Self::load_cassette).transpose()?,
            fs: self.fs.as_deref().map(Self::load_cassette).transpose()?,
            clock: self.clock.as_deref().map(Self::load_cassette).transpose()?,
            id_gen: self.id_gen.as_deref().map(Self::load_cassette).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Interaction;
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            tool_version: "0.1.0".into(),
            interactions,
        };
        std::fs::write(path, serde_yaml::to_string(&cassette).unwrap()).unwrap();
    }

    #[test]
    fn panic_on_unspecified_returns_all_none() {
        let config = CassetteConfig::panic_on_unspecified();
        assert!(config.llm.is_none());
        assert!(config.github.is_none());
        assert!(config.fs.is_none());
        assert!(config.clock.is_none());
        assert!(config.id_gen.is_none());

        let replayers = config.load_all().unwrap();
        assert!(replayers.llm.is_none());
        assert!(replayers.github.is_none());
    }

    #[test]
    fn session_dir_picks_up_existing_port_files() {
        let dir = std::env::temp_dir().join("reposcope_config_test_session");
        std::fs::create_dir_all(&dir).unwrap();

        write_cassette(
            &dir.join("github.cassette.yaml"),
            vec![Interaction {
                seq: 0,
                port: "github".into(),
                method: "readme".into(),
                input: json!({"repo": "acme/widgets"}),
                output: json!({"Ok": "# Widgets"}),
            }],
        );

        let config = CassetteConfig::from_session_dir(&dir);
        assert!(config.github.is_some());
        assert!(config.llm.is_none());

        let mut replayers = config.load_all().unwrap();
        let github = replayers.github.as_mut().unwrap();
        let interaction = github.next_interaction("github", "readme");
        assert_eq!(interaction.output, json!({"Ok": "# Widgets"}));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unreadable_cassette_is_an_error() {
        let config = CassetteConfig {
            llm: Some(PathBuf::from("/nonexistent/llm.cassette.yaml")),
            ..CassetteConfig::default()
        };
        let err = config.load_all().err().unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }
}
