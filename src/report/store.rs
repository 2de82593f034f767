//! Single-slot report cache with a freshness window.
//!
//! The slot holds at most one report, keyed by repository. Each `put`
//! replaces it wholesale; a `get` for another key simply misses.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::model::CachedReport;
use crate::context::ServiceContext;
use crate::error::ReportError;

/// File name of the slot inside the cache directory.
pub const SLOT_FILE: &str = "report.yaml";

/// Storage for the most recent report.
pub trait ReportStore {
    /// Returns the fresh report stored under `key`, if any.
    fn get(&self, key: &str) -> Option<CachedReport>;

    /// Replaces the slot with `report` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Cache`] if the slot cannot be written.
    fn put(&self, key: &str, report: &CachedReport) -> Result<(), ReportError>;

    /// Empties the slot.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Cache`] if the slot cannot be removed.
    fn clear(&self) -> Result<(), ReportError>;

    /// Freshness window.
    fn ttl(&self) -> Duration;

    /// `true` once `report` is older than `ttl` at `now`.
    fn is_expired(&self, report: &CachedReport, now: DateTime<Utc>) -> bool {
        is_expired(report, now, self.ttl())
    }
}

/// `true` once `report` is older than `ttl` at `now`.
#[must_use]
pub fn is_expired(report: &CachedReport, now: DateTime<Utc>, ttl: Duration) -> bool {
    now.signed_duration_since(report.timestamp) > ttl
}

#[derive(Serialize)]
struct SlotRef<'r> {
    key: &'r str,
    report: &'r CachedReport,
}

#[derive(Deserialize)]
struct Slot {
    key: String,
    report: CachedReport,
}

/// Report slot stored as one YAML file through the `FileSystem` port.
pub struct FileReportStore<'a> {
    ctx: &'a ServiceContext,
    path: PathBuf,
    ttl: Duration,
}

impl<'a> FileReportStore<'a> {
    /// Creates a store whose slot lives in `<dir>/report.yaml`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, dir: &Path, ttl: Duration) -> Self {
        Self { ctx, path: dir.join(SLOT_FILE), ttl }
    }

    fn discard(&self, reason: &str) {
        if let Err(e) = self.ctx.fs.remove(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to discard cached report");
        } else {
            info!(path = %self.path.display(), reason, "discarded cached report");
        }
    }
}

impl ReportStore for FileReportStore<'_> {
    fn get(&self, key: &str) -> Option<CachedReport> {
        if !self.ctx.fs.exists(&self.path) {
            return None;
        }
        let raw = match self.ctx.fs.read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read cached report");
                return None;
            }
        };
        let slot: Slot = match serde_yaml::from_str(&raw) {
            Ok(slot) => slot,
            Err(e) => {
                warn!(error = %e, "cached report is corrupt");
                self.discard("corrupt");
                return None;
            }
        };
        if slot.key != key {
            debug!(cached = %slot.key, requested = key, "cache slot holds another repository");
            return None;
        }
        if self.is_expired(&slot.report, self.ctx.clock.now()) {
            self.discard("expired");
            return None;
        }
        Some(slot.report)
    }

    fn put(&self, key: &str, report: &CachedReport) -> Result<(), ReportError> {
        let yaml = serde_yaml::to_string(&SlotRef { key, report })
            .map_err(|e| ReportError::Cache(format!("failed to serialize report: {e}")))?;
        self.ctx.fs.write(&self.path, &yaml).map_err(|e| {
            ReportError::Cache(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    fn clear(&self) -> Result<(), ReportError> {
        self.ctx.fs.remove(&self.path).map_err(|e| {
            ReportError::Cache(format!("failed to remove {}: {e}", self.path.display()))
        })
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;
    use crate::cassette::config::CassetteConfig;
    use crate::ports::{Clock, FileSystem, RepositoryInfo};
    use crate::report::model::AnalysisResult;

    /// In-memory filesystem for testing the store without touching disk.
    #[derive(Default)]
    struct MemFs {
        files: Mutex<HashMap<PathBuf, String>>,
    }

    impl FileSystem for MemFs {
        fn read_to_string(
            &self,
            path: &Path,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            let files = self.files.lock().unwrap();
            files
                .get(path)
                .cloned()
                .ok_or_else(|| format!("File not found: {}", path.display()).into())
        }

        fn write(
            &self,
            path: &Path,
            contents: &str,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn remove(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.files.lock().unwrap().remove(path);
            Ok(())
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, hour, minute, 0).unwrap()
    }

    fn make_test_context(now: DateTime<Utc>) -> ServiceContext {
        // Start from panicking defaults, then replace fs and clock.
        let mut ctx = ServiceContext::replaying_from(&CassetteConfig::panic_on_unspecified())
            .expect("panic config should always succeed");
        ctx.fs = Box::new(MemFs::default());
        ctx.clock = Box::new(FixedClock(now));
        ctx
    }

    fn sample_report(timestamp: DateTime<Utc>) -> CachedReport {
        CachedReport {
            run_id: "run-1".into(),
            timestamp,
            repo_info: RepositoryInfo {
                full_name: "acme/widgets".into(),
                ..RepositoryInfo::default()
            },
            readme: "# Widgets".into(),
            languages: [("Rust".to_string(), 1200_u64)].into_iter().collect(),
            analysis: AnalysisResult::default(),
            deep_scan: vec![],
            setup: Default::default(),
            pitfalls: vec![],
            static_analysis: vec![],
            wiki_markdown: "# Docs".into(),
            dependency_files: vec![],
        }
    }

    #[test]
    fn put_then_get_returns_fresh_report() {
        let ctx = make_test_context(at(10, 30));
        let store = FileReportStore::new(&ctx, Path::new("/cache"), Duration::hours(1));

        let report = sample_report(at(10, 0));
        store.put("acme/widgets", &report).unwrap();

        assert_eq!(store.get("acme/widgets"), Some(report));
        assert!(ctx.fs.exists(Path::new("/cache/report.yaml")));
    }

    #[test]
    fn expired_report_is_absent_and_discarded() {
        let ctx = make_test_context(at(11, 1));
        let store = FileReportStore::new(&ctx, Path::new("/cache"), Duration::hours(1));

        store.put("acme/widgets", &sample_report(at(10, 0))).unwrap();

        assert_eq!(store.get("acme/widgets"), None);
        assert!(!ctx.fs.exists(Path::new("/cache/report.yaml")));
    }

    #[test]
    fn expiry_boundary() {
        let report = sample_report(at(10, 0));
        assert!(!is_expired(&report, at(10, 59), Duration::hours(1)));
        assert!(!is_expired(&report, at(11, 0), Duration::hours(1)));
        assert!(is_expired(&report, at(11, 1), Duration::hours(1)));
    }

    #[test]
    fn other_key_misses_without_discarding() {
        let ctx = make_test_context(at(10, 5));
        let store = FileReportStore::new(&ctx, Path::new("/cache"), Duration::hours(1));
        store.put("acme/widgets", &sample_report(at(10, 0))).unwrap();

        assert_eq!(store.get("acme/gadgets"), None);
        assert!(store.get("acme/widgets").is_some());
    }

    #[test]
    fn put_overwrites_the_slot() {
        let ctx = make_test_context(at(10, 5));
        let store = FileReportStore::new(&ctx, Path::new("/cache"), Duration::hours(1));
        store.put("acme/widgets", &sample_report(at(10, 0))).unwrap();

        let mut newer = sample_report(at(10, 4));
        newer.run_id = "run-2".into();
        store.put("acme/gadgets", &newer).unwrap();

        assert_eq!(store.get("acme/widgets"), None);
        assert_eq!(store.get("acme/gadgets").map(|r| r.run_id), Some("run-2".to_string()));
    }

    #[test]
    fn corrupt_slot_is_discarded() {
        let ctx = make_test_context(at(10, 0));
        ctx.fs.write(Path::new("/cache/report.yaml"), "key: [unterminated").unwrap();
        let store = FileReportStore::new(&ctx, Path::new("/cache"), Duration::hours(1));

        assert_eq!(store.get("acme/widgets"), None);
        assert!(!ctx.fs.exists(Path::new("/cache/report.yaml")));
    }

    #[test]
    fn clear_empties_the_slot() {
        let ctx = make_test_context(at(10, 5));
        let store = FileReportStore::new(&ctx, Path::new("/cache"), Duration::hours(1));
        store.put("acme/widgets", &sample_report(at(10, 0))).unwrap();
        store.clear().unwrap();
        assert_eq!(store.get("acme/widgets"), None);
    }
}
