//! Runtime settings loaded from the environment.
//!
//! A `.env` file in the working directory is read first (via `dotenvy`);
//! real environment variables win over it.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;

use crate::error::ReportError;
use crate::repo::SelectorConfig;
use crate::symbols::WindowConfig;

/// Default GitHub REST endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// Default cache freshness window in seconds.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// Model identifier and output budget shared by every model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate per call.
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self { model: DEFAULT_MODEL.to_string(), max_tokens: 4096 }
    }
}

/// All tunables for one process.
#[derive(Debug, Clone)]
pub struct Settings {
    /// GitHub REST base URL.
    pub github_api_url: String,
    /// Optional bearer token; raises the rate limit and unlocks private repos.
    pub github_token: Option<String>,
    /// Model settings.
    pub model: ModelSettings,
    /// Directory holding the cached-report slot.
    pub cache_dir: PathBuf,
    /// How long a cached report stays fresh.
    pub cache_ttl: Duration,
    /// File selection parameters.
    pub selector: SelectorConfig,
    /// Symbol windowing parameters.
    pub windows: WindowConfig,
    /// Number of top-ranked files sent through symbol aggregation.
    pub symbol_files: usize,
    /// Excerpt length for scanned source files.
    pub scan_excerpt_chars: usize,
    /// Excerpt length for dependency manifests.
    pub manifest_excerpt_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            github_token: None,
            model: ModelSettings::default(),
            cache_dir: PathBuf::from(".reposcope"),
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
            selector: SelectorConfig::default(),
            windows: WindowConfig::default(),
            symbol_files: 3,
            scan_excerpt_chars: 500,
            manifest_excerpt_chars: 3000,
        }
    }
}

impl Settings {
    /// Loads `.env` (if present) and reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ReportError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if a variable is set but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ReportError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let windows = WindowConfig::new(
            parse_or(&get, "REPOSCOPE_WINDOW_CHARS", defaults.windows.window_chars)?,
            parse_or(&get, "REPOSCOPE_WINDOW_STRIDE", defaults.windows.stride_chars)?,
            parse_or(&get, "REPOSCOPE_MAX_WINDOWS", defaults.windows.max_windows)?,
        )?;

        let max_files = parse_or(&get, "REPOSCOPE_MAX_FILES", defaults.selector.max_files)?;
        if max_files == 0 {
            return Err(ReportError::Config("REPOSCOPE_MAX_FILES must be positive".into()));
        }

        let ttl_secs: i64 = parse_or(&get, "REPOSCOPE_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        if ttl_secs < 0 {
            return Err(ReportError::Config("REPOSCOPE_CACHE_TTL_SECS must not be negative".into()));
        }
        let cache_ttl = Duration::try_seconds(ttl_secs).ok_or_else(|| {
            ReportError::Config(format!("REPOSCOPE_CACHE_TTL_SECS is out of range: {ttl_secs}"))
        })?;

        Ok(Self {
            github_api_url: get("GITHUB_API_URL")
                .map_or(defaults.github_api_url, |url| url.trim_end_matches('/').to_string()),
            github_token: get("GITHUB_TOKEN"),
            model: ModelSettings {
                model: get("REPOSCOPE_MODEL").unwrap_or(defaults.model.model),
                max_tokens: parse_or(&get, "REPOSCOPE_MAX_TOKENS", defaults.model.max_tokens)?,
            },
            cache_dir: get("REPOSCOPE_CACHE_DIR").map_or(defaults.cache_dir, PathBuf::from),
            cache_ttl,
            selector: SelectorConfig { max_files, ..defaults.selector },
            windows,
            symbol_files: parse_or(&get, "REPOSCOPE_SYMBOL_FILES", defaults.symbol_files)?,
            scan_excerpt_chars: defaults.scan_excerpt_chars,
            manifest_excerpt_chars: defaults.manifest_excerpt_chars,
        })
    }
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ReportError> {
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ReportError::Config(format!("{key} has an invalid value: {raw:?}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.github_api_url, DEFAULT_GITHUB_API_URL);
        assert!(settings.github_token.is_none());
        assert_eq!(settings.model.model, DEFAULT_MODEL);
        assert_eq!(settings.cache_ttl, Duration::hours(1));
        assert_eq!(settings.selector.max_files, 12);
        assert_eq!(settings.windows, WindowConfig::default());
        assert_eq!(settings.scan_excerpt_chars, 500);
        assert_eq!(settings.manifest_excerpt_chars, 3000);
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("GITHUB_TOKEN", "ghp_test"),
            ("GITHUB_API_URL", "http://localhost:9999/"),
            ("REPOSCOPE_MODEL", "claude-haiku"),
            ("REPOSCOPE_CACHE_DIR", "/tmp/rs-cache"),
            ("REPOSCOPE_CACHE_TTL_SECS", "60"),
            ("REPOSCOPE_MAX_FILES", "5"),
            ("REPOSCOPE_WINDOW_CHARS", "1000"),
            ("REPOSCOPE_WINDOW_STRIDE", "800"),
            ("REPOSCOPE_MAX_WINDOWS", "4"),
            ("REPOSCOPE_SYMBOL_FILES", "1"),
        ]))
        .unwrap();
        assert_eq!(settings.github_token.as_deref(), Some("ghp_test"));
        assert_eq!(settings.github_api_url, "http://localhost:9999");
        assert_eq!(settings.model.model, "claude-haiku");
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/rs-cache"));
        assert_eq!(settings.cache_ttl, Duration::seconds(60));
        assert_eq!(settings.selector.max_files, 5);
        assert_eq!(settings.windows, WindowConfig::new(1000, 800, 4).unwrap());
        assert_eq!(settings.symbol_files, 1);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings = Settings::from_lookup(lookup(&[("GITHUB_TOKEN", "  ")])).unwrap();
        assert!(settings.github_token.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        let err = Settings::from_lookup(lookup(&[("REPOSCOPE_MAX_FILES", "lots")])).unwrap_err();
        assert!(err.to_string().contains("REPOSCOPE_MAX_FILES"));

        let err =
            Settings::from_lookup(lookup(&[("REPOSCOPE_WINDOW_STRIDE", "9000")])).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));

        assert!(Settings::from_lookup(lookup(&[("REPOSCOPE_MAX_FILES", "0")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("REPOSCOPE_CACHE_TTL_SECS", "-5")])).is_err());
    }

    #[test]
    fn out_of_range_ttl_is_a_config_error() {
        let err = Settings::from_lookup(lookup(&[(
            "REPOSCOPE_CACHE_TTL_SECS",
            "9223372036854775807",
        )]))
        .unwrap_err();
        assert!(matches!(err, ReportError::Config(ref m) if m.contains("out of range")));
    }
}
