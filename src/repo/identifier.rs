//! Repository identifier parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// An `owner/name` pair identifying one hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// Account or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoId {
    /// Parses `owner/name`, `owner/name.git`, or a GitHub URL.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidRepository`] when the input does not
    /// name exactly one repository.
    pub fn parse(input: &str) -> Result<Self, ReportError> {
        let invalid = || ReportError::InvalidRepository { input: input.to_string() };

        let trimmed = input.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        let has_scheme = without_scheme.len() != trimmed.len();

        let (path, is_url) = match without_scheme
            .strip_prefix("www.github.com/")
            .or_else(|| without_scheme.strip_prefix("github.com/"))
        {
            Some(rest) => (rest, true),
            None if has_scheme => return Err(invalid()),
            None => (without_scheme, false),
        };

        let mut segments = path.trim_end_matches('/').split('/');
        let owner = segments.next().ok_or_else(invalid)?;
        let name = segments.next().ok_or_else(invalid)?;
        let name = name.strip_suffix(".git").unwrap_or(name);

        // Extra segments are only allowed on URLs (`/tree/main/...`).
        if !is_url && segments.next().is_some() {
            return Err(invalid());
        }
        if !is_valid_segment(owner) || !is_valid_segment(name) || owner.starts_with('-') {
            return Err(invalid());
        }

        Ok(Self { owner: owner.to_string(), name: name.to_string() })
    }

    /// Key for the cached-report slot. Host names are case-insensitive.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}/{}", self.owner, self.name).to_lowercase()
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
