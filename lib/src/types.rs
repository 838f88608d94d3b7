//! Core types for commit-history changelogs.
//!
//! This module defines the data structures shared by the fetch and
//! aggregation stages: the project reference derived from a repository URL,
//! normalized commit records, day buckets, the release selector, and the
//! error taxonomy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for changelog operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    /// Repository URL did not resolve to an owner/name pair
    #[error("Unrecognized repository URL: {0}")]
    InvalidRepository(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// GitHub answered with something other than a commit list
    #[error("GitHub API error for {repo}: {message}")]
    RemoteApi { repo: String, message: String },

    /// Release selector is neither a recognized keyword nor an integer
    #[error(
        "Unsupported release selector {0:?}: GitHub's API does not support named release versions (see https://github.com/github/developer.github.com/issues/17)"
    )]
    UnsupportedSelector(String),

    /// A commit element from the API lacks required fields
    #[error("Malformed commit record: {0}")]
    MalformedCommit(String),
}

/// The owner/name pair identifying a hosted repository.
///
/// Derived once from a caller-supplied repository URL and never mutated.
/// `canonical_url` is always the `https://github.com/owner/name` form,
/// regardless of which URL shape the caller passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReference {
    pub owner: String,
    pub name: String,
    pub canonical_url: String,
}

impl ProjectReference {
    /// Creates a reference from a non-empty owner/name pair.
    ///
    /// ## Examples
    ///
    /// ```
    /// use changelog_lib::types::ProjectReference;
    ///
    /// let project = ProjectReference::new("acme", "widget");
    /// assert_eq!(project.full_name(), "acme/widget");
    /// assert_eq!(project.canonical_url, "https://github.com/acme/widget");
    /// ```
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        let canonical_url = format!("https://github.com/{}/{}", owner, name);
        Self {
            owner,
            name,
            canonical_url,
        }
    }

    /// The `owner/name` form used in API paths.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// One historical change entry from the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Committer timestamp, always valid
    pub date: DateTime<Utc>,
    /// Full commit message
    pub message: String,
    /// The unmodified API element, retained for traceability
    pub raw: serde_json::Value,
}

impl CommitRecord {
    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Normalized result of one fetch call.
///
/// Terminal value object: produced once, owned solely by the caller, no
/// shared state across calls. `requested_versions` is carried through
/// uninterpreted for the aggregation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub project: ProjectReference,
    /// Commit records in API order (typically reverse-chronological)
    pub changes: Vec<CommitRecord>,
    pub requested_versions: Option<VersionSelector>,
}

/// A group of commit records sharing the same calendar day.
///
/// Stands in for a "release" in the absence of true release/tag data.
/// Day granularity only; time-of-day is discarded during bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionBucket {
    pub date: NaiveDate,
    pub changes: Vec<CommitRecord>,
}

/// Caller directive controlling how many version buckets are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionSelector {
    /// Every bucket
    All,
    /// The first bucket only
    Latest,
    /// A bounded count of buckets
    Count(usize),
}

impl VersionSelector {
    /// Parse a caller-supplied selector string.
    ///
    /// Keywords are matched case-insensitively; anything that is neither a
    /// keyword nor a base-10 unsigned integer is rejected.
    ///
    /// ## Errors
    ///
    /// Returns `ChangelogError::UnsupportedSelector` for unrecognized input
    /// such as a tag or version name.
    ///
    /// ## Examples
    ///
    /// ```
    /// use changelog_lib::types::VersionSelector;
    ///
    /// assert_eq!(VersionSelector::parse("ALL").unwrap(), VersionSelector::All);
    /// assert_eq!(VersionSelector::parse("3").unwrap(), VersionSelector::Count(3));
    /// assert!(VersionSelector::parse("v2.0").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ChangelogError> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "latest" => Ok(Self::Latest),
            _ => trimmed
                .parse::<usize>()
                .map(Self::Count)
                .map_err(|_| ChangelogError::UnsupportedSelector(raw.to_string())),
        }
    }
}

/// Final output: the project reference plus its ordered day buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Changelog {
    pub project: ProjectReference,
    pub versions: Vec<VersionBucket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_reference_new() {
        let project = ProjectReference::new("tokio-rs", "tokio");
        assert_eq!(project.owner, "tokio-rs");
        assert_eq!(project.name, "tokio");
        assert_eq!(project.full_name(), "tokio-rs/tokio");
        assert_eq!(project.canonical_url, "https://github.com/tokio-rs/tokio");
    }

    #[test]
    fn test_commit_record_summary_first_line() {
        let record = CommitRecord {
            date: Utc::now(),
            message: "Fix parser\n\nLonger body text".to_string(),
            raw: serde_json::Value::Null,
        };
        assert_eq!(record.summary(), "Fix parser");
    }

    #[test]
    fn test_commit_record_summary_empty_message() {
        let record = CommitRecord {
            date: Utc::now(),
            message: String::new(),
            raw: serde_json::Value::Null,
        };
        assert_eq!(record.summary(), "");
    }

    #[test]
    fn test_selector_parse_keywords() {
        assert_eq!(VersionSelector::parse("all").unwrap(), VersionSelector::All);
        assert_eq!(VersionSelector::parse("All").unwrap(), VersionSelector::All);
        assert_eq!(VersionSelector::parse("ALL").unwrap(), VersionSelector::All);
        assert_eq!(
            VersionSelector::parse("latest").unwrap(),
            VersionSelector::Latest
        );
        assert_eq!(
            VersionSelector::parse("LATEST").unwrap(),
            VersionSelector::Latest
        );
    }

    #[test]
    fn test_selector_parse_integer() {
        assert_eq!(
            VersionSelector::parse("3").unwrap(),
            VersionSelector::Count(3)
        );
        assert_eq!(
            VersionSelector::parse(" 12 ").unwrap(),
            VersionSelector::Count(12)
        );
        assert_eq!(
            VersionSelector::parse("0").unwrap(),
            VersionSelector::Count(0)
        );
    }

    #[test]
    fn test_selector_parse_invalid() {
        let result = VersionSelector::parse("v2.0");
        assert!(matches!(
            result.unwrap_err(),
            ChangelogError::UnsupportedSelector(_)
        ));

        assert!(VersionSelector::parse("").is_err());
        assert!(VersionSelector::parse("-2").is_err());
        assert!(VersionSelector::parse("2.5").is_err());
        assert!(VersionSelector::parse("newest").is_err());
    }

    #[test]
    fn test_selector_error_message_mentions_release_support() {
        let err = VersionSelector::parse("v2.0").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("v2.0"));
        assert!(message.contains("named release"));
    }
}
