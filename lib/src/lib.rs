//! Changelog Library - date-bucketed commit history for GitHub repositories
//!
//! Fetches a single bounded page of a repository's commit history from the
//! GitHub API and groups it into calendar-day "version" buckets, standing in
//! for releases where no tag data exists. An optional release selector
//! truncates the bucket sequence (`all`, `latest`, or a bounded count).
//!
//! ## Module Structure
//!
//! - [`types`]: Core data structures (ProjectReference, CommitRecord,
//!   VersionBucket, selector, errors)
//! - [`github`]: GitHub commits API client
//! - [`aggregator`]: Day bucketing, release selection, and text rendering
//!
//! ## Examples
//!
//! ```rust,no_run
//! use changelog_lib::{build_changelog, render_text};
//! use reqwest::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new();
//! let changelog =
//!     build_changelog(&client, "https://github.com/tokio-rs/tokio", Some("latest"), None).await?;
//! print!("{}", render_text(&changelog));
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod github;
pub mod types;

pub use aggregator::{build_changelog, render_text};
pub use github::{fetch_commits, parse_github_url};
pub use types::{
    Changelog, ChangelogError, CommitRecord, FetchResult, ProjectReference, VersionBucket,
    VersionSelector,
};
