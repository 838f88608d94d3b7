//! GitHub commits API client.
//!
//! Fetches a single bounded page of commit history for a repository and
//! normalizes it into [`CommitRecord`]s. Exactly one request per call: no
//! retries, no pagination.

use crate::types::{ChangelogError, CommitRecord, FetchResult, ProjectReference, VersionSelector};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Page size for the single commit-listing request.
const PER_PAGE: usize = 250;

/// User-Agent attached to every outbound request.
const USER_AGENT: &str = "changelog-lib";

/// GitHub API error response.
#[derive(Debug, Deserialize)]
struct ApiErrorPayload {
    message: Option<String>,
}

/// Extract owner and repository name from a GitHub URL.
///
/// Supports:
/// - `https://github.com/owner/repo`
/// - `https://github.com/owner/repo.git`
/// - `git@github.com:owner/repo.git`
/// - `localhost`/`127.0.0.1` URLs whose path ends in `owner/repo`
///   (used by tests standing in for the live API)
///
/// ## Examples
///
/// ```
/// use changelog_lib::github::parse_github_url;
///
/// let (owner, name) = parse_github_url("https://github.com/rust-lang/rust").unwrap();
/// assert_eq!(owner, "rust-lang");
/// assert_eq!(name, "rust");
///
/// let (owner, name) = parse_github_url("git@github.com:tokio-rs/tokio.git").unwrap();
/// assert_eq!(owner, "tokio-rs");
/// assert_eq!(name, "tokio");
/// ```
pub fn parse_github_url(url: &str) -> Option<(String, String)> {
    let url = url.trim();

    // Handle git@ SSH URLs
    if let Some(rest) = url.strip_prefix("git@github.com:") {
        let mut parts = rest.split('/');
        let owner = parts.next()?;
        let name = parts.next()?.trim_end_matches(".git");
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        return Some((owner.to_string(), name.to_string()));
    }

    // Handle HTTPS URLs: owner and name come after the domain
    if url.contains("github.com") {
        let parts: Vec<&str> = url.split('/').collect();
        let domain_idx = parts.iter().position(|part| part.contains("github.com"))?;
        if parts.len() > domain_idx + 2 {
            let owner = parts[domain_idx + 1];
            let name = parts[domain_idx + 2].trim_end_matches(".git");
            if !owner.is_empty() && !name.is_empty() {
                return Some((owner.to_string(), name.to_string()));
            }
        }
        return None;
    }

    // Handle test URLs (localhost/127.0.0.1 with an /owner/repo path)
    if url.contains("localhost") || url.contains("127.0.0.1") {
        let parts: Vec<&str> = url.split('/').collect();
        if parts.len() >= 2 {
            let owner = parts.get(parts.len() - 2)?;
            let name = parts.last()?.trim_end_matches(".git");
            if !owner.is_empty() && !name.is_empty() {
                return Some((owner.to_string(), name.to_string()));
            }
        }
    }

    None
}

/// API origin for a repository URL.
///
/// Repositories on localhost keep their own origin so tests can stand in
/// for the live endpoint.
fn api_base_url(repo_url: &str) -> String {
    if repo_url.contains("localhost") || repo_url.contains("127.0.0.1") {
        if let Some(pos) = repo_url.find("//") {
            let after_scheme = &repo_url[pos + 2..];
            if let Some(slash_pos) = after_scheme.find('/') {
                return format!("{}{}", &repo_url[..pos + 2], &after_scheme[..slash_pos]);
            }
        }
        return repo_url.to_string();
    }
    "https://api.github.com".to_string()
}

/// Fetch one bounded page of commit history for a repository.
///
/// Derives the project reference from `repo_url`, issues a single request
/// for up to 250 commits, and normalizes each element into a
/// [`CommitRecord`]. The `requested` selector is carried through to the
/// result uninterpreted; selection happens in the aggregation stage.
///
/// Authentication uses an `Authorization: Bearer` header — the token is
/// never embedded in the URL. When `token` is absent, the `GITHUB_TOKEN`
/// environment variable is used if set; otherwise the request is
/// unauthenticated.
///
/// ## Errors
///
/// - `ChangelogError::InvalidRepository` — URL does not resolve to an
///   owner/name pair; surfaced before any network access
/// - `ChangelogError::Transport` — connection, timeout, or body failure
/// - `ChangelogError::RemoteApi` — the API answered with an error payload
///   (rate limit, not found) instead of a commit list
/// - `ChangelogError::MalformedCommit` — a commit element lacks required
///   fields
///
/// ## Examples
///
/// ```rust,no_run
/// use changelog_lib::github::fetch_commits;
/// use reqwest::Client;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new();
/// let result = fetch_commits(&client, "https://github.com/tokio-rs/tokio", None, None).await?;
/// println!("{} commits", result.changes.len());
/// # Ok(())
/// # }
/// ```
pub async fn fetch_commits(
    client: &Client,
    repo_url: &str,
    token: Option<&str>,
    requested: Option<VersionSelector>,
) -> Result<FetchResult, ChangelogError> {
    let (owner, name) = parse_github_url(repo_url)
        .ok_or_else(|| ChangelogError::InvalidRepository(repo_url.to_string()))?;
    let project = ProjectReference::new(owner, name);

    let api_url = format!(
        "{}/repos/{}/commits?per_page={}",
        api_base_url(repo_url),
        project.full_name(),
        PER_PAGE
    );

    debug!(url = %api_url, "requesting commit page");

    let mut request = client
        .get(&api_url)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github+json");

    let token = token
        .map(str::to_string)
        .or_else(|| std::env::var("GITHUB_TOKEN").ok());
    if let Some(token) = token {
        request = request.header("Authorization", format!("Bearer {}", token));
    }

    let response = request.send().await?;
    let body = response.text().await?;

    debug!(url = %api_url, bytes = body.len(), "commit page received");

    let elements = decode_commit_page(repo_url, &body)?;

    let mut changes = Vec::with_capacity(elements.len());
    for element in elements {
        if let Some(record) = normalize_commit(element)? {
            changes.push(record);
        }
    }

    Ok(FetchResult {
        project,
        changes,
        requested_versions: requested,
    })
}

/// Decode the response body as a tagged result: a commit page is a JSON
/// array; anything else is treated as an API error payload (rate limit,
/// not found, malformed) whose `message` becomes the diagnostic text.
fn decode_commit_page(
    repo_url: &str,
    body: &str,
) -> Result<Vec<serde_json::Value>, ChangelogError> {
    if let Ok(elements) = serde_json::from_str::<Vec<serde_json::Value>>(body) {
        return Ok(elements);
    }

    let message = serde_json::from_str::<ApiErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.message)
        .unwrap_or_else(|| body.to_string());

    Err(ChangelogError::RemoteApi {
        repo: repo_url.to_string(),
        message,
    })
}

/// Map one API element to a [`CommitRecord`], keeping the element as `raw`.
///
/// Missing `commit.committer.date` or `commit.message` fields are an
/// explicit error. A timestamp that is present but does not parse drops
/// only that record, keeping the "date is always valid" invariant without
/// failing the batch.
fn normalize_commit(element: serde_json::Value) -> Result<Option<CommitRecord>, ChangelogError> {
    let commit = element
        .get("commit")
        .ok_or_else(|| ChangelogError::MalformedCommit("missing commit object".to_string()))?;

    let date_str = commit
        .get("committer")
        .and_then(|committer| committer.get("date"))
        .and_then(|date| date.as_str())
        .ok_or_else(|| {
            ChangelogError::MalformedCommit("missing commit.committer.date".to_string())
        })?;

    let message = commit
        .get("message")
        .and_then(|message| message.as_str())
        .ok_or_else(|| ChangelogError::MalformedCommit("missing commit.message".to_string()))?
        .to_string();

    let date = match DateTime::parse_from_rfc3339(date_str) {
        Ok(date) => date.with_timezone(&Utc),
        Err(err) => {
            warn!(date = date_str, error = %err, "dropping commit with unparseable timestamp");
            return Ok(None);
        }
    };

    Ok(Some(CommitRecord {
        date,
        message,
        raw: element,
    }))
}
