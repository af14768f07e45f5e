pub mod client;

pub use client::HttpTransport;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const ACCEPT_V3: &str = "application/vnd.github.v3+json";
/// Makes the stargazers endpoint include `starred_at`
pub const ACCEPT_STAR: &str = "application/vnd.github.v3.star+json";

pub const API_TIMEOUT: Duration = Duration::from_secs(10);
pub const RAW_TIMEOUT: Duration = Duration::from_secs(5);

/// Status reported when no HTTP response was received at all
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Base URLs for the GitHub instance being queried
#[derive(Clone, Debug)]
pub struct PlatformConfig {
    pub api_base_url: String,
    pub raw_base_url: String,
}

impl PlatformConfig {
    /// Create a GitHub.com configuration
    pub fn github() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            raw_base_url: "https://raw.githubusercontent.com".to_string(),
        }
    }

    /// Point both hosts at a custom base, e.g. a local mock server
    pub fn custom(api_base_url: &str, raw_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            raw_base_url: raw_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn user_url(&self, handle: &str) -> String {
        format!("{}/users/{}", self.api_base_url, encode(handle))
    }

    pub fn repos_url(&self, handle: &str) -> String {
        format!(
            "{}/users/{}/repos?sort=pushed&per_page=100",
            self.api_base_url,
            encode(handle)
        )
    }

    pub fn events_url(&self, handle: &str, page: u32) -> String {
        format!(
            "{}/users/{}/events?page={}&per_page=100",
            self.api_base_url,
            encode(handle),
            page
        )
    }

    pub fn commits_url(&self, handle: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/commits?author={}&per_page=100",
            self.api_base_url,
            encode(handle),
            encode(repo),
            encode(handle)
        )
    }

    pub fn languages_url(&self, handle: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/languages",
            self.api_base_url,
            encode(handle),
            encode(repo)
        )
    }

    pub fn stargazers_url(&self, handle: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/stargazers?per_page=100",
            self.api_base_url,
            encode(handle),
            encode(repo)
        )
    }

    pub fn readme_url(&self, handle: &str, branch: &str) -> String {
        format!(
            "{}/{}/{}/{}/README.md",
            self.raw_base_url,
            encode(handle),
            encode(handle),
            branch
        )
    }
}

fn encode(segment: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(segment)
}

/// A single GET against GitHub
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub url: String,
    pub accept: &'static str,
    pub authenticated: bool,
    pub timeout: Duration,
}

impl ApiRequest {
    /// Authenticated REST API call
    pub fn api(url: String) -> Self {
        Self {
            url,
            accept: ACCEPT_V3,
            authenticated: true,
            timeout: API_TIMEOUT,
        }
    }

    /// Unauthenticated call against the raw content host
    pub fn raw(url: String) -> Self {
        Self {
            url,
            accept: "*/*",
            authenticated: false,
            timeout: RAW_TIMEOUT,
        }
    }

    pub fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = accept;
        self
    }
}

/// Outcome of a GET. Transport problems never surface as errors; they
/// come back as [`ApiResponse::Failed`] with status 500.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiResponse {
    Received { status: u16, body: String },
    Failed { status: u16, error: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiResponse {
    pub fn failed(error: impl ToString) -> Self {
        ApiResponse::Failed {
            status: TRANSPORT_FAILURE_STATUS,
            error: error.to_string(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiResponse::Received { status, .. } | ApiResponse::Failed { status, .. } => *status,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ApiResponse::Received { status: 200, .. })
    }

    /// Body text of a 200 response
    pub fn text(self) -> Result<String, FetchError> {
        match self {
            ApiResponse::Received { status: 200, body } => Ok(body),
            ApiResponse::Received { status, .. } => Err(FetchError::Status(status)),
            ApiResponse::Failed { error, .. } => Err(FetchError::Transport(error)),
        }
    }

    /// Decode a 200 response body
    pub fn json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let body = self.text()?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Seam between the aggregation pipeline and the network
#[async_trait]
pub trait GitHubTransport: Send + Sync {
    async fn get(&self, request: ApiRequest) -> ApiResponse;
}

/// Parse an ISO-8601 timestamp as GitHub returns it (`2024-05-01T10:00:00Z`)
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", value, e))
}

// GitHub API response types

#[derive(Debug, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubCommit {
    pub commit: GitHubCommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct GitHubCommitDetail {
    pub author: Option<GitHubCommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubCommitAuthor {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubStargazer {
    #[serde(default)]
    pub starred_at: Option<String>,
}
