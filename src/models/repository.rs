use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Repository snapshot as returned by `GET /users/{handle}/repos`.
///
/// Timestamps are kept as the ISO-8601 strings GitHub sends; their fixed
/// width makes lexicographic order match chronological order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub languages_url: String,
    #[serde(default)]
    pub fork: bool,
}

impl RepositorySummary {
    fn pushed_key(&self) -> &str {
        self.pushed_at.as_deref().unwrap_or("")
    }
}

/// Stars descending, then most recently pushed first
pub fn compare_by_popularity(a: &RepositorySummary, b: &RepositorySummary) -> Ordering {
    b.stargazers_count
        .cmp(&a.stargazers_count)
        .then_with(|| b.pushed_key().cmp(a.pushed_key()))
}

/// Returns a copy of `repos` ranked by [`compare_by_popularity`]
pub fn rank_by_popularity(repos: &[RepositorySummary]) -> Vec<RepositorySummary> {
    let mut ranked = repos.to_vec();
    ranked.sort_by(compare_by_popularity);
    ranked
}

#[cfg(test)]
pub fn repo(name: &str, stars: u64, pushed_at: &str) -> RepositorySummary {
    RepositorySummary {
        name: name.to_string(),
        description: None,
        html_url: format!("https://github.com/octocat/{}", name),
        stargazers_count: stars,
        forks_count: 0,
        pushed_at: Some(pushed_at.to_string()),
        created_at: Some("2020-01-01T00:00:00Z".to_string()),
        language: None,
        languages_url: String::new(),
        fork: false,
    }
}
