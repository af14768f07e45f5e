use crate::models::profile::LanguageDistributionEntry;
use crate::models::repository::RepositorySummary;
use crate::services::github::{ApiRequest, GitHubTransport, PlatformConfig};
use std::collections::HashMap;
use std::sync::Arc;

const MAX_SCANNED_REPOS: usize = 15;
const MAX_LANGUAGES: usize = 10;
const DEFAULT_LANGUAGE_COLOR: &str = "#858585";

/// GitHub linguist colors for common languages
const LANGUAGE_COLORS: &[(&str, &str)] = &[
    ("Python", "#3572A5"),
    ("JavaScript", "#f1e05a"),
    ("TypeScript", "#3178c6"),
    ("Java", "#b07219"),
    ("C", "#555555"),
    ("C++", "#f34b7d"),
    ("C#", "#178600"),
    ("Go", "#00ADD8"),
    ("Rust", "#dea584"),
    ("Ruby", "#701516"),
    ("PHP", "#4F5D95"),
    ("Swift", "#F05138"),
    ("Kotlin", "#A97BFF"),
    ("Dart", "#00B4AB"),
    ("Scala", "#c22d40"),
    ("R", "#198CE7"),
    ("MATLAB", "#e16737"),
    ("Shell", "#89e051"),
    ("Bash", "#89e051"),
    ("PowerShell", "#012456"),
    ("HTML", "#e34c26"),
    ("CSS", "#563d7c"),
    ("SCSS", "#c6538c"),
    ("Less", "#1d365d"),
    ("Vue", "#41b883"),
    ("Svelte", "#ff3e00"),
    ("Lua", "#000080"),
    ("Perl", "#0298c3"),
    ("Haskell", "#5e5086"),
    ("Elixir", "#6e4a7e"),
    ("Clojure", "#db5855"),
    ("Erlang", "#B83998"),
    ("Julia", "#a270ba"),
    ("Objective-C", "#438eff"),
    ("Assembly", "#6E4C13"),
    ("Makefile", "#427819"),
    ("Dockerfile", "#384d54"),
    ("TeX", "#3D6117"),
    ("Jupyter Notebook", "#DA5B0B"),
    ("Vim Script", "#199f4b"),
    ("Emacs Lisp", "#c065db"),
    ("CMake", "#DA3434"),
    ("Batchfile", "#C1F12E"),
    ("Fortran", "#4d41b1"),
    ("VHDL", "#adb2cb"),
    ("Verilog", "#b2b7f8"),
    ("Cuda", "#3A4E3A"),
    ("Cython", "#fedf5b"),
];

pub fn language_color(language: &str) -> &'static str {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_LANGUAGE_COLOR)
}

/// Shown when no language data could be collected
pub fn default_distribution() -> Vec<LanguageDistributionEntry> {
    vec![
        LanguageDistributionEntry::new("Python", "#3572A5", 50, 50.0),
        LanguageDistributionEntry::new("JavaScript", "#f1e05a", 30, 30.0),
        LanguageDistributionEntry::new("HTML", "#e34c26", 20, 20.0),
    ]
}

/// Rank languages by bytes, keep the top ten and express each as a share of
/// the kept total (one decimal). Ties are ordered by name.
pub fn rank_languages(bytes_by_language: &HashMap<String, u64>) -> Vec<LanguageDistributionEntry> {
    let mut ranked: Vec<(&String, u64)> = bytes_by_language
        .iter()
        .map(|(name, bytes)| (name, *bytes))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(MAX_LANGUAGES);

    let total: u64 = ranked.iter().map(|(_, bytes)| bytes).sum();
    if total == 0 {
        return Vec::new();
    }

    ranked
        .into_iter()
        .map(|(name, bytes)| {
            let percentage = (bytes as f64 / total as f64 * 1000.0).round() / 10.0;
            LanguageDistributionEntry::new(name, language_color(name), bytes, percentage)
        })
        .collect()
}

pub struct LanguageDistributionService {
    transport: Arc<dyn GitHubTransport>,
    platform: PlatformConfig,
}

impl LanguageDistributionService {
    pub fn new(transport: Arc<dyn GitHubTransport>, platform: PlatformConfig) -> Self {
        Self {
            transport,
            platform,
        }
    }

    /// Byte-weighted language mix over the first 15 non-fork repositories
    pub async fn build_distribution(
        &self,
        handle: &str,
        repos: &[RepositorySummary],
    ) -> Vec<LanguageDistributionEntry> {
        let mut bytes_by_language: HashMap<String, u64> = HashMap::new();

        for repo in repos.iter().filter(|r| !r.fork).take(MAX_SCANNED_REPOS) {
            let response = self
                .transport
                .get(ApiRequest::api(self.platform.languages_url(handle, &repo.name)))
                .await;

            match response.json::<HashMap<String, u64>>() {
                Ok(languages) => {
                    for (language, bytes) in languages {
                        *bytes_by_language.entry(language).or_insert(0) += bytes;
                    }
                }
                Err(e) => {
                    log::warn!("Skipping language data for {}: {}", repo.name, e);
                }
            }
        }

        let distribution = rank_languages(&bytes_by_language);
        if distribution.is_empty() {
            log::warn!("No language data available, using default distribution");
            return default_distribution();
        }

        log::info!(
            "Language distribution: {}",
            distribution
                .iter()
                .map(|d| format!("{} {}%", d.name, d.percentage))
                .collect::<Vec<_>>()
                .join(", ")
        );

        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::repository::repo;
    use crate::services::test_support::*;

    fn bytes(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_rank_languages_percentages() {
        let ranked = rank_languages(&bytes(&[("Rust", 600), ("Python", 300), ("Shell", 100)]));
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].name, "Rust");
        assert_eq!(ranked[0].percentage, 60.0);
        assert_eq!(ranked[0].color, "#dea584");
        assert_eq!(ranked[2].percentage, 10.0);
    }

    #[test]
    fn test_rank_languages_keeps_top_ten_over_retained_total() {
        let pairs: Vec<(String, u64)> = (1..=17)
            .map(|i| (format!("Lang{:02}", i), i * 100))
            .collect();
        let map: HashMap<String, u64> = pairs.into_iter().collect();

        let ranked = rank_languages(&map);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].name, "Lang17");
        assert_eq!(ranked[9].name, "Lang08");
        assert!(ranked.windows(2).all(|w| w[0].bytes >= w[1].bytes));

        let sum: f64 = ranked.iter().map(|e| e.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum was {}", sum);
    }

    #[test]
    fn test_unknown_language_gets_neutral_color() {
        assert_eq!(language_color("Brainfuck"), DEFAULT_LANGUAGE_COLOR);
        assert_eq!(language_color("Jupyter Notebook"), "#DA5B0B");
    }

    #[test]
    fn test_empty_or_zero_bytes_ranks_nothing() {
        assert!(rank_languages(&HashMap::new()).is_empty());
        assert!(rank_languages(&bytes(&[("Rust", 0)])).is_empty());
    }

    #[tokio::test]
    async fn test_distribution_skips_forks_and_caps_at_ten() {
        let mut server = mockito::Server::new_async().await;
        let mut repos = Vec::new();
        for i in 0..17 {
            let name = format!("repo{}", i);
            mock_json(
                &mut server,
                &format!("/repos/octocat/{}/languages", name),
                &format!(r#"{{"Lang{:02}": {}}}"#, i, (i + 1) * 1000),
            )
            .await;
            repos.push(repo(&name, 0, "2024-01-01T00:00:00Z"));
        }
        let forked = server
            .mock("GET", path("/repos/octocat/forked/languages"))
            .with_status(200)
            .with_body(r#"{"COBOL": 999999999}"#)
            .expect(0)
            .create_async()
            .await;
        let mut fork = repo("forked", 0, "2024-01-01T00:00:00Z");
        fork.fork = true;
        repos.insert(0, fork);

        let service = LanguageDistributionService::new(Arc::new(transport()), platform(&server));
        let distribution = service.build_distribution(HANDLE, &repos).await;

        // 15 repos scanned, each with a distinct language, top 10 kept
        assert_eq!(distribution.len(), 10);
        assert_eq!(distribution[0].name, "Lang14");
        assert!(distribution.iter().all(|e| e.name != "COBOL"));
        forked.assert_async().await;
    }

    #[tokio::test]
    async fn test_distribution_falls_back_when_nothing_available() {
        let mut server = mockito::Server::new_async().await;
        mock_status(&mut server, "/repos/octocat/alpha/languages", 404).await;

        let service = LanguageDistributionService::new(Arc::new(transport()), platform(&server));
        let distribution = service
            .build_distribution(HANDLE, &[repo("alpha", 0, "2024-01-01T00:00:00Z")])
            .await;

        assert_eq!(distribution, default_distribution());
    }
}
