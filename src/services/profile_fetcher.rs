use crate::models::profile::{tech_stack_for, AggregatedProfile, DEFAULT_AVATAR_URL};
use crate::models::repository::{rank_by_popularity, RepositorySummary};
use crate::services::activity_aggregation::ActivityAggregationService;
use crate::services::github::{ApiRequest, GitHubTransport, GitHubUser, PlatformConfig};
use crate::services::language_distribution::LanguageDistributionService;
use crate::services::readme::ReadmeService;
use crate::services::star_history::StarHistoryService;
use crate::utils::config::SiteConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;

pub const RECENT_REPO_COUNT: usize = 5;

/// Runs one full fetch cycle: user, repositories, then every derived widget.
/// Only the user and repository calls can fail the cycle; the sub-services
/// degrade to their own fallbacks.
pub struct ProfileFetcher {
    transport: Arc<dyn GitHubTransport>,
    platform: PlatformConfig,
    config: Arc<SiteConfig>,
    activity: ActivityAggregationService,
    languages: LanguageDistributionService,
    stars: StarHistoryService,
    readme: ReadmeService,
}

impl ProfileFetcher {
    pub fn new(
        transport: Arc<dyn GitHubTransport>,
        platform: PlatformConfig,
        config: Arc<SiteConfig>,
        local_readme_path: PathBuf,
    ) -> Self {
        Self {
            activity: ActivityAggregationService::new(transport.clone(), platform.clone()),
            languages: LanguageDistributionService::new(transport.clone(), platform.clone()),
            stars: StarHistoryService::new(transport.clone(), platform.clone()),
            readme: ReadmeService::new(transport.clone(), platform.clone(), local_readme_path),
            transport,
            platform,
            config,
        }
    }

    pub async fn fetch(&self, handle: &str, now: DateTime<Utc>) -> Result<AggregatedProfile> {
        log::info!("🔄 Fetching GitHub profile for {}", handle);

        let user: GitHubUser = self
            .transport
            .get(ApiRequest::api(self.platform.user_url(handle)))
            .await
            .json()
            .with_context(|| format!("Failed to fetch user {}", handle))?;

        // Most recently pushed first
        let repos: Vec<RepositorySummary> = self
            .transport
            .get(ApiRequest::api(self.platform.repos_url(handle)))
            .await
            .json()
            .with_context(|| format!("Failed to fetch repositories for {}", handle))?;

        let total_repos = repos.len();
        let total_stars: u64 = repos.iter().map(|r| r.stargazers_count).sum();
        let ranked = rank_by_popularity(&repos);

        let readme_content = self.readme.resolve(handle).await;
        let activity_data = self.activity.build_histogram(handle, &repos, now).await;
        let language_distribution = self.languages.build_distribution(handle, &ranked).await;
        let star_history = self.stars.build_history(handle, &repos, now).await;

        log::info!(
            "✅ Fetched {}: {} repos, {} stars",
            handle,
            total_repos,
            total_stars
        );

        let bio = if self.config.bio.is_empty() {
            user.bio.unwrap_or_default()
        } else {
            self.config.bio.clone()
        };

        Ok(AggregatedProfile {
            avatar_url: user
                .avatar_url
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            name: user
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or(user.login),
            bio,
            total_repos,
            total_stars,
            readme_content,
            recent_repos: ranked.into_iter().take(RECENT_REPO_COUNT).collect(),
            activity_data,
            tech_stack: tech_stack_for(&self.config),
            language_distribution,
            star_history,
        })
    }
}
