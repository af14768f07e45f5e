use crate::models::profile::AggregatedProfile;
use crate::services::github::{GitHubTransport, PlatformConfig};
use crate::services::profile_cache::{ProfileCache, DEFAULT_TTL_SECONDS};
use crate::services::profile_fetcher::ProfileFetcher;
use crate::services::readme::local_readme;
use crate::utils::clock::Clock;
use crate::utils::config::SiteConfig;
use crate::utils::validators::parse_account_handle;
use chrono::Duration;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Entry point for request handlers: cached profile, refreshed lazily once
/// the TTL has passed. Never fails; a failed cycle yields the offline profile.
pub struct ProfileService {
    config: Arc<SiteConfig>,
    handle: String,
    local_readme_path: PathBuf,
    fetcher: ProfileFetcher,
    cache: ProfileCache,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(
        config: SiteConfig,
        base_dir: &Path,
        transport: Arc<dyn GitHubTransport>,
        platform: PlatformConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let config = Arc::new(config);
        let handle = parse_account_handle(&config.github_url);
        let local_readme_path = base_dir.join(&config.introduction_file);

        log::info!("👤 Serving GitHub profile for {}", handle);

        Self {
            fetcher: ProfileFetcher::new(
                transport,
                platform,
                config.clone(),
                local_readme_path.clone(),
            ),
            cache: ProfileCache::new(Duration::seconds(DEFAULT_TTL_SECONDS), clock.clone()),
            config,
            handle,
            local_readme_path,
            clock,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub async fn profile(&self) -> Arc<AggregatedProfile> {
        if let Some(entry) = self.cache.get(&self.handle).await {
            log::debug!("Serving cached profile for {}", self.handle);
            return entry.profile;
        }

        let profile = match self.fetcher.fetch(&self.handle, self.clock.now()).await {
            Ok(profile) => profile,
            Err(e) => {
                log::error!("❌ Profile fetch failed, serving offline profile: {:#}", e);
                let readme = local_readme(&self.local_readme_path).await;
                AggregatedProfile::offline(&self.config, readme)
            }
        };

        self.cache.put(&self.handle, Arc::new(profile)).await.profile
    }
}
