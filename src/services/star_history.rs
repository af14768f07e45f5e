use crate::models::profile::StarHistoryPoint;
use crate::models::repository::RepositorySummary;
use crate::services::github::{
    parse_timestamp, ApiRequest, GitHubStargazer, GitHubTransport, PlatformConfig, ACCEPT_STAR,
};
use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

const MAX_SCANNED_REPOS: usize = 15;
pub const MAX_POINTS: usize = 24;

/// Calendar month as (year, month)
pub type MonthKey = (i32, u32);

fn month_key(at: &DateTime<Utc>) -> MonthKey {
    (at.year(), at.month())
}

fn next_month((year, month): MonthKey) -> MonthKey {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn format_month((year, month): MonthKey) -> String {
    format!("{:04}-{:02}", year, month)
}

/// Running star total at the end of every month in which a star landed.
/// Events need not be sorted.
pub fn cumulative_by_month(events: &[DateTime<Utc>]) -> BTreeMap<MonthKey, u64> {
    let mut sorted = events.to_vec();
    sorted.sort();

    let mut monthly = BTreeMap::new();
    for (i, event) in sorted.iter().enumerate() {
        monthly.insert(month_key(event), i as u64 + 1);
    }
    monthly
}

/// One point per month from the first observed month through `now`'s month
/// (or the last observed month, if that is later), carrying the last total
/// forward across quiet months
pub fn densify(monthly: &BTreeMap<MonthKey, u64>, now: DateTime<Utc>) -> Vec<StarHistoryPoint> {
    let (Some(&first), Some(&last_observed)) = (monthly.keys().next(), monthly.keys().next_back())
    else {
        return Vec::new();
    };
    let last = month_key(&now).max(last_observed);

    let mut points = Vec::new();
    let mut running = 0;
    let mut current = first;
    while current <= last {
        if let Some(&total) = monthly.get(&current) {
            running = total;
        }
        points.push(StarHistoryPoint {
            month: format_month(current),
            stars: running,
        });
        current = next_month(current);
    }
    points
}

/// Fixed-stride sample down to `max_points`; the final sample is always the
/// true last point
pub fn downsample(points: Vec<StarHistoryPoint>, max_points: usize) -> Vec<StarHistoryPoint> {
    if points.len() <= max_points || max_points == 0 {
        return points;
    }

    let step = points.len() as f64 / max_points as f64;
    let mut sampled: Vec<StarHistoryPoint> = (0..max_points)
        .map(|i| points[(i as f64 * step) as usize].clone())
        .collect();

    if let (Some(slot), Some(last)) = (sampled.last_mut(), points.last()) {
        *slot = last.clone();
    }
    sampled
}

pub struct StarHistoryService {
    transport: Arc<dyn GitHubTransport>,
    platform: PlatformConfig,
}

impl StarHistoryService {
    pub fn new(transport: Arc<dyn GitHubTransport>, platform: PlatformConfig) -> Self {
        Self {
            transport,
            platform,
        }
    }

    /// Cumulative stars per month across the account's starred repositories.
    /// Empty when nothing was starred or no timestamps could be recovered.
    pub async fn build_history(
        &self,
        handle: &str,
        repos: &[RepositorySummary],
        now: DateTime<Utc>,
    ) -> Vec<StarHistoryPoint> {
        let events = self.collect_star_events(handle, repos).await;
        if events.is_empty() {
            log::info!("No star events found for {}", handle);
            return Vec::new();
        }

        let history = downsample(densify(&cumulative_by_month(&events), now), MAX_POINTS);
        log::info!(
            "⭐ Star history for {}: {} points from {} events",
            handle,
            history.len(),
            events.len()
        );
        history
    }

    async fn collect_star_events(
        &self,
        handle: &str,
        repos: &[RepositorySummary],
    ) -> Vec<DateTime<Utc>> {
        let mut raw_events: Vec<String> = Vec::new();

        for repo in repos
            .iter()
            .filter(|r| r.stargazers_count > 0)
            .take(MAX_SCANNED_REPOS)
        {
            let request = ApiRequest::api(self.platform.stargazers_url(handle, &repo.name))
                .with_accept(ACCEPT_STAR);

            match self.transport.get(request).await.json::<Vec<GitHubStargazer>>() {
                Ok(stargazers) => {
                    raw_events.extend(stargazers.into_iter().filter_map(|s| s.starred_at));
                }
                Err(e) => {
                    // Approximate: every star lands on the creation date
                    log::warn!(
                        "Star timestamps unavailable for {} ({}), using creation date",
                        repo.name,
                        e
                    );
                    if let Some(created_at) = &repo.created_at {
                        raw_events.extend(
                            std::iter::repeat(created_at.clone())
                                .take(repo.stargazers_count as usize),
                        );
                    }
                }
            }
        }

        raw_events
            .iter()
            .filter_map(|raw| match parse_timestamp(raw) {
                Ok(at) => Some(at),
                Err(e) => {
                    log::debug!("Skipping star event: {}", e);
                    None
                }
            })
            .collect()
    }
}
