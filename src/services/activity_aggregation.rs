use crate::models::profile::{ActivityHistogram, FALLBACK_ACTIVITY};
use crate::models::repository::RepositorySummary;
use crate::services::github::{
    parse_timestamp, ApiRequest, GitHubCommit, GitHubEvent, GitHubTransport, PlatformConfig,
};
use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;

const MONTHS: usize = 12;
const MAX_EVENT_PAGES: u32 = 5;
const MAX_COMMIT_REPOS: usize = 5;
/// Smoothed values above this are rescaled so one busy month can't flatten the chart
const CLIP_CEILING: u32 = 200;

/// Whole calendar months between `then` and `now`: `0` is the current month.
/// One month is subtracted when `now`'s day-of-month is earlier than
/// `then`'s, so a partial month does not count. Negative for future dates.
pub fn month_offset(now: DateTime<Utc>, then: DateTime<Utc>) -> i32 {
    let years = now.year() - then.year();
    let months = now.month() as i32 - then.month() as i32;
    let mut offset = years * 12 + months;
    if now.day() < then.day() {
        offset -= 1;
    }
    offset
}

/// Counters indexed by month offset (0 = current month)
#[derive(Debug, Default)]
pub struct MonthlyCounter {
    counts: [u32; MONTHS],
}

impl MonthlyCounter {
    /// Count `then` if it falls within the trailing twelve months
    pub fn record(&mut self, now: DateTime<Utc>, then: DateTime<Utc>) -> bool {
        let offset = month_offset(now, then);
        if (0..MONTHS as i32).contains(&offset) {
            self.counts[offset as usize] += 1;
            true
        } else {
            false
        }
    }

    /// Oldest month first
    pub fn chronological(&self) -> [u32; MONTHS] {
        let mut ordered = [0; MONTHS];
        for (i, slot) in ordered.iter_mut().enumerate() {
            *slot = self.counts[MONTHS - 1 - i];
        }
        ordered
    }
}

/// Three-point moving average (two points at the edges), never below 80%
/// of the smallest value in the window
pub fn smooth(values: &[u32; MONTHS]) -> [u32; MONTHS] {
    let mut smoothed = [0; MONTHS];
    for i in 0..MONTHS {
        let start = i.saturating_sub(1);
        let end = (i + 1).min(MONTHS - 1);
        let window = &values[start..=end];

        let sum: u64 = window.iter().map(|&v| v as u64).sum();
        let average = (sum / window.len() as u64) as u32;
        let floor = window.iter().copied().min().unwrap_or(0) * 4 / 5;
        smoothed[i] = average.max(floor);
    }
    smoothed
}

/// Rescale values above the ceiling so the largest lands exactly on it
pub fn clip(values: &[u32; MONTHS]) -> [u32; MONTHS] {
    let max = values.iter().copied().max().unwrap_or(0);
    if max <= CLIP_CEILING {
        return *values;
    }

    let mut clipped = *values;
    for value in clipped.iter_mut() {
        if *value > CLIP_CEILING {
            *value = (*value as u64 * CLIP_CEILING as u64 / max as u64) as u32;
        }
    }
    clipped
}

/// Turn raw counters into the displayed histogram
pub fn finalize(counter: &MonthlyCounter) -> ActivityHistogram {
    let ordered = counter.chronological();
    if ordered.iter().all(|&v| v == 0) {
        log::info!("No activity found in the last 12 months, using fallback series");
        return FALLBACK_ACTIVITY;
    }
    clip(&smooth(&ordered))
}

pub struct ActivityAggregationService {
    transport: Arc<dyn GitHubTransport>,
    platform: PlatformConfig,
}

impl ActivityAggregationService {
    pub fn new(transport: Arc<dyn GitHubTransport>, platform: PlatformConfig) -> Self {
        Self {
            transport,
            platform,
        }
    }

    /// Build the 12-month histogram. `repos` must be in most-recently-pushed
    /// order. Never fails; any error yields the fallback series.
    pub async fn build_histogram(
        &self,
        handle: &str,
        repos: &[RepositorySummary],
        now: DateTime<Utc>,
    ) -> ActivityHistogram {
        match self.count_activity(handle, repos, now).await {
            Ok(counter) => finalize(&counter),
            Err(e) => {
                log::warn!("Activity aggregation failed, using fallback series: {}", e);
                FALLBACK_ACTIVITY
            }
        }
    }

    async fn count_activity(
        &self,
        handle: &str,
        repos: &[RepositorySummary],
        now: DateTime<Utc>,
    ) -> Result<MonthlyCounter> {
        let mut counter = MonthlyCounter::default();

        let pushes = self.count_push_events(handle, now, &mut counter).await?;
        log::info!("📥 Counted {} push events in the last 12 months", pushes);

        // Commit history is added on top of push events, not reconciled with them
        let commits = self.count_commits(handle, repos, now, &mut counter).await;
        log::info!(
            "📊 Counted {} commits from {} repositories",
            commits,
            repos.len().min(MAX_COMMIT_REPOS)
        );

        Ok(counter)
    }

    async fn count_push_events(
        &self,
        handle: &str,
        now: DateTime<Utc>,
        counter: &mut MonthlyCounter,
    ) -> Result<usize> {
        let mut counted = 0;

        for page in 1..=MAX_EVENT_PAGES {
            let response = self
                .transport
                .get(ApiRequest::api(self.platform.events_url(handle, page)))
                .await;

            if !response.is_ok() {
                log::warn!(
                    "Could not fetch events page {}: status {}",
                    page,
                    response.status()
                );
                break;
            }

            let events: Vec<GitHubEvent> = response.json()?;
            if events.is_empty() {
                break;
            }

            for event in events.iter().filter(|e| e.event_type == "PushEvent") {
                let created_at = parse_timestamp(&event.created_at)?;
                if counter.record(now, created_at) {
                    counted += 1;
                }
            }
        }

        Ok(counted)
    }

    async fn count_commits(
        &self,
        handle: &str,
        repos: &[RepositorySummary],
        now: DateTime<Utc>,
        counter: &mut MonthlyCounter,
    ) -> usize {
        let mut counted = 0;

        for repo in repos.iter().take(MAX_COMMIT_REPOS) {
            let response = self
                .transport
                .get(ApiRequest::api(self.platform.commits_url(handle, &repo.name)))
                .await;

            if !response.is_ok() {
                log::warn!(
                    "Could not fetch commits for {}: status {}",
                    repo.name,
                    response.status()
                );
                continue;
            }

            let dates = response
                .json::<Vec<GitHubCommit>>()
                .map_err(anyhow::Error::from)
                .and_then(|commits| {
                    commits
                        .iter()
                        .filter_map(|c| c.commit.author.as_ref())
                        .map(|author| parse_timestamp(&author.date))
                        .collect::<Result<Vec<_>>>()
                });

            match dates {
                Ok(dates) => {
                    for date in dates {
                        if counter.record(now, date) {
                            counted += 1;
                        }
                    }
                }
                Err(e) => {
                    log::warn!("Skipping commit history for {}: {}", repo.name, e);
                }
            }
        }

        counted
    }
}
