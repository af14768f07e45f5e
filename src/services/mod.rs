pub mod activity_aggregation;
pub mod github;
pub mod language_distribution;
pub mod profile_cache;
pub mod profile_fetcher;
pub mod profile_service;
pub mod readme;
pub mod star_history;

#[cfg(test)]
pub mod test_support;
