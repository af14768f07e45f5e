use serde::{Deserialize, Serialize};

use crate::models::repository::RepositorySummary;
use crate::utils::config::SiteConfig;

/// Twelve monthly values, oldest first; index 11 is the current month
pub type ActivityHistogram = [u32; 12];

/// Shown whenever no activity could be derived
pub const FALLBACK_ACTIVITY: ActivityHistogram = [65, 59, 80, 81, 56, 55, 70, 65, 85, 75, 60, 75];

pub const DEFAULT_AVATAR_URL: &str = "https://avatars.githubusercontent.com/u/1000000?v=4";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TechItem {
    pub name: String,
    pub color: String,
}

impl TechItem {
    fn new(name: &str, color: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

pub fn default_tech_stack() -> Vec<TechItem> {
    vec![
        TechItem::new("Python", "#3776ab"),
        TechItem::new("LaTeX", "#008080"),
        TechItem::new("Deep Learning", "#ee4c2c"),
        TechItem::new("LLM", "#6a11cb"),
        TechItem::new("Hugging Face", "#ff9d00"),
        TechItem::new("PINN", "#1e90ff"),
    ]
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LanguageDistributionEntry {
    pub name: String,
    pub color: String,
    pub bytes: u64,
    pub percentage: f64,
}

impl LanguageDistributionEntry {
    pub fn new(name: &str, color: &str, bytes: u64, percentage: f64) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            bytes,
            percentage,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarHistoryPoint {
    /// `YYYY-MM`
    pub month: String,
    pub stars: u64,
}

/// Everything the homepage renders, produced by one fetch cycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProfile {
    pub avatar_url: String,
    pub name: String,
    pub bio: String,
    pub total_repos: usize,
    pub total_stars: u64,
    pub readme_content: String,
    pub recent_repos: Vec<RepositorySummary>,
    pub activity_data: ActivityHistogram,
    pub tech_stack: Vec<TechItem>,
    pub language_distribution: Vec<LanguageDistributionEntry>,
    pub star_history: Vec<StarHistoryPoint>,
}

impl AggregatedProfile {
    /// Profile shown when GitHub cannot be reached at all
    pub fn offline(config: &SiteConfig, readme_content: String) -> Self {
        Self {
            avatar_url: config
                .avatar_url
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            name: config.name.clone(),
            bio: config.bio.clone(),
            total_repos: 0,
            total_stars: 0,
            readme_content,
            recent_repos: Vec::new(),
            activity_data: FALLBACK_ACTIVITY,
            tech_stack: tech_stack_for(config),
            language_distribution: vec![
                LanguageDistributionEntry::new("Python", "#3572A5", 50, 50.0),
                LanguageDistributionEntry::new("TeX", "#3D6117", 30, 30.0),
                LanguageDistributionEntry::new("Jupyter Notebook", "#DA5B0B", 20, 20.0),
            ],
            star_history: Vec::new(),
        }
    }
}

/// Configured tech stack, or the built-in one
pub fn tech_stack_for(config: &SiteConfig) -> Vec<TechItem> {
    config
        .tech_stack
        .clone()
        .filter(|stack| !stack.is_empty())
        .unwrap_or_else(default_tech_stack)
}
