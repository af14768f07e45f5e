use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::models::profile::TechItem;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub site_config_path: PathBuf,
    pub base_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let base_dir = env::var("FOLIO_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        let site_config_path = env::var("FOLIO_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir.join("config.json"));

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a number")?,
            site_config_path,
            base_dir,
        })
    }
}

/// Contact keys the page template expects to exist, even when empty
const CONTACT_KEYS: [&str; 8] = [
    "cv",
    "qq",
    "wechat",
    "bilibili",
    "douyin",
    "xiaohongshu",
    "google_scholar",
    "kaggle",
];

/// Site configuration read from `config.json`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub github_url: String,
    pub dark_mode: String,
    pub name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub introduction_file: String,
    pub github_token: String,
    pub theme: ThemeConfig,
    pub background: BackgroundConfig,
    pub contact: BTreeMap<String, String>,
    pub tech_stack: Option<Vec<TechItem>>,
    /// Accept any TLS certificate on outbound calls. Weakens transport
    /// security; only for hosts behind intercepting proxies.
    pub insecure_skip_tls_verify: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            github_url: "https://github.com/example".to_string(),
            dark_mode: "auto".to_string(),
            name: "Example User".to_string(),
            bio: "Python Developer".to_string(),
            avatar_url: None,
            introduction_file: "Introduction.md".to_string(),
            github_token: String::new(),
            theme: ThemeConfig::default(),
            background: BackgroundConfig::default(),
            contact: BTreeMap::new(),
            tech_stack: None,
            insecure_skip_tls_verify: false,
        }
        .with_contact_defaults()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary_color: String,
    pub secondary_color: String,
    pub dark_primary_color: String,
    pub dark_secondary_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#6a11cb".to_string(),
            secondary_color: "#2575fc".to_string(),
            dark_primary_color: "#a855f7".to_string(),
            dark_secondary_color: "#60a5fa".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub image: String,
    pub blur: u32,
    pub overlay_opacity: f64,
    pub overlay_color: String,
    pub dark_overlay_color: String,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            image: "background.png".to_string(),
            blur: 8,
            overlay_opacity: 0.6,
            overlay_color: "#121212".to_string(),
            dark_overlay_color: "#000000".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load the site configuration, falling back to built-in defaults when
    /// the file does not exist. A file that exists but cannot be parsed is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!(
                "Site config {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site config {}", path.display()))?;

        Self::from_json(&raw)
            .with_context(|| format!("Invalid site config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(raw)?;
        Ok(config.with_contact_defaults())
    }

    fn with_contact_defaults(mut self) -> Self {
        for key in CONTACT_KEYS {
            self.contact.entry(key.to_string()).or_default();
        }
        self
    }

    /// Copy safe to expose over HTTP
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        config.github_token.clear();
        config
    }
}
