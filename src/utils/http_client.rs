use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder};
use std::path::Path;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Environment variables consulted for a GitHub token, in priority order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

/// Create a configured HTTP client for making requests to the GitHub API.
///
/// Per-request timeouts are set by the caller; the client-level timeout is
/// only an upper bound. `accept_invalid_certs` disables certificate
/// validation and must stay off unless explicitly configured.
pub fn create_http_client(accept_invalid_certs: bool) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT);

    if accept_invalid_certs {
        log::warn!("⚠️  TLS certificate validation is DISABLED for outbound GitHub requests");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().context("Failed to create HTTP client")
}

/// Where the resolved token came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenSource {
    Env(&'static str),
    TokenFile,
    Config,
}

/// Resolve the API token. First non-empty wins: `GH_TOKEN`, `GITHUB_TOKEN`,
/// the token file (trimmed, quotes stripped), then the configured value.
pub fn resolve_token<F>(
    env_lookup: F,
    token_file: &Path,
    configured: &str,
) -> Option<(String, TokenSource)>
where
    F: Fn(&str) -> Option<String>,
{
    for var in TOKEN_ENV_VARS {
        if let Some(value) = env_lookup(var).filter(|v| !v.trim().is_empty()) {
            return Some((value.trim().to_string(), TokenSource::Env(var)));
        }
    }

    if let Ok(contents) = std::fs::read_to_string(token_file) {
        let token = clean_token(&contents);
        if !token.is_empty() {
            return Some((token, TokenSource::TokenFile));
        }
    }

    let configured = clean_token(configured);
    if !configured.is_empty() {
        return Some((configured, TokenSource::Config));
    }

    None
}

fn clean_token(raw: &str) -> String {
    raw.trim().replace(['"', '\''], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_create_http_client() {
        assert!(create_http_client(false).is_ok());
        assert!(create_http_client(true).is_ok());
    }

    #[test]
    fn test_env_tokens_take_priority() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("github_token.txt");
        std::fs::write(&file, "from-file").unwrap();

        let resolved = resolve_token(
            env_of(&[("GH_TOKEN", "gh"), ("GITHUB_TOKEN", "github")]),
            &file,
            "from-config",
        );
        assert_eq!(resolved, Some(("gh".to_string(), TokenSource::Env("GH_TOKEN"))));

        let resolved = resolve_token(env_of(&[("GITHUB_TOKEN", "github")]), &file, "");
        assert_eq!(
            resolved,
            Some(("github".to_string(), TokenSource::Env("GITHUB_TOKEN")))
        );
    }

    #[test]
    fn test_token_file_is_trimmed_and_unquoted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("github_token.txt");
        std::fs::write(&file, "  \"ghp_abc'123\"\n").unwrap();

        let resolved = resolve_token(env_of(&[("GH_TOKEN", "  ")]), &file, "from-config");
        assert_eq!(
            resolved,
            Some(("ghp_abc123".to_string(), TokenSource::TokenFile))
        );
    }

    #[test]
    fn test_config_token_and_none() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("github_token.txt");

        let resolved = resolve_token(env_of(&[]), &missing, "from-config");
        assert_eq!(
            resolved,
            Some(("from-config".to_string(), TokenSource::Config))
        );

        std::fs::write(&missing, "   ").unwrap();
        assert_eq!(resolve_token(env_of(&[]), &missing, ""), None);
    }
}
