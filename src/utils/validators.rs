use anyhow::{anyhow, Result};
use url::Url;

/// Handle used when the configured profile URL yields nothing usable
pub const DEFAULT_HANDLE: &str = "example";

/// Validate that a string is a valid URL with http or https scheme
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str).map_err(|e| anyhow!("Invalid URL format: {}", e))?;

    // Only allow http and https schemes
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!(
            "URL must use http or https scheme, got: {}",
            url.scheme()
        ));
    }

    // Must have a host
    if url.host_str().is_none() {
        return Err(anyhow!("URL must have a host"));
    }

    Ok(url)
}

/// Validate username (alphanumeric, hyphens, underscores, 1-39 chars for GitHub compatibility)
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() > 39 {
        return Err(anyhow!("Username must be between 1 and 39 characters"));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!(
            "Username can only contain alphanumeric characters, hyphens, and underscores"
        ));
    }

    Ok(())
}

/// Extract the account handle from a profile URL such as
/// `https://github.com/octocat/`. Bare handles are accepted too.
pub fn parse_account_handle(profile_url: &str) -> String {
    let candidate = match validate_url(profile_url) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(|s| s.to_string()),
        Err(_) => profile_url
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .map(|s| s.to_string()),
    };

    match candidate {
        Some(handle) if validate_username(&handle).is_ok() => handle,
        _ => {
            log::warn!(
                "Could not extract a GitHub handle from '{}', using '{}'",
                profile_url,
                DEFAULT_HANDLE
            );
            DEFAULT_HANDLE.to_string()
        }
    }
}
