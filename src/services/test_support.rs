//! Shared fixtures for pipeline tests against a mockito GitHub.

use crate::services::github::{HttpTransport, PlatformConfig};
use mockito::{Matcher, Mock, ServerGuard};
use reqwest::Client;

pub const HANDLE: &str = "octocat";

/// Matches `path` with or without a trailing query string
pub fn path(path: &str) -> Matcher {
    Matcher::Regex(format!("^{}(\\?|$)", path))
}

pub fn transport() -> HttpTransport {
    HttpTransport::new(Client::new(), None)
}

pub fn platform(server: &ServerGuard) -> PlatformConfig {
    PlatformConfig::custom(&server.url(), &format!("{}/raw", server.url()))
}

pub async fn mock_json(server: &mut ServerGuard, route: &str, body: &str) -> Mock {
    server
        .mock("GET", path(route))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

pub async fn mock_status(server: &mut ServerGuard, route: &str, status: usize) -> Mock {
    server
        .mock("GET", path(route))
        .with_status(status)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await
}
