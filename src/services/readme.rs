use crate::services::github::{ApiRequest, GitHubTransport, PlatformConfig};
use crate::utils::markdown;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Branches tried, in order, for the profile README
pub const README_BRANCHES: [&str; 2] = ["main", "master"];

pub const PLACEHOLDER_HTML: &str = "<p>This person is lazy and hasn't left anything here yet~</p>";

/// Render the local introduction document, or the placeholder when it is
/// missing or unreadable
pub async fn local_readme(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            log::info!("📄 Using local introduction {}", path.display());
            markdown::render(&content)
        }
        Err(e) => {
            log::warn!(
                "Introduction {} unavailable ({}), using placeholder",
                path.display(),
                e
            );
            PLACEHOLDER_HTML.to_string()
        }
    }
}

pub struct ReadmeService {
    transport: Arc<dyn GitHubTransport>,
    platform: PlatformConfig,
    local_path: PathBuf,
}

impl ReadmeService {
    pub fn new(
        transport: Arc<dyn GitHubTransport>,
        platform: PlatformConfig,
        local_path: PathBuf,
    ) -> Self {
        Self {
            transport,
            platform,
            local_path,
        }
    }

    /// README of the `<handle>/<handle>` repository as HTML
    pub async fn resolve(&self, handle: &str) -> String {
        for branch in README_BRANCHES {
            let url = self.platform.readme_url(handle, branch);
            match self.transport.get(ApiRequest::raw(url)).await.text() {
                Ok(content) => {
                    log::info!("📄 Loaded profile README for {} from {}", handle, branch);
                    return markdown::render(&content);
                }
                Err(e) => {
                    log::debug!("No README on {} branch for {}: {}", branch, handle, e);
                }
            }
        }

        local_readme(&self.local_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::*;

    fn service(server: &mockito::ServerGuard, local_path: PathBuf) -> ReadmeService {
        ReadmeService::new(Arc::new(transport()), platform(server), local_path)
    }

    #[tokio::test]
    async fn test_prefers_main_branch() {
        let mut server = mockito::Server::new_async().await;
        let main = server
            .mock("GET", "/raw/octocat/octocat/main/README.md")
            .with_status(200)
            .with_body("# Hello")
            .create_async()
            .await;
        let master = server
            .mock("GET", "/raw/octocat/octocat/master/README.md")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let html = service(&server, PathBuf::from("/nonexistent")).resolve(HANDLE).await;
        assert!(html.contains("Hello</h1>"));
        main.assert_async().await;
        master.assert_async().await;
    }

    #[tokio::test]
    async fn test_falls_back_to_master_branch() {
        let mut server = mockito::Server::new_async().await;
        mock_status(&mut server, "/raw/octocat/octocat/main/README.md", 404).await;
        server
            .mock("GET", "/raw/octocat/octocat/master/README.md")
            .with_status(200)
            .with_body("from **master**")
            .create_async()
            .await;

        let html = service(&server, PathBuf::from("/nonexistent")).resolve(HANDLE).await;
        assert_eq!(html, "<p>from <strong>master</strong></p>\n");
    }

    #[tokio::test]
    async fn test_falls_back_to_local_document() {
        let mut server = mockito::Server::new_async().await;
        mock_status(&mut server, "/raw/octocat/octocat/main/README.md", 404).await;
        mock_status(&mut server, "/raw/octocat/octocat/master/README.md", 404).await;

        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("Introduction.md");
        std::fs::write(&local, "local *intro*").unwrap();

        let html = service(&server, local).resolve(HANDLE).await;
        assert_eq!(html, "<p>local <em>intro</em></p>\n");
    }

    #[tokio::test]
    async fn test_placeholder_when_nothing_available() {
        let mut server = mockito::Server::new_async().await;
        mock_status(&mut server, "/raw/octocat/octocat/main/README.md", 500).await;
        mock_status(&mut server, "/raw/octocat/octocat/master/README.md", 404).await;

        let dir = tempfile::tempdir().unwrap();
        let html = service(&server, dir.path().join("missing.md"))
            .resolve(HANDLE)
            .await;
        assert_eq!(html, PLACEHOLDER_HTML);
    }
}
