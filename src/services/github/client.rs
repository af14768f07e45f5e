use super::{ApiRequest, ApiResponse, GitHubTransport};
use crate::utils::config::SiteConfig;
use crate::utils::http_client::{create_http_client, resolve_token};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::path::{Path, PathBuf};

pub const TOKEN_FILE_NAME: &str = "github_token.txt";

type EnvLookup = fn(&str) -> Option<String>;

fn process_env(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Where API requests get their token from
enum Credentials {
    Fixed(Option<String>),
    /// Re-read on every request so a rotated token file or env var is
    /// picked up without a restart
    Lookup {
        env: EnvLookup,
        token_file: PathBuf,
        configured: String,
    },
}

impl Credentials {
    fn token(&self) -> Option<String> {
        match self {
            Credentials::Fixed(token) => token.clone(),
            Credentials::Lookup {
                env,
                token_file,
                configured,
            } => resolve_token(*env, token_file, configured).map(|(token, source)| {
                log::debug!("Using GitHub token from {:?}", source);
                token
            }),
        }
    }
}

/// reqwest-backed transport. Attaches the resolved token to API requests
/// and folds every transport error into [`ApiResponse::Failed`].
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
}

impl HttpTransport {
    /// Transport with a fixed token (or none)
    pub fn new(client: Client, token: Option<String>) -> Self {
        Self {
            client,
            credentials: Credentials::Fixed(token),
        }
    }

    /// Build the transport from site configuration. The token is resolved
    /// per request from the environment, `<base_dir>/github_token.txt` or
    /// the config field.
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Result<Self> {
        let client = create_http_client(config.insecure_skip_tls_verify)?;
        Ok(Self::with_token_lookup(
            client,
            base_dir.join(TOKEN_FILE_NAME),
            config.github_token.clone(),
        ))
    }

    pub fn with_token_lookup(client: Client, token_file: PathBuf, configured: String) -> Self {
        Self::with_env_lookup(client, process_env, token_file, configured)
    }

    fn with_env_lookup(
        client: Client,
        env: EnvLookup,
        token_file: PathBuf,
        configured: String,
    ) -> Self {
        let transport = Self {
            client,
            credentials: Credentials::Lookup {
                env,
                token_file,
                configured,
            },
        };
        if transport.credentials.token().is_none() {
            log::info!("No GitHub token configured, requests are unauthenticated");
        }
        transport
    }
}

#[async_trait]
impl GitHubTransport for HttpTransport {
    async fn get(&self, request: ApiRequest) -> ApiResponse {
        let mut builder = self
            .client
            .get(&request.url)
            .header(ACCEPT, request.accept)
            .timeout(request.timeout);

        if request.authenticated {
            if let Some(token) = self.credentials.token() {
                builder = builder.header(AUTHORIZATION, format!("token {}", token));
            }
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("GitHub request to {} failed: {}", request.url, e);
                return ApiResponse::failed(e);
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                log::debug!("GET {} -> {}", request.url, status);
                ApiResponse::Received { status, body }
            }
            Err(e) => {
                log::error!("Failed to read body from {}: {}", request.url, e);
                ApiResponse::failed(e)
            }
        }
    }
}
