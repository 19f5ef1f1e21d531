//! HuggingFace hub client
//!
//! Fetches repository listings and config documents from HuggingFace (or any
//! endpoint speaking the same API, e.g. a mirror).

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{PresetError, Result};
use crate::hub::{FetchResult, Hub};
use crate::types::config::GeneratorConfig;

/// A model repository identifier, e.g. `Qwen/Qwen3-8B`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRepo {
    pub repo_id: String,
}

impl ModelRepo {
    /// Parse a repository identifier.
    ///
    /// Accepts `org/name`, a bare preset name, or a full hub URL such as
    /// `https://huggingface.co/org/name/blob/main/config.json`, which is
    /// reduced to `org/name`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let input = input.split('?').next().unwrap_or(input);
        let input = input.split('#').next().unwrap_or(input);

        let repo_id = match input.split_once("://") {
            Some((_, rest)) => {
                let parts: Vec<&str> = rest.split('/').skip(1).filter(|p| !p.is_empty()).collect();
                if parts.len() < 2 {
                    return Err(PresetError::MissingRepository);
                }
                format!("{}/{}", parts[0], parts[1])
            }
            None => input.trim_matches('/').to_string(),
        };

        if repo_id.is_empty() {
            return Err(PresetError::MissingRepository);
        }
        Ok(Self { repo_id })
    }

    /// Lowercase last path segment, used as the preset name
    pub fn short_name(&self) -> String {
        self.repo_id
            .rsplit('/')
            .next()
            .unwrap_or(&self.repo_id)
            .to_lowercase()
    }
}

/// Pick the bearer token: an explicit token wins over the environment
pub fn resolve_token(explicit: &str, from_env: Option<String>) -> Option<String> {
    if !explicit.is_empty() {
        return Some(explicit.to_string());
    }
    from_env.filter(|token| !token.is_empty())
}

/// HTTP-backed hub
pub struct HuggingFaceHub {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceHub {
    /// Build a hub client. An empty `token` falls back to the environment
    /// variable named by `config.token_env`.
    pub fn new(config: &GeneratorConfig, token: &str) -> Result<Self> {
        let token = resolve_token(token, std::env::var(&config.token_env).ok());

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(PresetError::Client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            token,
        })
    }
}

#[async_trait]
impl Hub for HuggingFaceHub {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn token_attached(&self) -> bool {
        self.token.is_some()
    }

    async fn get(&self, url: &str) -> Result<FetchResult> {
        tracing::debug!(url, authenticated = self.token.is_some(), "Fetching from hub");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let transport = |source: reqwest::Error| PresetError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?;

        if matches!(status, 401 | 403) {
            tracing::warn!(url, status, "Hub rejected request, authentication required");
        }

        Ok(FetchResult::new(status, body.to_vec()))
    }
}
