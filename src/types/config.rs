//! Configuration types
//!
//! Hub access configuration for the preset generator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default hub endpoint
pub const HUGGINGFACE_ENDPOINT: &str = "https://huggingface.co";

/// Generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL of the model hub
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable consulted when no token is passed explicitly
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// User agent sent with every hub request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    HUGGINGFACE_ENDPOINT.to_string()
}

fn default_token_env() -> String {
    "HF_TOKEN".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("presetgen/{}", env!("CARGO_PKG_VERSION"))
}

impl GeneratorConfig {
    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Endpoint without a trailing slash
    pub fn endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token_env: default_token_env(),
            request_timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
