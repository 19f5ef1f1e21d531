//! Hub token lookup
//!
//! Tokens for gated models live in secrets. The cluster client that reads
//! them sits behind [`SecretStore`].

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{PresetError, Result};

/// Key holding the hub token inside a secret
pub const HF_TOKEN_KEY: &str = "HF_TOKEN";

const DEFAULT_NAMESPACE: &str = "default";

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Raw secret data, `None` if the secret does not exist
    async fn secret_data(&self, name: &str, namespace: &str)
        -> Result<Option<HashMap<String, String>>>;

    /// Hub token stored in `name`.
    ///
    /// An empty name means no secret was configured and yields an empty
    /// token. An empty namespace means `default`.
    async fn hf_token(&self, name: &str, namespace: &str) -> Result<String> {
        if name.is_empty() {
            return Ok(String::new());
        }
        let namespace = if namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            namespace
        };

        let data = self
            .secret_data(name, namespace)
            .await?
            .ok_or_else(|| PresetError::SecretNotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            })?;

        data.get(HF_TOKEN_KEY)
            .cloned()
            .ok_or_else(|| PresetError::SecretKeyMissing {
                name: name.to_string(),
                namespace: namespace.to_string(),
            })
    }
}

/// Secret store backed by a fixed map
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<(String, String), HashMap<String, String>>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(
        mut self,
        namespace: &str,
        name: &str,
        data: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.secrets.insert(
            (namespace.to_string(), name.to_string()),
            data.into_iter().collect(),
        );
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn secret_data(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<Option<HashMap<String, String>>> {
        Ok(self
            .secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned())
    }
}
