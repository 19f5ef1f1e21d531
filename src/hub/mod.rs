//! Model hub access
//!
//! The [`Hub`] trait is the only place the generator performs I/O. The
//! production implementation talks to HuggingFace over HTTP; tests swap in an
//! in-memory hub.

pub mod huggingface;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::{PresetError, Result};

pub use huggingface::{HuggingFaceHub, ModelRepo};

/// One row of a repository file listing. Missing or null fields are zeroed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw outcome of a hub request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub status: u16,
    pub body: Vec<u8>,
    /// The hub answered 401 or 403
    pub auth_required: bool,
}

impl FetchResult {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            auth_required: matches!(status, 401 | 403),
        }
    }

    /// Accept a 200 response, classify anything else.
    ///
    /// A 401/403 without a token is an authentication error; with a token the
    /// rejection is reported as a plain status error.
    pub fn into_body(self, url: &str, token_attached: bool) -> Result<Vec<u8>> {
        if self.auth_required && !token_attached {
            return Err(PresetError::AuthRequired {
                url: url.to_string(),
            });
        }
        if self.status != 200 {
            return Err(PresetError::Status {
                url: url.to_string(),
                status: self.status,
            });
        }
        Ok(self.body)
    }
}

/// Read access to a model hub
#[async_trait]
pub trait Hub: Send + Sync {
    /// Base URL without trailing slash
    fn endpoint(&self) -> &str;

    /// Whether requests carry a bearer token
    fn token_attached(&self) -> bool;

    /// Perform a single GET. Only transport failures are errors here.
    async fn get(&self, url: &str) -> Result<FetchResult>;

    /// Recursive file listing of the `main` revision
    fn tree_url(&self, repo: &str) -> String {
        format!(
            "{}/api/models/{}/tree/main?recursive=true",
            self.endpoint(),
            repo
        )
    }

    /// Raw download URL of a file on the `main` revision
    fn resolve_url(&self, repo: &str, file: &str) -> String {
        format!("{}/{}/resolve/main/{}", self.endpoint(), repo, file)
    }

    /// Fetch a URL and require a 200 response
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let result = self.get(url).await?;
        result.into_body(url, self.token_attached())
    }
}
