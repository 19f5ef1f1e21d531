//! Error types for preset generation

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PresetError>;

/// Errors raised while generating or resolving a model preset
#[derive(Debug, Error)]
pub enum PresetError {
    /// The caller supplied an empty model repository
    #[error("model repository is required")]
    MissingRepository,

    /// The hub rejected an unauthenticated request
    #[error("authentication required for accessing {url}")]
    AuthRequired { url: String },

    /// The hub answered with an unexpected status
    #[error("failed to fetch {url}: status {status}")]
    Status { url: String, status: u16 },

    /// The request never produced a response
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// No recognized weight files in the repository tree
    #[error("no .safetensors or .bin files found")]
    NoWeightFiles,

    /// A hub document was not valid JSON of the expected shape
    #[error("error parsing {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model name is neither registered nor a hub identifier
    #[error("model is not registered: {0}")]
    NotRegistered(String),

    /// The generated preset names architectures the runtime cannot serve
    #[error("unsupported model architecture for {model}: {architectures}")]
    UnsupportedArchitecture { model: String, architectures: String },

    #[error("failed to get secret: {name} in namespace: {namespace}")]
    SecretNotFound { name: String, namespace: String },

    #[error("HF_TOKEN not found in secret: {name} in namespace: {namespace}")]
    SecretKeyMissing { name: String, namespace: String },
}

impl PresetError {
    /// Whether the hub rejected the request for lack of (valid) credentials.
    ///
    /// Generation is all-or-nothing, so this is how callers learn that a
    /// model requires a token even though no preset was produced.
    pub fn auth_required(&self) -> bool {
        match self {
            Self::AuthRequired { .. } => true,
            Self::Status { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }
}
