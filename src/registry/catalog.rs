//! Model resolution
//!
//! Resolves a user-supplied model name to a registered model, generating and
//! registering a preset from the hub on first use of an `org/name` identifier.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{PresetError, Result};
use crate::preset::generate_preset_with;
use crate::registry::{Model, Registry, SecretStore, VllmCompatibleModel};
use crate::types::config::GeneratorConfig;
use crate::types::preset::PresetParam;

/// Hub identifiers that map onto presets shipped with the registry.
/// Keys and values are lowercase.
pub const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("deepseek-ai/deepseek-r1-0528", "deepseek-r1-0528"),
    ("deepseek-ai/deepseek-r1-distill-llama-8b", "deepseek-r1-distill-llama-8b"),
    ("deepseek-ai/deepseek-r1-distill-qwen-14b", "deepseek-r1-distill-qwen-14b"),
    ("deepseek-ai/deepseek-v3-0324", "deepseek-v3-0324"),
    ("google/gemma-3-27b-it", "gemma-3-27b-instruct"),
    ("google/gemma-3-4b-it", "gemma-3-4b-instruct"),
    ("meta-llama/llama-3.1-8b-instruct", "llama-3.1-8b-instruct"),
    ("meta-llama/llama-3.3-70b-instruct", "llama-3.3-70b-instruct"),
    ("microsoft/phi-3-medium-128k-instruct", "phi-3-medium-128k-instruct"),
    ("microsoft/phi-3-medium-4k-instruct", "phi-3-medium-4k-instruct"),
    ("microsoft/phi-3-mini-128k-instruct", "phi-3-mini-128k-instruct"),
    ("microsoft/phi-3-mini-4k-instruct", "phi-3-mini-4k-instruct"),
    ("microsoft/phi-3.5-mini-instruct", "phi-3.5-mini-instruct"),
    ("microsoft/phi-4", "phi-4"),
    ("microsoft/phi-4-mini-instruct", "phi-4-mini-instruct"),
    ("mistralai/ministral-3-14b-instruct-2512", "ministral-3-14b-instruct"),
    ("mistralai/ministral-3-3b-instruct-2512", "ministral-3-3b-instruct"),
    ("mistralai/ministral-3-8b-instruct-2512", "ministral-3-8b-instruct"),
    ("mistralai/mistral-7b-instruct-v0.3", "mistral-7b-instruct"),
    ("mistralai/mistral-7b-v0.3", "mistral-7b"),
    ("mistralai/mistral-large-3-675b-instruct-2512", "mistral-large-3-675b-instruct"),
    ("openai/gpt-oss-120b", "gpt-oss-120b"),
    ("openai/gpt-oss-20b", "gpt-oss-20b"),
    ("qwen/qwen2.5-coder-32b-instruct", "qwen2.5-coder-32b-instruct"),
    ("qwen/qwen2.5-coder-7b-instruct", "qwen2.5-coder-7b-instruct"),
    ("tiiuae/falcon-40b", "falcon-40b"),
    ("tiiuae/falcon-40b-instruct", "falcon-40b-instruct"),
    ("tiiuae/falcon-7b", "falcon-7b"),
    ("tiiuae/falcon-7b-instruct", "falcon-7b-instruct"),
];

/// Architectures the vLLM runtime can serve
pub const SUPPORTED_ARCHITECTURES: &[&str] = &[
    "BaichuanForCausalLM",
    "BloomForCausalLM",
    "ChatGLMModel",
    "CohereForCausalLM",
    "DeciLMForCausalLM",
    "DeepseekForCausalLM",
    "DeepseekV2ForCausalLM",
    "DeepseekV3ForCausalLM",
    "Ernie4_5_ForCausalLM",
    "Ernie4_5_MoeForCausalLM",
    "FalconForCausalLM",
    "Gemma2ForCausalLM",
    "Gemma3ForCausalLM",
    "Gemma3ForConditionalGeneration",
    "GemmaForCausalLM",
    "Glm4ForCausalLM",
    "Glm4MoeForCausalLM",
    "GPT2LMHeadModel",
    "GPTBigCodeForCausalLM",
    "GPTJForCausalLM",
    "GPTNeoXForCausalLM",
    "GptOssForCausalLM",
    "GraniteForCausalLM",
    "GraniteMoeForCausalLM",
    "HunYuanMoEV1ForCausalLM",
    "InternLM2ForCausalLM",
    "InternLMForCausalLM",
    "JambaForCausalLM",
    "KimiK2ForCausalLM",
    "LlamaForCausalLM",
    "Llama4ForConditionalGeneration",
    "MiniMaxM2ForCausalLM",
    "Mistral3ForConditionalGeneration",
    "MistralForCausalLM",
    "MistralLarge3ForCausalLM",
    "MixtralForCausalLM",
    "MPTForCausalLM",
    "Olmo2ForCausalLM",
    "Olmo3ForCausalLM",
    "OlmoForCausalLM",
    "Phi3ForCausalLM",
    "PhiForCausalLM",
    "PhiMoEForCausalLM",
    "Qwen2ForCausalLM",
    "Qwen2MoeForCausalLM",
    "Qwen3ForCausalLM",
    "Qwen3MoeForCausalLM",
    "StableLmForCausalLM",
    "Starcoder2ForCausalLM",
];

/// Produces presets for hub identifiers
#[async_trait]
pub trait PresetSource: Send + Sync {
    async fn generate(&self, model_repo: &str, token: &str) -> Result<PresetParam>;
}

/// Generates presets from the configured hub
#[derive(Debug, Clone, Default)]
pub struct HubPresetSource {
    config: GeneratorConfig,
}

impl HubPresetSource {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PresetSource for HubPresetSource {
    async fn generate(&self, model_repo: &str, token: &str) -> Result<PresetParam> {
        generate_preset_with(&self.config, model_repo, token).await
    }
}

fn builtin_preset(model_repo: &str) -> Option<&'static str> {
    BUILTIN_MODELS
        .iter()
        .find(|(repo, _)| *repo == model_repo)
        .map(|(_, preset)| *preset)
}

fn is_supported(architectures: &[String]) -> bool {
    architectures.is_empty()
        || architectures
            .iter()
            .any(|arch| SUPPORTED_ARCHITECTURES.contains(&arch.as_str()))
}

/// Resolves model names against a registry, generating presets on demand
pub struct Catalog {
    registry: Arc<dyn Registry>,
    secrets: Arc<dyn SecretStore>,
    source: Arc<dyn PresetSource>,
}

impl Catalog {
    pub fn new(
        registry: Arc<dyn Registry>,
        secrets: Arc<dyn SecretStore>,
        source: Arc<dyn PresetSource>,
    ) -> Self {
        Self {
            registry,
            secrets,
            source,
        }
    }

    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    /// Look up `model_name`, generating a preset for unknown `org/name`
    /// identifiers. Failures are not cached, a later call retries the hub.
    pub async fn resolve(
        &self,
        model_name: &str,
        secret_name: &str,
        secret_namespace: &str,
    ) -> Result<Arc<dyn Model>> {
        let model_name = model_name.to_lowercase();
        if let Some(model) = self.registry.get(&model_name) {
            return Ok(model);
        }

        if !model_name.contains('/') {
            return Err(PresetError::NotRegistered(model_name));
        }

        if let Some(builtin) = builtin_preset(&model_name) {
            tracing::info!(model = %model_name, builtin, "Using built-in preset");
            return self
                .registry
                .get(builtin)
                .ok_or_else(|| PresetError::NotRegistered(builtin.to_string()));
        }

        tracing::info!(
            model = %model_name,
            secret_name,
            secret_namespace,
            "Generating preset for hub model"
        );
        // public models need no token, so a lookup failure is not fatal
        let token = match self.secrets.hf_token(secret_name, secret_namespace).await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("Failed to get hub token from secret: {}", e);
                String::new()
            }
        };

        let param = self.source.generate(&model_name, &token).await?;

        if param.metadata.architectures.is_empty() {
            tracing::info!(model = %model_name, "Model architecture not specified, assuming supported");
        }
        if !is_supported(&param.metadata.architectures) {
            return Err(PresetError::UnsupportedArchitecture {
                model: model_name,
                architectures: param.metadata.architectures.join(", "),
            });
        }

        let model: Arc<dyn Model> = Arc::new(VllmCompatibleModel::from_preset(&param));
        tracing::info!(model = %model_name, "Registering vLLM-compatible model");
        self.registry.register(&model_name, model.clone());
        Ok(model)
    }
}
