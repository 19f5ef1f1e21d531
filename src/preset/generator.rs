//! Preset generation
//!
//! Drives one generation: list the repository, pick the weight format, fetch
//! and parse the config, then size the model and its KV cache. Any failure
//! aborts the whole run; there is no partial preset.

use std::sync::Arc;

use crate::error::{PresetError, Result};
use crate::hub::{FileEntry, Hub, HuggingFaceHub, ModelRepo};
use crate::preset::attention::AttentionShape;
use crate::preset::format::{classify, WeightFormat};
use crate::preset::metadata::ModelConfig;
use crate::preset::{parsers, size, vllm};
use crate::types::config::GeneratorConfig;
use crate::types::preset::{Metadata, PresetParam, VllmParam};

/// Model type recorded for generated presets
const MODEL_TYPE: &str = "tfs";

/// Generates the preset of a single repository
pub struct Generator {
    repo: ModelRepo,
    hub: Arc<dyn Hub>,
    param: PresetParam,
}

impl Generator {
    pub fn new(repo: ModelRepo, hub: Arc<dyn Hub>) -> Self {
        let name = repo.short_name();
        let param = PresetParam {
            metadata: Metadata {
                name: name.clone(),
                model_type: MODEL_TYPE.to_string(),
                version: format!("{}/{}", hub.endpoint(), repo.repo_id),
                download_at_runtime: true,
                model_file_size: size::format_gib(0),
                disk_storage_requirement: size::format_gib(size::SYSTEM_DISK_OVERHEAD_GIB),
                ..Default::default()
            },
            vllm: VllmParam {
                model_name: name,
                ..Default::default()
            },
            ..Default::default()
        };

        Self { repo, hub, param }
    }

    /// Run the full pipeline and hand back the finished preset
    pub async fn generate(mut self) -> Result<PresetParam> {
        let format = self.fetch_format().await?;
        let config = self.fetch_config(&format).await?;

        self.apply_metadata(&config);
        self.finalize(&format, &config);

        tracing::info!(
            model = %self.param.metadata.name,
            attn_type = %self.param.attn_type,
            size = %self.param.metadata.model_file_size,
            "Generated preset"
        );
        Ok(self.param)
    }

    async fn fetch_format(&self) -> Result<WeightFormat> {
        let url = self.hub.tree_url(&self.repo.repo_id);
        let body = self.hub.fetch(&url).await?;
        let files: Vec<FileEntry> =
            serde_json::from_slice(&body).map_err(|source| PresetError::Parse {
                url: url.clone(),
                source,
            })?;

        let format = classify(&files)?;
        tracing::debug!(
            repo = %self.repo.repo_id,
            files = format.files.len(),
            config_file = format.config_file,
            load_format = format.load_format,
            "Classified weight format"
        );
        Ok(format)
    }

    async fn fetch_config(&self, format: &WeightFormat) -> Result<ModelConfig> {
        let url = self.hub.resolve_url(&self.repo.repo_id, format.config_file);
        let body = self.hub.fetch(&url).await?;
        ModelConfig::from_slice(&body, &url)
    }

    fn apply_metadata(&mut self, config: &ModelConfig) {
        let meta = &mut self.param.metadata;

        meta.model_token_limit = u64::try_from(config.token_limit()).unwrap_or(0);
        meta.architectures = config.architectures(&meta.name);
        meta.reasoning_parser = parsers::reasoning_parser(&meta.name)
            .unwrap_or_default()
            .to_string();
        meta.tool_call_parser = parsers::tool_call_parser(&meta.name)
            .unwrap_or_default()
            .to_string();
    }

    fn finalize(&mut self, format: &WeightFormat, config: &ModelConfig) {
        let meta = &mut self.param.metadata;
        meta.model_file_size = size::model_file_size(format.total_bytes());
        meta.disk_storage_requirement = size::disk_storage_requirement(&meta.model_file_size);

        let cache = AttentionShape::from_config(config).analyze();
        meta.bytes_per_token = cache.bytes_per_token;
        self.param.attn_type = cache.attn_type;

        let mut run_params = vllm::inference_run_params(&self.param.metadata);
        run_params.extend([
            ("load_format".to_string(), format.load_format.to_string()),
            ("config_format".to_string(), format.config_format.to_string()),
            ("tokenizer_mode".to_string(), format.tokenizer_mode.to_string()),
        ]);

        let vllm_param = &mut self.param.vllm;
        vllm_param.base_command = vllm::DEFAULT_VLLM_COMMAND.to_string();
        vllm_param.ray_leader_base_command = vllm::DEFAULT_VLLM_RAY_LEADER_COMMAND.to_string();
        vllm_param.ray_worker_base_command = vllm::DEFAULT_VLLM_RAY_WORKER_COMMAND.to_string();
        vllm_param.model_run_params = run_params;
    }
}

/// Generate a preset from HuggingFace with the default configuration
pub async fn generate_preset(model_repo: &str, token: &str) -> Result<PresetParam> {
    generate_preset_with(&GeneratorConfig::default(), model_repo, token).await
}

/// Generate a preset from the hub described by `config`.
///
/// An empty repository is rejected before any client is built.
pub async fn generate_preset_with(
    config: &GeneratorConfig,
    model_repo: &str,
    token: &str,
) -> Result<PresetParam> {
    if model_repo.trim().is_empty() {
        return Err(PresetError::MissingRepository);
    }
    let repo = ModelRepo::parse(model_repo)?;
    let hub = HuggingFaceHub::new(config, token)?;
    Generator::new(repo, Arc::new(hub)).generate().await
}
