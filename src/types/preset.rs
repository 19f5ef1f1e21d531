//! Preset types
//!
//! The records produced by the generator and consumed by the model registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::preset::size::parse_gib;

/// Attention mechanism of a model, as far as the config reveals it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttnType {
    /// Multi-head attention: one KV head per query head
    #[serde(rename = "MHA")]
    Mha,
    /// Multi-query attention: a single shared KV head
    #[serde(rename = "MQA")]
    Mqa,
    /// Grouped-query attention
    #[serde(rename = "GQA")]
    Gqa,
    /// Multi-head latent attention (low-rank KV compression)
    #[serde(rename = "MLA")]
    Mla,
    #[default]
    Unknown,
}

impl AttnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mha => "MHA",
            Self::Mqa => "MQA",
            Self::Gqa => "GQA",
            Self::Mla => "MLA",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AttnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive and sizing metadata of a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Lowercase short name, e.g. `qwen3-8b`
    pub name: String,
    /// Architectures declared by the model config, may be empty
    #[serde(default)]
    pub architectures: Vec<String>,
    pub model_type: String,
    /// Canonical hub URL of the repository
    pub version: String,
    #[serde(default)]
    pub runtime: String,
    pub download_at_runtime: bool,
    /// Set when the hub rejected an unauthenticated request
    pub download_auth_required: bool,
    /// Serving dtype override; empty means the runtime default
    #[serde(default)]
    pub dtype: String,
    /// Chat template file name inside the template directory
    #[serde(default)]
    pub chat_template: String,
    #[serde(default)]
    pub allow_remote_files: bool,
    /// Rounded weight size, `<N>Gi`
    pub model_file_size: String,
    /// Weight size plus system overhead, `<N>Gi`
    pub disk_storage_requirement: String,
    /// KV-cache bytes per token across all layers
    pub bytes_per_token: u64,
    pub model_token_limit: u64,
    #[serde(default)]
    pub reasoning_parser: String,
    #[serde(default)]
    pub tool_call_parser: String,
}

/// vLLM launch parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VllmParam {
    #[serde(default)]
    pub base_command: String,
    pub model_name: String,
    /// Flags passed to the runtime; an empty value renders as a bare flag
    pub model_run_params: BTreeMap<String, String>,
    pub disallow_lora: bool,
    #[serde(default)]
    pub ray_leader_base_command: String,
    #[serde(default)]
    pub ray_worker_base_command: String,
}

/// Fully resolved preset for one model
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PresetParam {
    pub metadata: Metadata,
    pub attn_type: AttnType,
    pub vllm: VllmParam,
    pub readiness_timeout: Duration,
}

/// Fixed-order document printed by the CLI
#[derive(Debug, Serialize)]
pub struct PresetDocument {
    pub attn_type: AttnType,
    pub name: String,
    pub architectures: Vec<String>,
    #[serde(rename = "type")]
    pub model_type: String,
    pub version: String,
    pub download_at_runtime: bool,
    pub download_auth_required: bool,
    pub disk_storage_requirement: String,
    pub model_file_size_gb: u64,
    pub bytes_per_token: u64,
    pub model_token_limit: u64,
    pub reasoning_parser: String,
    pub tool_call_parser: String,
    pub vllm: VllmDocument,
}

#[derive(Debug, Serialize)]
pub struct VllmDocument {
    pub model_name: String,
    pub model_run_params: RunParamsDocument,
    pub disallow_lora: bool,
}

#[derive(Debug, Serialize)]
pub struct RunParamsDocument {
    pub load_format: String,
    pub config_format: String,
    pub tokenizer_mode: String,
}

impl From<&PresetParam> for PresetDocument {
    fn from(param: &PresetParam) -> Self {
        let run_param = |key: &str| {
            param
                .vllm
                .model_run_params
                .get(key)
                .cloned()
                .unwrap_or_default()
        };
        let meta = &param.metadata;

        Self {
            attn_type: param.attn_type,
            name: meta.name.clone(),
            architectures: meta.architectures.clone(),
            model_type: meta.model_type.clone(),
            version: meta.version.clone(),
            download_at_runtime: meta.download_at_runtime,
            download_auth_required: meta.download_auth_required,
            disk_storage_requirement: meta.disk_storage_requirement.clone(),
            model_file_size_gb: parse_gib(&meta.model_file_size).unwrap_or(0.0) as u64,
            bytes_per_token: meta.bytes_per_token,
            model_token_limit: meta.model_token_limit,
            reasoning_parser: meta.reasoning_parser.clone(),
            tool_call_parser: meta.tool_call_parser.clone(),
            vllm: VllmDocument {
                model_name: param.vllm.model_name.clone(),
                model_run_params: RunParamsDocument {
                    load_format: run_param("load_format"),
                    config_format: run_param("config_format"),
                    tokenizer_mode: run_param("tokenizer_mode"),
                },
                disallow_lora: param.vllm.disallow_lora,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attn_type_serializes_as_acronym() {
        assert_eq!(serde_json::to_string(&AttnType::Gqa).unwrap(), "\"GQA\"");
        assert_eq!(serde_json::to_string(&AttnType::Unknown).unwrap(), "\"Unknown\"");
        assert_eq!(AttnType::default(), AttnType::Unknown);
        assert_eq!(AttnType::Mla.to_string(), "MLA");
    }

    #[test]
    fn test_document_key_order() {
        let mut param = PresetParam::default();
        param.metadata.name = "qwen3-8b".into();
        param.metadata.model_file_size = "16Gi".into();
        param.attn_type = AttnType::Gqa;
        param
            .vllm
            .model_run_params
            .insert("load_format".into(), "auto".into());

        let doc = PresetDocument::from(&param);
        assert_eq!(doc.model_file_size_gb, 16);
        assert_eq!(doc.vllm.model_run_params.load_format, "auto");
        assert_eq!(doc.vllm.model_run_params.tokenizer_mode, "");

        let yaml = serde_yml::to_string(&doc).unwrap();
        let keys: Vec<&str> = yaml
            .lines()
            .filter(|line| !line.starts_with(' ') && !line.starts_with('-'))
            .filter_map(|line| line.split(':').next())
            .collect();
        assert_eq!(
            keys,
            vec![
                "attn_type",
                "name",
                "architectures",
                "type",
                "version",
                "download_at_runtime",
                "download_auth_required",
                "disk_storage_requirement",
                "model_file_size_gb",
                "bytes_per_token",
                "model_token_limit",
                "reasoning_parser",
                "tool_call_parser",
                "vllm",
            ]
        );
    }
}
