//! vLLM-compatible model
//!
//! Wraps the metadata of a generated preset and turns it into the runtime
//! parameters downstream controllers build pods from.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::preset::vllm::{
    build_command, inference_run_params, DEFAULT_VLLM_COMMAND, DEFAULT_VLLM_RAY_LEADER_COMMAND,
    DEFAULT_VLLM_RAY_WORKER_COMMAND,
};
use crate::registry::Model;
use crate::types::preset::{AttnType, Metadata, PresetParam, VllmParam};

const READINESS_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A model served by vLLM from hub weights
#[derive(Debug, Clone)]
pub struct VllmCompatibleModel {
    metadata: Metadata,
    attn_type: AttnType,
    /// Flags decided at generation time, e.g. the weight format
    run_params: BTreeMap<String, String>,
}

impl VllmCompatibleModel {
    pub fn new(metadata: Metadata, attn_type: AttnType) -> Self {
        Self {
            metadata,
            attn_type,
            run_params: BTreeMap::new(),
        }
    }

    /// Keep the generated run params; they override the metadata-derived ones
    pub fn from_preset(param: &PresetParam) -> Self {
        Self {
            run_params: param.vllm.model_run_params.clone(),
            ..Self::new(param.metadata.clone(), param.attn_type)
        }
    }

    /// Full launch command of the inference container
    pub fn command_line(&self) -> String {
        let params = self.inference_parameters();
        build_command(&params.vllm.base_command, &params.vllm.model_run_params)
    }
}

impl Model for VllmCompatibleModel {
    fn inference_parameters(&self) -> PresetParam {
        let source = &self.metadata;
        let metadata = Metadata {
            name: source.name.clone(),
            architectures: source.architectures.clone(),
            model_type: "text-generation".to_string(),
            version: source.version.clone(),
            runtime: "tfs".to_string(),
            download_at_runtime: true,
            download_auth_required: source.download_auth_required,
            model_file_size: source.model_file_size.clone(),
            disk_storage_requirement: source.disk_storage_requirement.clone(),
            bytes_per_token: source.bytes_per_token,
            model_token_limit: source.model_token_limit,
            ..Default::default()
        };

        let mut run_params = inference_run_params(source);
        run_params.extend(self.run_params.clone());

        PresetParam {
            vllm: VllmParam {
                base_command: DEFAULT_VLLM_COMMAND.to_string(),
                model_name: metadata.name.clone(),
                model_run_params: run_params,
                disallow_lora: false,
                ray_leader_base_command: DEFAULT_VLLM_RAY_LEADER_COMMAND.to_string(),
                ray_worker_base_command: DEFAULT_VLLM_RAY_WORKER_COMMAND.to_string(),
            },
            metadata,
            attn_type: self.attn_type,
            readiness_timeout: READINESS_TIMEOUT,
        }
    }

    fn tuning_parameters(&self) -> Option<PresetParam> {
        None
    }

    fn supports_distributed_inference(&self) -> bool {
        true
    }

    fn supports_tuning(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> Metadata {
        Metadata {
            name: "test-model".into(),
            version: "https://huggingface.co/test/model".into(),
            model_file_size: "2Gi".into(),
            disk_storage_requirement: "52Gi".into(),
            bytes_per_token: 2,
            model_token_limit: 4096,
            ..Default::default()
        }
    }

    #[test]
    fn test_inference_parameters_defaults() {
        let params = VllmCompatibleModel::new(metadata(), AttnType::Gqa).inference_parameters();

        assert_eq!(params.metadata.name, "test-model");
        assert_eq!(params.metadata.model_type, "text-generation");
        assert_eq!(params.metadata.version, "https://huggingface.co/test/model");
        assert_eq!(params.metadata.runtime, "tfs");
        assert!(params.metadata.download_at_runtime);
        assert!(!params.metadata.download_auth_required);
        assert_eq!(params.metadata.model_file_size, "2Gi");
        assert_eq!(params.metadata.disk_storage_requirement, "52Gi");
        assert_eq!(params.metadata.bytes_per_token, 2);
        assert_eq!(params.metadata.model_token_limit, 4096);
        assert_eq!(params.attn_type, AttnType::Gqa);

        assert_eq!(params.vllm.base_command, DEFAULT_VLLM_COMMAND);
        assert_eq!(params.vllm.model_name, "test-model");
        assert_eq!(params.vllm.model_run_params["dtype"], "bfloat16");
        assert_eq!(params.vllm.model_run_params["trust-remote-code"], "");
        assert_eq!(params.readiness_timeout, Duration::from_secs(1800));
    }

    #[test]
    fn test_auth_flag_carries_over() {
        let model = VllmCompatibleModel::new(
            Metadata {
                download_auth_required: true,
                ..metadata()
            },
            AttnType::Unknown,
        );
        assert!(model.inference_parameters().metadata.download_auth_required);
    }

    #[test]
    fn test_capabilities() {
        let model = VllmCompatibleModel::new(metadata(), AttnType::Mha);
        assert!(model.tuning_parameters().is_none());
        assert!(model.supports_distributed_inference());
        assert!(!model.supports_tuning());
    }

    #[test]
    fn test_command_line() {
        let model = VllmCompatibleModel::new(
            Metadata {
                reasoning_parser: "qwen3".into(),
                ..metadata()
            },
            AttnType::Gqa,
        );
        assert_eq!(
            model.command_line(),
            "python3 /workspace/vllm/inference_api.py --dtype=bfloat16 \
             --reasoning-parser=qwen3 --trust-remote-code"
        );
    }

    #[test]
    fn test_from_preset_keeps_weight_format_flags() {
        let mut param = PresetParam {
            metadata: Metadata {
                tool_call_parser: "mistral".into(),
                ..metadata()
            },
            attn_type: AttnType::Mla,
            ..Default::default()
        };
        for key in ["load_format", "config_format", "tokenizer_mode"] {
            param
                .vllm
                .model_run_params
                .insert(key.to_string(), "mistral".to_string());
        }

        let model = VllmCompatibleModel::from_preset(&param);
        let params = model.inference_parameters();
        assert_eq!(params.attn_type, AttnType::Mla);
        assert_eq!(params.vllm.model_run_params["load_format"], "mistral");
        assert_eq!(params.vllm.model_run_params["dtype"], "bfloat16");
        assert_eq!(
            model.command_line(),
            "python3 /workspace/vllm/inference_api.py --config_format=mistral --dtype=bfloat16 \
             --enable-auto-tool-choice --load_format=mistral --tokenizer_mode=mistral \
             --tool-call-parser=mistral --trust-remote-code"
        );
    }

    #[test]
    fn test_generated_params_override_derived_ones() {
        let mut param = PresetParam {
            metadata: metadata(),
            ..Default::default()
        };
        param
            .vllm
            .model_run_params
            .insert("dtype".to_string(), "float16".to_string());

        let params = VllmCompatibleModel::from_preset(&param).inference_parameters();
        assert_eq!(params.vllm.model_run_params["dtype"], "float16");
        assert_eq!(params.vllm.model_run_params["trust-remote-code"], "");
    }
}
