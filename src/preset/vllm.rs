//! vLLM runtime parameters
//!
//! Turns preset metadata into the flag set and command line the vLLM
//! container is launched with.

use std::collections::BTreeMap;

use crate::types::preset::Metadata;

/// Entry point of the inference container
pub const DEFAULT_VLLM_COMMAND: &str = "python3 /workspace/vllm/inference_api.py";
pub const DEFAULT_VLLM_RAY_LEADER_COMMAND: &str = "/workspace/vllm/multi-node-serving.sh leader";
pub const DEFAULT_VLLM_RAY_WORKER_COMMAND: &str = "/workspace/vllm/multi-node-serving.sh worker";

/// Where chat templates are mounted inside the container
pub const CHAT_TEMPLATE_DIR: &str = "/workspace/chat_templates/";

pub const DEFAULT_DTYPE: &str = "bfloat16";

/// Runtime flags for serving a model. Empty values are bare flags.
pub fn inference_run_params(meta: &Metadata) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("trust-remote-code".to_string(), String::new());

    let dtype = if meta.dtype.is_empty() {
        DEFAULT_DTYPE
    } else {
        meta.dtype.as_str()
    };
    params.insert("dtype".to_string(), dtype.to_string());

    if !meta.tool_call_parser.is_empty() {
        params.insert("tool-call-parser".to_string(), meta.tool_call_parser.clone());
        params.insert("enable-auto-tool-choice".to_string(), String::new());
    }
    if !meta.chat_template.is_empty() {
        params.insert(
            "chat-template".to_string(),
            format!("{}{}", CHAT_TEMPLATE_DIR, meta.chat_template),
        );
    }
    if meta.allow_remote_files {
        params.insert("allow-remote-files".to_string(), String::new());
    }
    if !meta.reasoning_parser.is_empty() {
        params.insert("reasoning-parser".to_string(), meta.reasoning_parser.clone());
    }

    params
}

/// Append run params to a base command as `--flag` or `--flag=value`
pub fn build_command(base: &str, params: &BTreeMap<String, String>) -> String {
    let mut command = base.to_string();
    for (key, value) in params {
        if value.is_empty() {
            command.push_str(&format!(" --{}", key));
        } else {
            command.push_str(&format!(" --{}={}", key, value));
        }
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> Metadata {
        Metadata {
            name: "test-model".into(),
            model_file_size: "2Gi".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_params() {
        let params = inference_run_params(&meta());
        assert_eq!(params.len(), 2);
        assert_eq!(params["trust-remote-code"], "");
        assert_eq!(params["dtype"], "bfloat16");
    }

    #[test]
    fn test_dtype_override() {
        let params = inference_run_params(&Metadata {
            dtype: "float16".into(),
            ..meta()
        });
        assert_eq!(params["dtype"], "float16");
    }

    #[test]
    fn test_optional_flags() {
        let params = inference_run_params(&Metadata {
            tool_call_parser: "hermes".into(),
            chat_template: "template.jinja".into(),
            allow_remote_files: true,
            reasoning_parser: "qwen3".into(),
            ..meta()
        });

        assert_eq!(params["tool-call-parser"], "hermes");
        assert_eq!(params["enable-auto-tool-choice"], "");
        assert_eq!(params["chat-template"], "/workspace/chat_templates/template.jinja");
        assert_eq!(params["allow-remote-files"], "");
        assert_eq!(params["reasoning-parser"], "qwen3");
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn test_build_command() {
        let params = inference_run_params(&Metadata {
            tool_call_parser: "hermes".into(),
            ..meta()
        });
        assert_eq!(
            build_command(DEFAULT_VLLM_COMMAND, &params),
            "python3 /workspace/vllm/inference_api.py --dtype=bfloat16 \
             --enable-auto-tool-choice --tool-call-parser=hermes --trust-remote-code"
        );
        assert_eq!(build_command("run", &BTreeMap::new()), "run");
    }
}
