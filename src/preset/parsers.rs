//! Output parser selection
//!
//! vLLM needs to be told how to pull reasoning segments and tool calls out of
//! a model's output. The format follows the model family, which we recognize
//! by name prefix. Keys are lowercase and matched against the lowercase short
//! model name.

/// Reasoning parsers by model name prefix
pub const REASONING_PARSERS: &[(&str, &str)] = &[
    ("deepseek-r1", "deepseek_r1"),
    ("deepseek-v3", "deepseek_v3"),
    ("ernie-4.5", "ernie45"),
    ("glm-4.5", "glm45"),
    ("granite-3.2", "granite"),
    ("hunyuan-a13b", "hunyuan_a13b"),
    ("minimax-m2", "minimax_m2_append_think"),
    ("qwen3", "qwen3"),
    ("qwq-32b", "deepseek_r1"),
];

/// Tool-call parsers by model name prefix
pub const TOOL_CALL_PARSERS: &[(&str, &str)] = &[
    ("ai21-jamba", "jamba"),
    ("deepseek-r1", "deepseek_v3"),
    ("deepseek-v3", "deepseek_v3"),
    ("deepseek-v3.1", "deepseek_v31"),
    ("glm-4", "glm45"),
    ("granite-3", "granite"),
    ("granite-4", "hermes"),
    ("hermes-2", "hermes"),
    ("hermes-3", "hermes"),
    ("hunyuan-a13b", "hunyuan_a13b"),
    ("internlm", "internlm"),
    ("kimi_k2", "kimi_k2"),
    ("longcat", "longcat"),
    ("meta-llama-3", "llama3_json"),
    ("meta-llama-4", "llama4_pythonic"),
    ("minimax", "minimax"),
    ("mistral", "mistral"),
    ("olmo-3", "olmo3"),
    ("qwen2.5", "hermes"),
    ("qwen3", "hermes"),
    ("qwen3-coder", "qwen3_xml"),
    ("qwq-32b", "hermes"),
];

/// Walk prefixes in lexicographic order and keep the last match, so a longer
/// prefix (`qwen3-coder`) overrides the shorter one it extends (`qwen3`).
fn sorted_last_match(table: &[(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    let mut entries: Vec<&(&str, &str)> = table.iter().collect();
    entries.sort_by_key(|(prefix, _)| *prefix);

    let name = name.to_lowercase();
    entries
        .into_iter()
        .filter(|(prefix, _)| name.starts_with(prefix))
        .last()
        .map(|(_, parser)| *parser)
}

/// Reasoning parser for a model, if its family is known.
///
/// Prefixes in this table never overlap today; the sorted-last-match rule is
/// applied anyway so an overlap added later still resolves deterministically.
pub fn reasoning_parser(name: &str) -> Option<&'static str> {
    sorted_last_match(REASONING_PARSERS, name)
}

/// Tool-call parser for a model, if its family is known.
///
/// When several prefixes match, the one sorting last wins.
pub fn tool_call_parser(name: &str) -> Option<&'static str> {
    sorted_last_match(TOOL_CALL_PARSERS, name)
}
