//! Model config parsing
//!
//! Hub config documents (`config.json`, `params.json`) have no fixed schema.
//! Every field is read through a list of candidate keys, first hit wins.

use serde_json::{Map, Value};

use crate::error::{PresetError, Result};

/// Token limit assumed when the config declares none
pub const DEFAULT_MODEL_TOKEN_LIMIT: i64 = 2048;

const TOKEN_LIMIT_KEYS: &[&str] = &[
    "max_position_embeddings",
    "n_ctx",
    "seq_length",
    "max_seq_len",
    "max_sequence_length",
];

/// Architecture names for model families whose configs omit `architectures`
const ARCHITECTURE_FALLBACKS: &[(&str, &str)] = &[
    ("mistral-large-3", "MistralLarge3ForCausalLM"),
    ("ministral-3", "Mistral3ForConditionalGeneration"),
];

/// Parsed config document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelConfig(Map<String, Value>);

impl ModelConfig {
    pub fn from_slice(body: &[u8], url: &str) -> Result<Self> {
        serde_json::from_slice(body)
            .map(Self)
            .map_err(|source| PresetError::Parse {
                url: url.to_string(),
                source,
            })
    }

    /// First key that holds a value coercible to an integer.
    ///
    /// Integers are taken as-is, floats truncate toward zero, strings must
    /// parse as a base-10 integer. Anything else falls through to the next key.
    pub fn get_int_opt(&self, keys: &[&str]) -> Option<i64> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(coerce_int)
    }

    pub fn get_int(&self, keys: &[&str], default: i64) -> i64 {
        self.get_int_opt(keys).unwrap_or(default)
    }

    /// First key holding a string
    pub fn get_string(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(Value::as_str)
    }

    /// First key holding a boolean
    pub fn get_bool(&self, keys: &[&str]) -> Option<bool> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(Value::as_bool)
    }

    /// Context length, defaulting to [`DEFAULT_MODEL_TOKEN_LIMIT`]
    pub fn token_limit(&self) -> i64 {
        self.get_int(TOKEN_LIMIT_KEYS, DEFAULT_MODEL_TOKEN_LIMIT)
    }

    /// Architectures declared by the config.
    ///
    /// Non-string entries are skipped. When nothing is declared, a few model
    /// families are recognized by name.
    pub fn architectures(&self, model_name: &str) -> Vec<String> {
        let declared: Vec<String> = self
            .0
            .get("architectures")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if !declared.is_empty() {
            return declared;
        }

        ARCHITECTURE_FALLBACKS
            .iter()
            .find(|(prefix, _)| model_name.starts_with(prefix))
            .map(|(_, arch)| vec![arch.to_string()])
            .unwrap_or_default()
    }
}

impl From<Map<String, Value>> for ModelConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
