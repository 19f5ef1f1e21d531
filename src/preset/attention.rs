//! Attention classification and KV-cache sizing

use crate::preset::metadata::ModelConfig;
use crate::types::preset::AttnType;

/// Cache elements are assumed fp16 regardless of the serving dtype
const BYTES_PER_ELEMENT: i64 = 2;

/// Attention-related fields of a model config
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttentionShape {
    pub hidden_size: i64,
    pub hidden_layers: i64,
    pub attention_heads: i64,
    /// 0 when the config does not say
    pub kv_heads: i64,
    /// 0 when the config does not say
    pub head_dim: i64,
    pub multi_query: bool,
    /// Present only for latent-attention models
    pub kv_lora_rank: Option<i64>,
    pub qk_rope_head_dim: i64,
}

/// Per-token KV-cache footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KvCache {
    pub attn_type: AttnType,
    /// Cached elements per token per layer
    pub elements_per_token: i64,
    /// Bytes per token across all layers, never negative
    pub bytes_per_token: u64,
}

impl AttentionShape {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            hidden_size: config.get_int(&["hidden_size", "n_embd", "d_model"], 0),
            hidden_layers: config.get_int(&["num_hidden_layers", "n_layer", "n_layers"], 0),
            attention_heads: config.get_int(&["num_attention_heads", "n_head", "n_heads"], 0),
            kv_heads: config.get_int(&["num_key_value_heads", "n_head_kv", "n_kv_heads"], 0),
            head_dim: config.get_int(&["head_dim"], 0),
            multi_query: config.get_bool(&["multi_query"]).unwrap_or(false),
            // -1 is how some configs spell "no rank"
            kv_lora_rank: config
                .get_int_opt(&["kv_lora_rank"])
                .filter(|&rank| rank != -1),
            qk_rope_head_dim: config.get_int(&["qk_rope_head_dim"], 0),
        }
    }

    /// Classify the attention mechanism and size its cache.
    ///
    /// Latent attention is checked first: such configs usually carry head
    /// counts as well, and those must not be used for sizing.
    pub fn analyze(&self) -> KvCache {
        let heads = self.attention_heads;

        let head_dim = if self.head_dim == 0 && heads > 0 {
            self.hidden_size / heads
        } else {
            self.head_dim
        };

        let kv_heads = if self.kv_heads == 0 && heads > 0 {
            if self.multi_query {
                1
            } else {
                heads
            }
        } else {
            self.kv_heads
        };

        let (attn_type, elements_per_token) = if let Some(rank) = self.kv_lora_rank {
            (AttnType::Mla, rank + self.qk_rope_head_dim)
        } else if heads > 0 && kv_heads > 0 && head_dim > 0 {
            let attn_type = if heads == kv_heads {
                AttnType::Mha
            } else if kv_heads == 1 {
                AttnType::Mqa
            } else {
                AttnType::Gqa
            };
            // separate key and value caches
            (attn_type, 2 * kv_heads * head_dim)
        } else {
            (AttnType::Unknown, 0)
        };

        let bytes = elements_per_token
            .saturating_mul(self.hidden_layers)
            .saturating_mul(BYTES_PER_ELEMENT);

        KvCache {
            attn_type,
            elements_per_token,
            bytes_per_token: u64::try_from(bytes).unwrap_or(0),
        }
    }
}
