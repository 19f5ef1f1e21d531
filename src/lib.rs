//! presetgen Library
//!
//! Generates serving presets for hub models: weight format, storage sizing,
//! KV-cache footprint and vLLM runtime flags.

pub mod error;
pub mod hub;
pub mod preset;
pub mod registry;
pub mod types;

pub use error::{PresetError, Result};
pub use preset::{generate_preset, generate_preset_with};
