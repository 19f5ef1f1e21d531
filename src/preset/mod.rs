//! Preset generation pipeline
//!
//! Each stage is a pure function over the previous stage's output, except
//! for the hub fetches driven by [`generator::Generator`].

pub mod attention;
pub mod format;
pub mod generator;
pub mod metadata;
pub mod parsers;
pub mod size;
pub mod vllm;

pub use generator::{generate_preset, generate_preset_with, Generator};
