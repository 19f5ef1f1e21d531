//! Shared type definitions
//!
//! Generator configuration and the preset records it produces.

pub mod config;
pub mod preset;
