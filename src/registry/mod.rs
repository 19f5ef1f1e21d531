//! Model registry
//!
//! Maps preset names to model instances. Registries are plain values owned
//! by whoever needs one; there is no process-wide instance.

pub mod catalog;
pub mod model;
pub mod secrets;

use dashmap::DashMap;
use std::sync::Arc;

use crate::types::preset::PresetParam;

pub use catalog::{Catalog, HubPresetSource, PresetSource};
pub use model::VllmCompatibleModel;
pub use secrets::{SecretStore, StaticSecretStore};

/// A servable model
pub trait Model: Send + Sync {
    /// Parameters for running inference
    fn inference_parameters(&self) -> PresetParam;

    /// Parameters for fine-tuning, if supported
    fn tuning_parameters(&self) -> Option<PresetParam>;

    fn supports_distributed_inference(&self) -> bool;

    fn supports_tuning(&self) -> bool;
}

/// Name → model lookup
pub trait Registry: Send + Sync {
    /// Register a model, replacing any previous entry under the same name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    fn register(&self, name: &str, model: Arc<dyn Model>);

    fn get(&self, name: &str) -> Option<Arc<dyn Model>>;

    fn has(&self, name: &str) -> bool;

    fn list_names(&self) -> Vec<String>;
}

/// In-memory registry
pub struct ModelRegistry {
    models: DashMap<String, Arc<dyn Model>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            models: DashMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.models.len()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for ModelRegistry {
    fn register(&self, name: &str, model: Arc<dyn Model>) {
        if name.is_empty() {
            panic!("model name is not specified");
        }
        self.models.insert(name.to_string(), model);
    }

    fn get(&self, name: &str) -> Option<Arc<dyn Model>> {
        self.models.get(name).map(|m| m.value().clone())
    }

    fn has(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.iter().map(|m| m.key().clone()).collect();
        names.sort();
        names
    }
}

/// A preset name is usable when it is registered or looks like a hub
/// identifier (`org/name`, both parts non-empty).
pub fn is_valid_preset(registry: &dyn Registry, preset: &str) -> bool {
    if registry.has(preset) {
        return true;
    }
    matches!(
        preset.split_once('/'),
        Some((org, name)) if !org.is_empty() && !name.is_empty()
    )
}
