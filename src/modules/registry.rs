//! # Module Registry
//!
//! Maps module identifiers to the capability objects that know how to
//! activate and deactivate them. The coordinator dispatches through this
//! table; an identifier that is not registered cannot be loaded.
//!
//! `with_defaults()` mirrors the shipped product line: "Module01" is the
//! product tools bundle (OCR, PDF, Word) and "Module02".."Module13" are
//! reserved slots that activate without doing any work.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::product_tools::ProductTools;
use super::types::ModuleError;

/// Number of module slots reserved by the product line.
pub const RESERVED_MODULE_COUNT: usize = 13;

/// A logical, independently activatable unit of features.
#[async_trait]
pub trait FeatureModule: Send + Sync {
    /// Bring the module's features up. Called with the coordinator's lock held.
    async fn activate(&self) -> Result<(), ModuleError>;

    /// Release everything `activate` acquired. Called with the coordinator's lock held.
    async fn deactivate(&self) -> Result<(), ModuleError>;
}

/// A reserved module slot with no features behind it yet.
pub struct PlaceholderModule {
    name: String,
}

impl PlaceholderModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl FeatureModule for PlaceholderModule {
    async fn activate(&self) -> Result<(), ModuleError> {
        debug!("Loading future module {} (placeholder)", self.name);
        Ok(())
    }

    async fn deactivate(&self) -> Result<(), ModuleError> {
        debug!("Unloading future module {} (placeholder)", self.name);
        Ok(())
    }
}

/// Formats the identifier of the `index`th reserved slot (1-based).
pub fn module_id(index: usize) -> String {
    format!("Module{index:02}")
}

#[derive(Default, Clone)]
pub struct ModuleRegistry {
    modules: HashMap<String, Arc<dyn FeatureModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry for the shipped product line.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(module_id(1), Arc::new(ProductTools::new()));
        for index in 2..=RESERVED_MODULE_COUNT {
            let name = module_id(index);
            registry.register(name.clone(), Arc::new(PlaceholderModule::new(name)));
        }
        registry
    }

    /// Adds or replaces the module registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, module: Arc<dyn FeatureModule>) {
        self.modules.insert(name.into(), module);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FeatureModule>> {
        self.modules.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_all_reserved_slots() {
        let registry = ModuleRegistry::with_defaults();
        assert_eq!(registry.len(), RESERVED_MODULE_COUNT);
        assert!(registry.contains("Module01"));
        assert!(registry.contains("Module13"));
        assert!(!registry.contains("Module14"));
    }

    #[test]
    fn test_module_id_is_zero_padded() {
        assert_eq!(module_id(1), "Module01");
        assert_eq!(module_id(12), "Module12");
    }

    #[test]
    fn test_placeholder_is_a_no_op() {
        let module = PlaceholderModule::new("Module07");
        assert!(tokio_test::block_on(module.activate()).is_ok());
        assert!(tokio_test::block_on(module.deactivate()).is_ok());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = ModuleRegistry::with_defaults();
        registry.register("Module01", Arc::new(PlaceholderModule::new("Module01")));
        assert_eq!(registry.len(), RESERVED_MODULE_COUNT);
    }
}
