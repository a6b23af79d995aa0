//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::mapping::FeatureModuleMap;
use crate::modules::{FeatureModule, ModuleError, ModuleManager, ModuleRegistry};
use crate::navigation::Navigator;

/// How a [`ScriptedModule`] responds to `activate`.
#[derive(Clone, Copy)]
pub enum Behavior {
    Succeed,
    Fail(fn() -> ModuleError),
    /// Fail with an I/O error on the first `n` activations, then succeed.
    FailFirst(usize),
    Delay(Duration),
    Panic,
}

/// A module that counts its hook calls and activates according to a script.
/// `deactivate` always succeeds.
pub struct ScriptedModule {
    behavior: Behavior,
    activations: AtomicUsize,
    deactivations: AtomicUsize,
}

impl ScriptedModule {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            activations: AtomicUsize::new(0),
            deactivations: AtomicUsize::new(0),
        }
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }

    pub fn deactivations(&self) -> usize {
        self.deactivations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeatureModule for ScriptedModule {
    async fn activate(&self) -> Result<(), ModuleError> {
        let prior = self.activations.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(make) => Err(make()),
            Behavior::FailFirst(n) if prior < n => {
                Err(ModuleError::Io(std::io::Error::other("scripted failure")))
            }
            Behavior::FailFirst(_) => Ok(()),
            Behavior::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Behavior::Panic => panic!("scripted panic"),
        }
    }

    async fn deactivate(&self) -> Result<(), ModuleError> {
        self.deactivations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A manager over the default mapping whose "Module01" is a [`ScriptedModule`].
pub fn manager_with(behavior: Behavior) -> (ModuleManager, Arc<ScriptedModule>) {
    let module = Arc::new(ScriptedModule::new(behavior));
    let mut registry = ModuleRegistry::with_defaults();
    registry.register("Module01", module.clone());
    (
        ModuleManager::new(registry, FeatureModuleMap::default()),
        module,
    )
}

/// Records every navigation call as a route string.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, route: &str) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route.to_string());
        }
    }

    fn navigate_home_clearing_history(&self) {
        self.navigate_to(crate::navigation::HOME_ROUTE);
    }
}
