//! # Module Load Coordinator
//!
//! Owns the single active-module slot and the global load status. Every
//! load and unload goes through here, and only here are the slot and the
//! status written.
//!
//! ## Admission
//!
//! Two atomic flags (`loading`, `unloading`) act as a cheap fast-path
//! guard. A caller that sees either flag set is rejected with `Failed`
//! without touching the lock. Callers that pass then take the lock and
//! compare-and-set their own flag, re-checking the other one; only one can
//! win, and the losers are rejected the same way. Nothing queues.
//!
//! ```text
//! load_module(name)
//!   ├─ fast path: loading || unloading ?  ──▶ Failed
//!   ├─ lock { other flag clear && CAS own false→true } else ──▶ Failed
//!   ├─ swap out the active module (lock)
//!   ├─ dispatch through the registry (lock)
//!   │     activate() ──▶ Success
//!   │     fault      ──▶ classified status
//!   └─ own flag cleared on every exit path
//! ```
//!
//! Status is published through `tokio::sync::watch`, so observers can poll
//! the current value or await the next change.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::sync::{Mutex, watch};

use super::registry::ModuleRegistry;
use super::types::{ActiveModule, LoadStatus, ModuleError};
use crate::core::mapping::FeatureModuleMap;

/// Upper bound on a single activate/deactivate hook.
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Status reported before any module has been loaded.
pub const INITIAL_STATUS: LoadStatus = LoadStatus::Failed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Load,
    Unload,
}

/// Clears an in-progress flag when dropped.
struct InProgress<'a>(&'a AtomicBool);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct ModuleManager {
    registry: ModuleRegistry,
    mapping: FeatureModuleMap,
    hook_timeout: Duration,
    lock: Mutex<()>,
    loading: AtomicBool,
    unloading: AtomicBool,
    status: watch::Sender<LoadStatus>,
    active: watch::Sender<Option<ActiveModule>>,
}

impl ModuleManager {
    pub fn new(registry: ModuleRegistry, mapping: FeatureModuleMap) -> Self {
        Self {
            registry,
            mapping,
            hook_timeout: DEFAULT_HOOK_TIMEOUT,
            lock: Mutex::new(()),
            loading: AtomicBool::new(false),
            unloading: AtomicBool::new(false),
            status: watch::Sender::new(INITIAL_STATUS),
            active: watch::Sender::new(None),
        }
    }

    pub fn with_hook_timeout(mut self, hook_timeout: Duration) -> Self {
        self.hook_timeout = hook_timeout;
        self
    }

    pub fn mapping(&self) -> &FeatureModuleMap {
        &self.mapping
    }

    /// Subscribe to the global load status.
    pub fn module_load_status(&self) -> watch::Receiver<LoadStatus> {
        self.status.subscribe()
    }

    pub fn current_status(&self) -> LoadStatus {
        *self.status.borrow()
    }

    /// Subscribe to the active-module slot.
    pub fn active_module(&self) -> watch::Receiver<Option<ActiveModule>> {
        self.active.subscribe()
    }

    pub fn current_active_module(&self) -> Option<ActiveModule> {
        self.active.borrow().clone()
    }

    /// True while a load or unload holds its in-progress flag.
    pub fn is_busy(&self) -> bool {
        self.loading.load(Ordering::SeqCst) || self.unloading.load(Ordering::SeqCst)
    }

    /// Loads the module backing `feature`. Unmapped features fail without
    /// touching any state.
    pub async fn load_module_for_feature(&self, feature: &str) -> LoadStatus {
        match self.mapping.module_for(feature) {
            Some(module_name) => self.load_module(module_name).await,
            None => {
                error!("Feature [{feature}] is not mapped to any module");
                LoadStatus::Failed
            }
        }
    }

    /// Unloads the module backing `feature`. Unmapped features fail without
    /// touching any state.
    pub async fn unload_module_for_feature(&self, feature: &str) -> LoadStatus {
        match self.mapping.module_for(feature) {
            Some(module_name) => self.unload_module(module_name).await,
            None => {
                error!("Feature [{feature}] is not mapped to any module");
                LoadStatus::Failed
            }
        }
    }

    async fn load_module(&self, name: &str) -> LoadStatus {
        let Some(_in_progress) = self.begin(Operation::Load).await else {
            return LoadStatus::Failed;
        };

        info!("Loading module [{name}]");
        match self.load_locked(name).await {
            Ok(status) => status,
            Err(e) => {
                error!("Error while loading module [{name}]: {e}");
                self.record_fault(name, &e)
            }
        }
    }

    async fn unload_module(&self, name: &str) -> LoadStatus {
        let Some(_in_progress) = self.begin(Operation::Unload).await else {
            return LoadStatus::Failed;
        };

        info!("Unloading module [{name}]");
        match self.unload_locked(name).await {
            Ok(status) => status,
            Err(e) => {
                error!("Error while unloading module [{name}]: {e}");
                self.record_fault(name, &e)
            }
        }
    }

    /// Fast-path check, then compare-and-set under the lock. The returned
    /// guard owns the flag until dropped.
    async fn begin(&self, op: Operation) -> Option<InProgress<'_>> {
        if self.is_busy() {
            debug!("Module operation already in progress, rejecting {op:?}");
            return None;
        }

        let (own, other) = match op {
            Operation::Load => (&self.loading, &self.unloading),
            Operation::Unload => (&self.unloading, &self.loading),
        };

        let _lock = self.lock.lock().await;
        if other.load(Ordering::SeqCst)
            || own
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
        {
            debug!("Lost the race for {op:?}, rejecting");
            return None;
        }
        Some(InProgress(own))
    }

    async fn load_locked(&self, name: &str) -> Result<LoadStatus, ModuleError> {
        self.swap_out().await?;

        let _lock = self.lock.lock().await;
        let Some(module) = self.registry.get(name) else {
            error!("Invalid module name [{name}], cannot load");
            self.set_active(Some(ActiveModule::new(name, LoadStatus::Failed)));
            return Ok(LoadStatus::Failed);
        };

        self.set_active(Some(ActiveModule::new(name, LoadStatus::Loading)));
        self.status.send_replace(LoadStatus::Loading);
        self.run_hook(module.activate()).await?;

        self.set_active(Some(ActiveModule::new(name, LoadStatus::Success)));
        self.status.send_replace(LoadStatus::Success);
        info!("Module [{name}] successfully loaded");
        Ok(LoadStatus::Success)
    }

    /// Deactivates whatever holds the active slot and empties it.
    async fn swap_out(&self) -> Result<(), ModuleError> {
        let Some(current) = self.current_active_module() else {
            return Ok(());
        };

        let _lock = self.lock.lock().await;
        info!("Unloading current active module [{}]", current.module_name);
        if let Some(module) = self.registry.get(&current.module_name) {
            self.run_hook(module.deactivate()).await?;
        }
        self.set_active(None);
        Ok(())
    }

    async fn unload_locked(&self, name: &str) -> Result<LoadStatus, ModuleError> {
        let _lock = self.lock.lock().await;

        if let Some(current) = self.current_active_module()
            && current.module_name != name
        {
            warn!(
                "Module [{name}] is not active ([{}] is), nothing to unload",
                current.module_name
            );
            return Ok(LoadStatus::Failed);
        }

        let Some(module) = self.registry.get(name) else {
            error!("Invalid module name [{name}], cannot unload");
            self.set_active(Some(ActiveModule::new(name, LoadStatus::Failed)));
            return Ok(LoadStatus::Failed);
        };

        self.set_active(Some(ActiveModule::new(name, LoadStatus::Unloading)));
        self.status.send_replace(LoadStatus::Unloading);
        self.run_hook(module.deactivate()).await?;

        self.set_active(None);
        self.status.send_replace(LoadStatus::Unloaded);
        info!("Module [{name}] successfully unloaded");
        Ok(LoadStatus::Unloaded)
    }

    /// Runs a hook under the configured timeout, turning panics into faults.
    async fn run_hook<F>(&self, hook: F) -> Result<(), ModuleError>
    where
        F: Future<Output = Result<(), ModuleError>>,
    {
        let guarded = AssertUnwindSafe(hook).catch_unwind();
        match tokio::time::timeout(self.hook_timeout, guarded).await {
            Err(_) => Err(ModuleError::Timeout(self.hook_timeout)),
            Ok(Err(panic)) => Err(ModuleError::Other(panic_message(panic.as_ref()))),
            Ok(Ok(result)) => result,
        }
    }

    fn record_fault(&self, name: &str, e: &ModuleError) -> LoadStatus {
        let status = e.status();
        self.set_active(Some(ActiveModule::new(name, status)));
        self.status.send_replace(status);
        status
    }

    fn set_active(&self, module: Option<ActiveModule>) {
        self.active.send_replace(module);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("hook panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("hook panicked: {msg}")
    } else {
        "hook panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Behavior, ScriptedModule, manager_with};
    use std::io;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_initial_state() {
        let (manager, _) = manager_with(Behavior::Succeed);
        assert_eq!(manager.current_status(), INITIAL_STATUS);
        assert!(manager.current_active_module().is_none());
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn test_load_for_feature_succeeds() {
        let (manager, module) = manager_with(Behavior::Succeed);
        let status = manager.load_module_for_feature("OCR").await;

        assert_eq!(status, LoadStatus::Success);
        assert_eq!(manager.current_status(), LoadStatus::Success);
        assert_eq!(
            manager.current_active_module(),
            Some(ActiveModule::new("Module01", LoadStatus::Success))
        );
        assert_eq!(module.activations(), 1);
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn test_unmapped_feature_fails_without_state_change() {
        let (manager, module) = manager_with(Behavior::Succeed);
        assert_eq!(manager.load_module_for_feature("VIDEO").await, LoadStatus::Failed);
        assert_eq!(manager.unload_module_for_feature("VIDEO").await, LoadStatus::Failed);
        assert_eq!(module.activations(), 0);
        assert!(manager.current_active_module().is_none());
    }

    #[tokio::test]
    async fn test_unrecognized_module_fails() {
        let mapping = FeatureModuleMap::from_pairs([("SCAN", "Module99")]);
        let manager = ModuleManager::new(ModuleRegistry::with_defaults(), mapping);

        assert_eq!(manager.load_module_for_feature("SCAN").await, LoadStatus::Failed);
        assert_eq!(
            manager.current_active_module(),
            Some(ActiveModule::new("Module99", LoadStatus::Failed))
        );
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn test_unload_clears_slot() {
        let (manager, module) = manager_with(Behavior::Succeed);
        manager.load_module_for_feature("PDF").await;

        let status = manager.unload_module_for_feature("PDF").await;
        assert_eq!(status, LoadStatus::Unloaded);
        assert_eq!(manager.current_status(), LoadStatus::Unloaded);
        assert!(manager.current_active_module().is_none());
        assert_eq!(module.deactivations(), 1);
    }

    #[tokio::test]
    async fn test_unload_of_inactive_module_leaves_slot_alone() {
        let mut registry = ModuleRegistry::with_defaults();
        let other = Arc::new(ScriptedModule::new(Behavior::Succeed));
        registry.register("Module02", other.clone());
        let mapping = FeatureModuleMap::from_pairs([("OCR", "Module01"), ("PDF", "Module02")]);
        let manager = ModuleManager::new(registry, mapping);

        manager.load_module_for_feature("OCR").await;
        assert_eq!(manager.unload_module_for_feature("PDF").await, LoadStatus::Failed);
        assert_eq!(other.deactivations(), 0);
        assert_eq!(
            manager.current_active_module(),
            Some(ActiveModule::new("Module01", LoadStatus::Success))
        );
    }

    #[tokio::test]
    async fn test_load_swaps_out_previous_module() {
        let mut registry = ModuleRegistry::new();
        let first = Arc::new(ScriptedModule::new(Behavior::Succeed));
        let second = Arc::new(ScriptedModule::new(Behavior::Succeed));
        registry.register("Module01", first.clone());
        registry.register("Module02", second.clone());
        let mapping = FeatureModuleMap::from_pairs([("OCR", "Module01"), ("PDF", "Module02")]);
        let manager = ModuleManager::new(registry, mapping);

        manager.load_module_for_feature("OCR").await;
        let status = manager.load_module_for_feature("PDF").await;

        assert_eq!(status, LoadStatus::Success);
        assert_eq!(first.deactivations(), 1);
        assert_eq!(second.activations(), 1);
        assert_eq!(
            manager.current_active_module().map(|m| m.module_name),
            Some("Module02".to_string())
        );
    }

    #[tokio::test]
    async fn test_fault_classification_is_recorded() {
        let cases: Vec<(Behavior, LoadStatus)> = vec![
            (
                Behavior::Fail(|| ModuleError::Io(io::Error::other("disk"))),
                LoadStatus::Failed,
            ),
            (
                Behavior::Fail(|| ModuleError::InvalidState("bad".into())),
                LoadStatus::Error,
            ),
            (
                Behavior::Fail(|| ModuleError::MissingReference("engine".into())),
                LoadStatus::Crashed,
            ),
            (Behavior::Fail(|| ModuleError::Other("?".into())), LoadStatus::Crashed),
            (Behavior::Panic, LoadStatus::Crashed),
        ];

        for (behavior, expected) in cases {
            let (manager, _) = manager_with(behavior);
            assert_eq!(manager.load_module_for_feature("OCR").await, expected);
            assert_eq!(manager.current_status(), expected);
            assert_eq!(
                manager.current_active_module(),
                Some(ActiveModule::new("Module01", expected))
            );
            assert!(!manager.is_busy(), "flag leaked for {expected:?}");
        }
    }

    #[tokio::test]
    async fn test_hook_timeout_fails() {
        let (manager, _) = manager_with(Behavior::Delay(Duration::from_millis(200)));
        let manager = manager.with_hook_timeout(Duration::from_millis(10));
        assert_eq!(manager.load_module_for_feature("OCR").await, LoadStatus::Failed);
        assert!(!manager.is_busy());
    }

    #[tokio::test]
    async fn test_concurrent_loads_admit_one() {
        let (manager, module) = manager_with(Behavior::Delay(Duration::from_millis(30)));
        let results = futures::future::join_all(
            (0..5).map(|_| manager.load_module_for_feature("OCR")),
        )
        .await;

        let successes = results.iter().filter(|s| **s == LoadStatus::Success).count();
        let failures = results.iter().filter(|s| **s == LoadStatus::Failed).count();
        assert_eq!(successes, 1);
        assert_eq!(failures, 4);
        assert_eq!(module.activations(), 1);
    }

    #[tokio::test]
    async fn test_unload_rejected_while_loading() {
        let (manager, _) = manager_with(Behavior::Delay(Duration::from_millis(30)));
        let (load, unload) = tokio::join!(
            manager.load_module_for_feature("OCR"),
            manager.unload_module_for_feature("OCR"),
        );
        assert_eq!(load, LoadStatus::Success);
        assert_eq!(unload, LoadStatus::Failed);
    }

    #[tokio::test]
    async fn test_status_subscription_sees_transition() {
        let (manager, _) = manager_with(Behavior::Succeed);
        let mut rx = manager.module_load_status();
        manager.load_module_for_feature("WORD").await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), LoadStatus::Success);
    }
}
