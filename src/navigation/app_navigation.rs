use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::task::{AbortHandle, JoinHandle};
use uuid::Uuid;

use super::{Navigator, Route};
use crate::modules::{LoadStatus, ModuleManager};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_POLL: Duration = Duration::from_millis(200);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How hard a feature request tries before falling back to home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Pause after each load/unload call before its status is inspected.
    pub initial_poll: Duration,
    /// Longest wait between re-checks while the status is transient.
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_poll: DEFAULT_INITIAL_POLL,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Where a feature request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    ShowedFeature,
    ReturnedHome,
    /// The request finished after `cleanup()`; nothing was navigated.
    Suppressed,
}

/// Bridges feature requests from the UI to the [`ModuleManager`].
///
/// Every request runs as a tokio task owned by this instance. `cleanup()`
/// (also run on drop) aborts them and closes the navigation gate, so no
/// navigation call is made afterwards.
pub struct AppNavigation {
    shared: Shared,
}

#[derive(Clone)]
struct Shared {
    manager: Arc<ModuleManager>,
    navigator: Arc<dyn Navigator>,
    policy: RetryPolicy,
    closed: Arc<AtomicBool>,
    tasks: Arc<Mutex<Vec<AbortHandle>>>,
}

impl AppNavigation {
    pub fn new(manager: Arc<ModuleManager>, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_policy(manager, navigator, RetryPolicy::default())
    }

    pub fn with_policy(
        manager: Arc<ModuleManager>,
        navigator: Arc<dyn Navigator>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            shared: Shared {
                manager,
                navigator,
                policy,
                closed: Arc::new(AtomicBool::new(false)),
                tasks: Arc::new(Mutex::new(Vec::new())),
            },
        }
    }

    pub fn manager(&self) -> &Arc<ModuleManager> {
        &self.shared.manager
    }

    /// Starts handling a request for `feature`. The returned handle resolves
    /// to the outcome; dropping it does not cancel the request.
    pub fn handle_feature_request(&self, feature: &str) -> JoinHandle<RequestOutcome> {
        let shared = self.shared.clone();
        let feature = feature.to_string();
        let request_id = Uuid::new_v4();
        info!("[{request_id}] Feature requested: {feature}");
        self.shared
            .spawn(async move { shared.handle_feature_request(&feature, request_id).await })
    }

    /// Releases the module behind `feature` in the background. The result
    /// is only logged.
    pub fn unload_module_for_feature(&self, feature: &str) -> JoinHandle<LoadStatus> {
        self.shared.spawn_unload(feature)
    }

    /// Cancels all in-flight work and stops further navigation. Idempotent.
    ///
    /// Closing happens under the same lock navigation calls are made under,
    /// so once this returns no navigation call is running or will start.
    pub fn cleanup(&self) {
        let handles: Vec<AbortHandle> = {
            let mut tasks = self.shared.lock_tasks();
            if self.shared.closed.swap(true, Ordering::SeqCst) {
                return;
            }
            tasks.drain(..).collect()
        };
        info!("Navigation cleanup: cancelling {} task(s)", handles.len());
        for handle in handles {
            handle.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::SeqCst)
    }
}

impl Drop for AppNavigation {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl Shared {
    /// Spawns a task tracked for cancellation. Once closed, new tasks are
    /// aborted straight away.
    fn spawn<F, T>(&self, future: F) -> JoinHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(future);
        let mut tasks = self.lock_tasks();
        if self.closed.load(Ordering::SeqCst) {
            handle.abort();
        } else {
            tasks.retain(|task| !task.is_finished());
            tasks.push(handle.abort_handle());
        }
        handle
    }

    /// The task list doubles as the navigation gate; see `navigate`.
    fn lock_tasks(&self) -> MutexGuard<'_, Vec<AbortHandle>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_unload(&self, feature: &str) -> JoinHandle<LoadStatus> {
        let shared = self.clone();
        let feature = feature.to_string();
        self.spawn(async move {
            let status = shared.release(&feature).await;
            if status == LoadStatus::Unloaded {
                info!("Module for [{feature}] unloaded successfully");
            } else {
                warn!("Failed to unload module for [{feature}] ({status})");
            }
            status
        })
    }

    /// Unloads and waits out the `Unloading` state.
    async fn release(&self, feature: &str) -> LoadStatus {
        let status = self.unload(feature).await;
        tokio::time::sleep(self.policy.initial_poll).await;
        self.settle(status, LoadStatus::Unloading).await
    }

    async fn handle_feature_request(&self, feature: &str, request_id: Uuid) -> RequestOutcome {
        let Some(module_name) = self.manager.mapping().module_for(feature) else {
            info!("[{request_id}] Feature [{feature}] has no module, returning home");
            return self.navigate_home();
        };

        if let Some(active) = self.manager.current_active_module()
            && active.module_name == module_name
        {
            if self.manager.current_status() == LoadStatus::Success {
                debug!("[{request_id}] Module [{module_name}] already loaded");
                return self.navigate_to_feature(feature);
            }
            debug!(
                "[{request_id}] Module [{module_name}] is {}, releasing before reload",
                active.load_status
            );
            // Best effort: a failed release still leaves the load to swap it out.
            let released = self.release(feature).await;
            debug!("[{request_id}] Release finished ({released})");
        }

        self.load_module_and_navigate(feature, module_name, request_id)
            .await
    }

    async fn load_module_and_navigate(
        &self,
        feature: &str,
        module_name: &str,
        request_id: Uuid,
    ) -> RequestOutcome {
        let max_attempts = self.policy.max_attempts;
        for attempt in 1..=max_attempts {
            let status = self.load(feature).await;
            tokio::time::sleep(self.policy.initial_poll).await;
            let status = self.settle(status, LoadStatus::Loading).await;

            if self.is_ready(module_name) {
                info!("[{request_id}] Module for [{feature}] ready after {attempt} attempt(s)");
                return self.navigate_to_feature(feature);
            }
            warn!("[{request_id}] Module load failed ({status}), attempt {attempt}/{max_attempts}");
        }

        error!("[{request_id}] Module load failed after {max_attempts} attempts, returning home");
        self.navigate_home()
    }

    /// Runs the load on its own task so that aborting this request never
    /// interrupts the coordinator mid-operation.
    async fn load(&self, feature: &str) -> LoadStatus {
        let manager = self.manager.clone();
        let feature = feature.to_string();
        tokio::spawn(async move { manager.load_module_for_feature(&feature).await })
            .await
            .unwrap_or_else(|e| {
                error!("Load task failed: {e}");
                LoadStatus::Crashed
            })
    }

    async fn unload(&self, feature: &str) -> LoadStatus {
        let manager = self.manager.clone();
        let feature = feature.to_string();
        tokio::spawn(async move { manager.unload_module_for_feature(&feature).await })
            .await
            .unwrap_or_else(|e| {
                error!("Unload task failed: {e}");
                LoadStatus::Crashed
            })
    }

    /// Waits while the global status equals `transient`, waking on each
    /// status change or after `poll_interval`, whichever comes first.
    async fn settle(&self, mut status: LoadStatus, transient: LoadStatus) -> LoadStatus {
        let mut updates = self.manager.module_load_status();
        while status == transient {
            let _ = tokio::time::timeout(self.policy.poll_interval, updates.changed()).await;
            status = *updates.borrow_and_update();
        }
        status
    }

    /// The module holds the active slot and the coordinator reports it loaded.
    fn is_ready(&self, module_name: &str) -> bool {
        self.manager.current_status() == LoadStatus::Success
            && self.manager.current_active_module().is_some_and(|active| {
                active.module_name == module_name && active.load_status == LoadStatus::Success
            })
    }

    /// Makes one navigation call unless closed. The check and the call both
    /// happen under the task lock, which `cleanup()` takes before closing.
    fn navigate(&self, call: impl FnOnce(&dyn Navigator)) -> bool {
        let _gate = self.lock_tasks();
        if self.closed.load(Ordering::SeqCst) {
            return false;
        }
        call(self.navigator.as_ref());
        true
    }

    fn navigate_to_feature(&self, feature: &str) -> RequestOutcome {
        let route = Route::feature(feature).path();
        if self.navigate(|navigator| navigator.navigate_to(&route)) {
            RequestOutcome::ShowedFeature
        } else {
            debug!("Navigation closed, dropping route to [{feature}]");
            RequestOutcome::Suppressed
        }
    }

    fn navigate_home(&self) -> RequestOutcome {
        if self.navigate(|navigator| navigator.navigate_home_clearing_history()) {
            RequestOutcome::ReturnedHome
        } else {
            debug!("Navigation closed, dropping route home");
            RequestOutcome::Suppressed
        }
    }
}
