//! # TUI Adapter
//!
//! The ratatui-specific layer. Builds the coordinator and the navigation
//! orchestrator (this is the composition root), renders the shell, and
//! translates keyboard events into core::Action values.
//!
//! ```text
//!   keys ──▶ TuiEvent ──▶ Action ──▶ update() ──▶ Effect
//!                                                   │
//!            ┌──────────────────────────────────────┘
//!            ▼
//!   AppNavigation ──▶ ChannelNavigator ──▶ Action::Navigate ──┐
//!   ModuleManager ──▶ status forwarder ──▶ Action::Status…  ──┴─▶ event loop
//! ```
//!
//! ## Redraw Strategy
//!
//! - **Busy** (request in flight or module transitioning): draws every
//!   ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or actions.

mod component;
mod components;
mod event;
mod ui;

use log::{info, warn};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::modules::{ModuleManager, ModuleRegistry};
use crate::navigation::{AppNavigation, Navigator, Route};
use crate::tui::event::{TuiEvent, poll_events};

/// Delivers navigation commands to the event loop as actions.
pub struct ChannelNavigator {
    tx: mpsc::Sender<Action>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::Sender<Action>) -> Self {
        Self { tx }
    }

    fn send(&self, action: Action) {
        if self.tx.send(action).is_err() {
            warn!("Failed to deliver navigation: receiver dropped");
        }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate_to(&self, route: &str) {
        match Route::parse(route) {
            Some(route) => self.send(Action::Navigate(route)),
            None => warn!("Ignoring navigation to unknown route {route:?}"),
        }
    }

    fn navigate_home_clearing_history(&self) {
        self.send(Action::NavigateHome);
    }
}

/// Builds the coordinator from resolved config. Mapped modules missing from
/// the registry are reported up front; loading them will fail.
pub fn build_manager(config: &ResolvedConfig) -> Arc<ModuleManager> {
    let registry = ModuleRegistry::with_defaults();
    info!("Registry holds {} module(s)", registry.len());
    if config.mapping.is_empty() {
        warn!("No features are mapped; the home screen will be empty");
    }
    for feature in config.mapping.features() {
        if let Some(module) = config.mapping.module_for(feature)
            && !registry.contains(module)
        {
            warn!("Feature [{feature}] maps to unknown module [{module}]");
        }
    }
    Arc::new(
        ModuleManager::new(registry, config.mapping.clone()).with_hook_timeout(config.hook_timeout),
    )
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let manager = build_manager(&config);

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let navigator = Arc::new(ChannelNavigator::new(tx.clone()));
    let navigation = AppNavigation::with_policy(manager.clone(), navigator, config.retry);
    let forwarder = spawn_status_forwarder(&manager, tx);

    let features = manager.mapping().features().map(str::to_string).collect();
    let mut app = App::new(features, manager.current_status());

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &navigation, &rx);
    ratatui::restore();

    forwarder.abort();
    navigation.cleanup();
    info!("Shell closed");
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    navigation: &AppNavigation,
    rx: &mpsc::Receiver<Action>,
) -> std::io::Result<()> {
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let busy = app.pending_feature.is_some() || app.load_status.is_transient();
        if busy {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when busy (~12fps), long when idle
        let timeout = if busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        // Wait for the first event, then drain everything pending before next draw
        let events = poll_events(timeout);
        if !events.is_empty() {
            needs_redraw = true;
        }

        for event in events {
            if let Some(action) = TuiEvent::action(event)
                && apply(app, action, navigation)
            {
                return Ok(());
            }
        }

        // Handle background task actions (navigation, status changes)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if apply(app, action, navigation) {
                return Ok(());
            }
        }
    }
}

/// Applies an action and carries out its effect. Returns true to quit.
fn apply(app: &mut App, action: Action, navigation: &AppNavigation) -> bool {
    match update(app, action) {
        Effect::RequestFeature(feature) => {
            navigation.handle_feature_request(&feature);
            false
        }
        Effect::ReleaseFeature(feature) => {
            navigation.unload_module_for_feature(&feature);
            false
        }
        Effect::Quit => true,
        Effect::None => false,
    }
}

/// Mirrors coordinator status and active-module changes into the event loop.
fn spawn_status_forwarder(
    manager: &ModuleManager,
    tx: mpsc::Sender<Action>,
) -> tokio::task::AbortHandle {
    let mut status = manager.module_load_status();
    let mut active = manager.active_module();
    tokio::spawn(async move {
        loop {
            let action = tokio::select! {
                changed = status.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    Action::StatusChanged(*status.borrow_and_update())
                }
                changed = active.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    Action::ActiveModuleChanged(active.borrow_and_update().clone())
                }
            };
            if tx.send(action).is_err() {
                break;
            }
        }
    })
    .abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AppConfig, CliOverrides, resolve};
    use crate::modules::LoadStatus;

    #[test]
    fn test_channel_navigator_translates_routes() {
        let (tx, rx) = mpsc::channel();
        let navigator = ChannelNavigator::new(tx);

        navigator.navigate_to("feature_screen/OCR");
        navigator.navigate_to("nowhere");
        navigator.navigate_home_clearing_history();

        let actions: Vec<Action> = rx.try_iter().collect();
        assert_eq!(
            actions,
            vec![Action::Navigate(Route::feature("OCR")), Action::NavigateHome]
        );
    }

    #[tokio::test]
    async fn test_request_flows_back_as_navigation() {
        let config = resolve(&AppConfig::default(), CliOverrides::default());
        let manager = build_manager(&config);
        let (tx, rx) = mpsc::channel();
        let navigation = AppNavigation::new(manager.clone(), Arc::new(ChannelNavigator::new(tx)));
        let mut app = App::new(vec!["OCR".into()], manager.current_status());

        assert!(!apply(&mut app, Action::OpenSelected, &navigation));
        assert_eq!(app.pending_feature.as_deref(), Some("OCR"));

        let mut navigated = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            while let Ok(action) = rx.try_recv() {
                apply(&mut app, action, &navigation);
                navigated = true;
            }
            if navigated {
                break;
            }
        }

        assert!(navigated);
        assert_eq!(app.screen, Route::feature("OCR"));
        assert_eq!(manager.current_status(), LoadStatus::Success);
    }

    #[tokio::test]
    async fn test_forwarder_relays_status() {
        let config = resolve(&AppConfig::default(), CliOverrides::default());
        let manager = build_manager(&config);
        let (tx, rx) = mpsc::channel();
        let handle = spawn_status_forwarder(&manager, tx);

        manager.load_module_for_feature("PDF").await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.abort();

        let actions: Vec<Action> = rx.try_iter().collect();
        assert!(actions.contains(&Action::StatusChanged(LoadStatus::Success)));
    }
}
