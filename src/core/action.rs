//! # Actions
//!
//! Everything that can happen in the shell becomes an `Action`.
//! User presses Enter on a tool? That's `Action::OpenSelected`.
//! The orchestrator navigates? That's `Action::Navigate(route)`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` for the event loop to carry out. No I/O here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::state::App;
use crate::modules::{ActiveModule, LoadStatus};
use crate::navigation::Route;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectNext,
    SelectPrevious,
    OpenSelected,
    OpenFeature(String),
    Back,
    /// Navigation sink: show `route`.
    Navigate(Route),
    /// Navigation sink: show home and clear the back stack.
    NavigateHome,
    StatusChanged(LoadStatus),
    ActiveModuleChanged(Option<ActiveModule>),
    Quit,
}

/// Side effect requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Hand the feature to the orchestrator.
    RequestFeature(String),
    /// Release the feature's module in the background.
    ReleaseFeature(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::SelectNext => {
            if app.on_home() && !app.features.is_empty() {
                app.selected = (app.selected + 1) % app.features.len();
            }
            Effect::None
        }
        Action::SelectPrevious => {
            if app.on_home() && !app.features.is_empty() {
                app.selected = app
                    .selected
                    .checked_sub(1)
                    .unwrap_or(app.features.len() - 1);
            }
            Effect::None
        }
        Action::OpenSelected => {
            let feature = app
                .selected_feature()
                .filter(|_| app.on_home())
                .map(str::to_string);
            match feature {
                Some(feature) => update(app, Action::OpenFeature(feature)),
                None => Effect::None,
            }
        }
        Action::OpenFeature(feature) => {
            if let Some(pending) = &app.pending_feature {
                app.status_message = format!("Still opening {pending}...");
                return Effect::None;
            }
            app.status_message = format!("Opening {feature}...");
            app.pending_feature = Some(feature.clone());
            Effect::RequestFeature(feature)
        }
        Action::Back => match app.screen.clone() {
            Route::Feature(feature) => {
                app.screen = app.history.pop().unwrap_or(Route::Home);
                app.status_message = format!("Closed {feature}");
                Effect::ReleaseFeature(feature)
            }
            Route::Home => Effect::Quit,
        },
        Action::Navigate(route) => {
            if let Route::Feature(feature) = &route {
                app.status_message = format!("{feature} ready");
            }
            app.pending_feature = None;
            if app.screen != route {
                let previous = std::mem::replace(&mut app.screen, route);
                app.history.push(previous);
            }
            Effect::None
        }
        Action::NavigateHome => {
            if let Some(feature) = app.pending_feature.take() {
                app.status_message = format!("Could not open {feature}");
            }
            app.screen = Route::Home;
            app.history.clear();
            Effect::None
        }
        Action::StatusChanged(status) => {
            app.load_status = status;
            Effect::None
        }
        Action::ActiveModuleChanged(module) => {
            app.active_module = module;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
