//! # Navigation
//!
//! Turns "the user asked for feature X" into exactly one navigation
//! outcome: the feature's screen once its module is loaded, or the home
//! screen when that cannot happen.
//!
//! ```text
//! handle_feature_request(feature)
//!   ├─ unmapped                      ──▶ home
//!   ├─ module active && Success      ──▶ feature screen
//!   └─ otherwise ── load (≤ N attempts) ─┬─ Success ──▶ feature screen
//!                                        └─ gave up ──▶ home
//! ```
//!
//! Navigation itself is delegated to a [`Navigator`]; this module never
//! knows which UI is on the other side.

mod app_navigation;
mod route;

pub use app_navigation::{AppNavigation, RequestOutcome, RetryPolicy};
pub use route::{FEATURE_ROUTE_PREFIX, HOME_ROUTE, Route};

/// Sink for navigation commands issued by [`AppNavigation`].
///
/// Calls are made while the orchestrator holds its navigation gate, so an
/// implementation must not call back into the `AppNavigation` that owns it.
pub trait Navigator: Send + Sync {
    /// Show the destination named by `route`.
    fn navigate_to(&self, route: &str);

    /// Show the home screen and drop the back stack.
    fn navigate_home_clearing_history(&self);
}
