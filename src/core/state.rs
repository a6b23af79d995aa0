//! # Application State
//!
//! Everything the shell shows, in one place. No terminal types here;
//! presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── features: Vec<String>              // tool buttons on the home screen
//! ├── selected: usize                    // highlighted button
//! ├── screen: Route                      // what is on screen now
//! ├── history: Vec<Route>                // back stack
//! ├── load_status: LoadStatus            // last status from the coordinator
//! ├── active_module: Option<ActiveModule>
//! ├── pending_feature: Option<String>    // request in flight
//! └── status_message: String             // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::modules::{ActiveModule, LoadStatus};
use crate::navigation::Route;

pub struct App {
    pub features: Vec<String>,
    pub selected: usize,
    pub screen: Route,
    pub history: Vec<Route>,
    pub load_status: LoadStatus,
    pub active_module: Option<ActiveModule>,
    pub pending_feature: Option<String>,
    pub status_message: String,
}

impl App {
    pub fn new(features: Vec<String>, load_status: LoadStatus) -> Self {
        Self {
            features,
            selected: 0,
            screen: Route::Home,
            history: Vec::new(),
            load_status,
            active_module: None,
            pending_feature: None,
            status_message: String::from("Welcome to EduMilestone!"),
        }
    }

    pub fn selected_feature(&self) -> Option<&str> {
        self.features.get(self.selected).map(String::as_str)
    }

    pub fn on_home(&self) -> bool {
        self.screen == Route::Home
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_new_defaults() {
        let app = App::new(vec!["OCR".into(), "PDF".into()], LoadStatus::Failed);
        assert_eq!(app.status_message, "Welcome to EduMilestone!");
        assert!(app.on_home());
        assert_eq!(app.selected_feature(), Some("OCR"));
        assert!(app.pending_feature.is_none());
    }

    #[test]
    fn test_selected_feature_empty() {
        let app = App::new(Vec::new(), LoadStatus::Failed);
        assert_eq!(app.selected_feature(), None);
    }
}
