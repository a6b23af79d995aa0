//! # TUI Components
//!
//! Stateless, props-based components. Each receives everything it shows
//! as struct fields and renders into the area it is given.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs       (Module status + status message)
//! ├── home.rs            (Banner + tool buttons)
//! └── feature_screen.rs  (Per-tool placeholder screen)
//! ```

pub mod feature_screen;
pub mod home;
pub mod title_bar;

pub use feature_screen::FeatureScreen;
pub use home::HomeScreen;
pub use title_bar::TitleBar;
