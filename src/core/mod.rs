//! # Core Application Logic
//!
//! Shell state and configuration. It knows nothing about any specific UI
//! technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Feature mapping      │
//!                    │  • Config               │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │ Navigation │
//!             │  Adapter   │◀─────────│ + Modules  │
//!             │ (ratatui)  │  routes  │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all shell state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`mapping`]: Feature → module lookup
//! - [`config`]: Config file loading and resolution

pub mod action;
pub mod config;
pub mod mapping;
pub mod state;
