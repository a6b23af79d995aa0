//! # Feature Modules
//!
//! Logical feature units and the coordinator that activates them one at a
//! time. A module here is an activation flag over a group of features, not
//! dynamically loaded code.
//!
//! - [`types`]: `LoadStatus`, `ActiveModule`, `ModuleError`
//! - [`registry`]: the `FeatureModule` trait and the identifier → module table
//! - [`manager`]: `ModuleManager`, the load/unload coordinator
//! - [`product_tools`]: "Module01", the OCR/PDF/Word tools bundle

pub mod manager;
pub mod product_tools;
pub mod registry;
pub mod types;

pub use manager::{DEFAULT_HOOK_TIMEOUT, ModuleManager};
pub use product_tools::{ProductTools, Tool};
pub use registry::{FeatureModule, ModuleRegistry, PlaceholderModule};
pub use types::{ActiveModule, LoadStatus, ModuleError};
