//! EduMilestone app shell: a feature-module coordinator, a retrying
//! navigation orchestrator, and the terminal front end that drives them.

pub mod core;
pub mod modules;
pub mod navigation;
pub mod tui;

#[cfg(test)]
pub mod test_support;
