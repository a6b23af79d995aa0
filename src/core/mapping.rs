//! # Feature → Module Mapping
//!
//! Resolves a UI-facing feature ("OCR", "PDF", "WORD") to the module that
//! backs it. Built once at startup and read-only afterwards.
//!
//! In the shipped product all three tools live in "Module01". The table can
//! be overridden from the `[features]` section of the config file.

use std::collections::BTreeMap;

pub const DEFAULT_MAPPING: &[(&str, &str)] = &[
    ("OCR", "Module01"),
    ("PDF", "Module01"),
    ("WORD", "Module01"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureModuleMap {
    entries: BTreeMap<String, String>,
}

impl Default for FeatureModuleMap {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_MAPPING.iter().copied())
    }
}

impl FeatureModuleMap {
    pub fn from_pairs<F, M>(pairs: impl IntoIterator<Item = (F, M)>) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(feature, module)| (feature.into(), module.into()))
                .collect(),
        }
    }

    /// Module backing `feature`, or `None` if the feature is unmapped.
    /// Feature identifiers are matched exactly.
    pub fn module_for(&self, feature: &str) -> Option<&str> {
        self.entries.get(feature).map(String::as_str)
    }

    /// Mapped features in a stable order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
