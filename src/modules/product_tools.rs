//! # Product Tools (Module01)
//!
//! The tools section of the product: OCR, PDF and Word. Activating the
//! module initializes each tool in turn; deactivating releases them.
//!
//! ```text
//! activate()   ──▶  OCR ──▶ PDF ──▶ Word   (initialize)
//! deactivate() ──▶  OCR ──▶ PDF ──▶ Word   (release)
//! ```
//!
//! The tools themselves carry no processing logic yet; a slot only tracks
//! whether the tool has been brought up.

use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use log::{debug, info};

use super::registry::FeatureModule;
use super::types::ModuleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ocr,
    Pdf,
    Word,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Ocr, Tool::Pdf, Tool::Word];

    /// Feature identifier the UI uses for this tool.
    pub fn feature(self) -> &'static str {
        match self {
            Tool::Ocr => "OCR",
            Tool::Pdf => "PDF",
            Tool::Word => "WORD",
        }
    }

    pub fn from_feature(feature: &str) -> Option<Tool> {
        Tool::ALL.into_iter().find(|tool| tool.feature() == feature)
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::Ocr => "Capture or pick an image and extract its text.",
            Tool::Pdf => "Open, browse and annotate PDF documents.",
            Tool::Word => "Create and edit Word documents.",
        }
    }

    fn index(self) -> usize {
        match self {
            Tool::Ocr => 0,
            Tool::Pdf => 1,
            Tool::Word => 2,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feature())
    }
}

#[derive(Default)]
pub struct ProductTools {
    ready: Mutex<[bool; 3]>,
}

impl ProductTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self, tool: Tool) -> bool {
        self.ready
            .lock()
            .map(|ready| ready[tool.index()])
            .unwrap_or(false)
    }

    fn slots(&self) -> Result<std::sync::MutexGuard<'_, [bool; 3]>, ModuleError> {
        self.ready
            .lock()
            .map_err(|_| ModuleError::Other("tool slots poisoned".into()))
    }
}

#[async_trait]
impl FeatureModule for ProductTools {
    async fn activate(&self) -> Result<(), ModuleError> {
        info!("Initializing Module01 (OCR, PDF, Word tools)");
        let mut ready = self.slots()?;
        if let Some(tool) = Tool::ALL.into_iter().find(|t| ready[t.index()]) {
            return Err(ModuleError::InvalidState(format!(
                "{tool} tool is already initialized"
            )));
        }
        for tool in Tool::ALL {
            debug!("Initializing {tool} tool");
            ready[tool.index()] = true;
        }
        Ok(())
    }

    async fn deactivate(&self) -> Result<(), ModuleError> {
        info!("Cleaning up Module01 (OCR, PDF, Word tools)");
        let mut ready = self.slots()?;
        for tool in Tool::ALL {
            if ready[tool.index()] {
                debug!("Releasing {tool} tool");
                ready[tool.index()] = false;
            }
        }
        Ok(())
    }
}
