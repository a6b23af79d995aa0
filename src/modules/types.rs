use std::fmt;
use std::io;
use std::time::Duration;

/// Lifecycle phase of a feature module.
///
/// `Loading` and `Unloading` are transient. `Success` and `Unloaded` are the
/// terminal outcomes of a load and an unload; `Failed`, `Crashed` and `Error`
/// are terminal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    Loading,
    Unloading,
    Unloaded,
    Success,
    Failed,
    Crashed,
    Error,
}

impl LoadStatus {
    pub fn is_transient(self) -> bool {
        matches!(self, LoadStatus::Loading | LoadStatus::Unloading)
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            LoadStatus::Failed | LoadStatus::Crashed | LoadStatus::Error
        )
    }

    /// Short label for status bars and logs.
    pub fn label(self) -> &'static str {
        match self {
            LoadStatus::Loading => "Loading",
            LoadStatus::Unloading => "Unloading",
            LoadStatus::Unloaded => "Unloaded",
            LoadStatus::Success => "Ready",
            LoadStatus::Failed => "Failed",
            LoadStatus::Crashed => "Crashed",
            LoadStatus::Error => "Error",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The module currently occupying the active slot, with its last known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveModule {
    pub module_name: String,
    pub load_status: LoadStatus,
}

impl ActiveModule {
    pub fn new(module_name: impl Into<String>, load_status: LoadStatus) -> Self {
        Self {
            module_name: module_name.into(),
            load_status,
        }
    }
}

/// Faults raised by module activation and deactivation hooks.
///
/// The coordinator never propagates these; it folds them into a
/// [`LoadStatus`] through [`ModuleError::status`].
#[derive(Debug)]
pub enum ModuleError {
    /// Underlying I/O failed while acquiring or releasing resources.
    Io(io::Error),
    /// The hook did not finish within the allowed time.
    Timeout(Duration),
    /// The module was asked to do something its current state forbids.
    InvalidState(String),
    /// A resource the module depends on was never set up.
    MissingReference(String),
    /// Anything else, including panics caught at the hook boundary.
    Other(String),
}

impl ModuleError {
    pub fn status(&self) -> LoadStatus {
        match self {
            ModuleError::Io(_) | ModuleError::Timeout(_) => LoadStatus::Failed,
            ModuleError::InvalidState(_) => LoadStatus::Error,
            ModuleError::MissingReference(_) | ModuleError::Other(_) => LoadStatus::Crashed,
        }
    }
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::Io(e) => write!(f, "I/O error: {e}"),
            ModuleError::Timeout(limit) => write!(f, "timed out after {}ms", limit.as_millis()),
            ModuleError::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            ModuleError::MissingReference(msg) => write!(f, "missing reference: {msg}"),
            ModuleError::Other(msg) => write!(f, "unexpected fault: {msg}"),
        }
    }
}

impl std::error::Error for ModuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModuleError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ModuleError {
    fn from(e: io::Error) -> Self {
        ModuleError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let io = ModuleError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.status(), LoadStatus::Failed);
        assert_eq!(
            ModuleError::Timeout(Duration::from_millis(10)).status(),
            LoadStatus::Failed
        );
        assert_eq!(
            ModuleError::InvalidState("twice".into()).status(),
            LoadStatus::Error
        );
        assert_eq!(
            ModuleError::MissingReference("engine".into()).status(),
            LoadStatus::Crashed
        );
        assert_eq!(ModuleError::Other("boom".into()).status(), LoadStatus::Crashed);
    }

    #[test]
    fn test_status_predicates() {
        assert!(LoadStatus::Loading.is_transient());
        assert!(LoadStatus::Unloading.is_transient());
        assert!(!LoadStatus::Success.is_transient());
        assert!(LoadStatus::Crashed.is_failure());
        assert!(!LoadStatus::Unloaded.is_failure());
    }

    #[test]
    fn test_timeout_display() {
        let e = ModuleError::Timeout(Duration::from_millis(250));
        assert_eq!(e.to_string(), "timed out after 250ms");
    }
}
