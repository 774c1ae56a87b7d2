use thiserror::Error;
use tracing::{error, warn};

/// Domain-specific errors for the bundler
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Module not found: {path}")]
    ModuleMissing { path: String },

    #[error("Failed to read module '{name}' from {path}: {source}")]
    ModuleRead {
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse bundle config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BundleError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the build should continue.
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
