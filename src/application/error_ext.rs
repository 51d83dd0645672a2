//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Map a failed write-side operation to `IoFailure`.
    ///
    /// # Example
    /// ```ignore
    /// fs.write_atomic(&path, &xml)
    ///     .with_path_context("plan file", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Map a failed read-side operation to `InputFailure`.
    fn with_input_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::IoFailure {
            context: format!("{} {}", action, path.display()),
            source: e,
        })
    }

    fn with_input_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::InputFailure {
            context: format!("{} {}", action, path.display()),
            source: e,
        })
    }
}
