//! Food store error types.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, querying or persisting the food store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing a data file.
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A data file exists but is not valid JSON of the expected shape.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Client input is missing a required field.
    #[error("{0}")]
    Validation(String),

    /// The food database contains the same id more than once.
    #[error("Duplicate food id in database: {0}")]
    DuplicateId(String),

    /// No unused id is left for a prefix.
    #[error("No ids left for prefix {0}")]
    IdsExhausted(&'static str),

    /// Refusing to initialize over an existing data file.
    #[error("Data file already exists: {}", .0.display())]
    AlreadyInitialized(PathBuf),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by client input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_io() {
        let err = StoreError::io(
            "/tmp/food_database.json",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/food_database.json"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_validation_message_passthrough() {
        let err = StoreError::Validation("Missing required fields".to_string());
        assert_eq!(err.to_string(), "Missing required fields");
        assert!(err.is_validation());
        assert!(!StoreError::DuplicateId("GEN0001".to_string()).is_validation());
    }
}
