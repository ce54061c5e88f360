//! Error types for an import run.
//!
//! Per-row validation failures are not errors at this level: they are
//! collected as `ErrorEntry` values by the listener. Everything here aborts
//! the run.

use thiserror::Error;

/// Fatal failure of an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The decoded sheet or a record does not have the shape the schema expects.
    #[error("schema mismatch on field '{field}': {message}")]
    SchemaMismatch { field: String, message: String },

    /// The schema definition itself is unusable (bad regex, empty range, bad JSON).
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// The persistence sink rejected a batch.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// An operation was called out of order (e.g. `process` after `finish`).
    #[error("invalid listener state: {0}")]
    InvalidState(&'static str),

    /// The upstream decoder could not read the source.
    #[error("failed to decode input: {0}")]
    Decode(String),
}

impl ImportError {
    pub fn schema_mismatch(field: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::SchemaMismatch {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True when the header or record shape does not match the schema.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, ImportError::SchemaMismatch { .. })
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Decode(err.to_string())
    }
}

/// A batch could not be written by the persistence sink.
#[derive(Debug, Error)]
#[error("failed to persist batch of {rows} rows: {message}")]
pub struct PersistenceError {
    /// Number of rows in the rejected batch
    pub rows: usize,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PersistenceError {
    pub fn new(rows: usize, message: impl Into<String>) -> Self {
        Self {
            rows,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(rows: usize, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            rows,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_schema_mismatch_display() {
        let err = ImportError::schema_mismatch("age", "missing header: Age");
        assert_eq!(
            err.to_string(),
            "schema mismatch on field 'age': missing header: Age"
        );
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_persistence_error_is_transparent() {
        let err: ImportError = PersistenceError::new(3, "disk full").into();
        assert_eq!(err.to_string(), "failed to persist batch of 3 rows: disk full");
        assert!(!err.is_schema_mismatch());
    }

    #[test]
    fn test_persistence_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "broken pipe");
        let err = PersistenceError::with_source(10, io);
        assert_eq!(err.rows, 10);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("broken pipe"));
    }

    #[test]
    fn test_invalid_state_display() {
        let err = ImportError::InvalidState("finish called twice");
        assert!(err.to_string().contains("finish called twice"));
    }
}
