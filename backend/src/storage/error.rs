//! Error taxonomy for the storage layer.

use thiserror::Error;

/// Failures surfaced by the storage engine adapter.
///
/// Every variant carries a human-readable message derived from the
/// underlying engine error. Nothing is retried at this layer; every
/// operation propagates failure to its caller.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database could not be opened, or its schema version is not
    /// one this build understands.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint rejected an insert.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The engine failed on the write path.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// The engine failed on the read path, or a stored row could not be
    /// decoded.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// An update targeted a row that does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Classify a write-path engine error. Unique-index violations get
    /// their own variant so callers can tell duplicates apart from
    /// genuine engine failures.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.kind() == sqlx::error::ErrorKind::UniqueViolation {
                return StorageError::ConstraintViolation(db_err.message().to_string());
            }
        }
        StorageError::WriteFailed(err.to_string())
    }

    pub(crate) fn from_read(err: sqlx::Error) -> Self {
        StorageError::ReadFailed(err.to_string())
    }

    pub(crate) fn from_open(err: sqlx::Error) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}
