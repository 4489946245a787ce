//! Error types for store operations.

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations.
///
/// Absence of optional data is modelled as `Ok(None)` by the query methods;
/// these variants cover the store itself failing.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query execution failed.
    #[error("query error: {0}")]
    Query(String),

    /// A referenced entity does not exist in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal/unexpected store error.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
