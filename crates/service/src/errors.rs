use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the JSON document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("marshal failed: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("failed to unmarshal {}: {source}", path.display())]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Collapse a store-level `NotFound` into a service-level one naming the entity.
    pub fn from_store(entity: &str, err: StoreError) -> Self {
        if err.is_not_found() { Self::not_found(entity) } else { Self::Store(err) }
    }
}
