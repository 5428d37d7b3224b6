use thiserror::Error;

/// Failures of the storage backend underneath the Store.
///
/// "Not found" is never one of these: lookups return `Option` and
/// deletions return `bool`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to connect to storage: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("Storage query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Failed to serialize collection '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
