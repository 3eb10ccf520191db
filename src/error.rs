//! Error types for index provisioning

use crate::store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Result type for provisioning operations
pub type ProvisionResult<T> = std::result::Result<T, ProvisionError>;

/// Errors that can occur while provisioning a search index
///
/// All variants are terminal for the calling operation; the library never
/// retries above the polling loops. Transient store errors inside a loop
/// are swallowed and retried until the deadline, so they never appear
/// here directly.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Bulk insert failed before provisioning started
    #[error("bulk insert into collection {collection} failed: {source}")]
    InsertFailed {
        collection: String,
        #[source]
        source: StoreError,
    },

    /// The store rejected the index-create call
    #[error("failed to create search index {index}: {source}")]
    CreateFailed {
        index: String,
        #[source]
        source: StoreError,
    },

    /// The index never reported READY within the budget
    #[error("search index {index} was not ready within {}ms", .waited.as_millis())]
    ReadyTimeout { index: String, waited: Duration },

    /// The index was READY but the expected document count never became
    /// visible within the remaining budget
    ///
    /// `visible` is a best-effort diagnostic count, 0 if the diagnostic
    /// query itself failed.
    #[error(
        "only {visible} of {expected} documents were visible in search index {index} after {}ms",
        .waited.as_millis()
    )]
    PropagationTimeout {
        index: String,
        visible: u64,
        expected: u64,
        waited: Duration,
    },
}
