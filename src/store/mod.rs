//! Document store abstraction
//!
//! The document store is an external collaborator: this crate owns no
//! storage engine, wire protocol, or transport. [`SearchStore`] captures
//! the exact capability surface the provisioning protocol consumes, and
//! [`InMemoryStore`] is a reference implementation with a configurable
//! asynchrony model for tests and local development.

pub mod memory;

pub use memory::{InMemoryStore, StoreBehavior};

use crate::index::{IndexStatus, SearchIndexSpec};
use async_trait::async_trait;

/// A schemaless store document
pub type Document = serde_json::Value;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the document store
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store rejected the request outright (duplicate index name,
    /// malformed spec)
    #[error("request rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached or the connection dropped mid-call
    #[error("transport error: {0}")]
    Transport(String),

    /// The store accepted the query but failed to execute it
    #[error("query failed: {0}")]
    Query(String),

    /// The named search index does not exist on the collection
    #[error("no search index named {0}")]
    UnknownIndex(String),
}

/// Capability surface of a search-capable document store
///
/// Implementations are shared as `Arc<dyn SearchStore>`; independent
/// provisioning flows may run concurrently over one handle without
/// coordination. Connection lifecycle stays with the implementation.
///
/// The two count queries are deliberately distinct shapes: the cheap
/// count-aggregation used by the propagation loop, and the
/// filtered-search-then-count used as a diagnostic. Stores are not
/// required to return identical numbers from both for the same
/// underlying state.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Bulk-insert documents into a collection, returning the count inserted
    async fn insert_documents(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> StoreResult<usize>;

    /// Create a search index over a collection
    ///
    /// Fails with [`StoreError::Rejected`] on a name collision or a
    /// malformed spec.
    async fn create_search_index(
        &self,
        collection: &str,
        spec: &SearchIndexSpec,
    ) -> StoreResult<()>;

    /// List status snapshots for every search index on a collection
    async fn list_search_indexes(&self, collection: &str) -> StoreResult<Vec<IndexStatus>>;

    /// Count of documents currently visible to the index
    /// (count-aggregation shape, existence-filtered on the document id)
    async fn indexed_document_count(&self, collection: &str, index: &str) -> StoreResult<u64>;

    /// Count of documents matched by an index-scoped existence search
    /// (filtered-search shape; diagnostic use)
    async fn matching_document_count(&self, collection: &str, index: &str) -> StoreResult<u64>;

    /// Free-text query across all document fields (wildcard field path),
    /// returning documents in store relevance order
    async fn search_text(
        &self,
        collection: &str,
        index: &str,
        query: &str,
    ) -> StoreResult<Vec<Document>>;
}
