//! Free-text search against a provisioned index

use crate::store::{Document, SearchStore, StoreResult};
use std::sync::Arc;
use tracing::debug;

/// Handle to a queryable search index
///
/// Returned by [`IndexProvisioner::seed`](crate::IndexProvisioner::seed)
/// once provisioning and propagation have completed, at which point
/// queries are safe. The handle can also be bound directly with
/// [`SearchIndex::new`]; querying before propagation has finished is not
/// an error, it just yields stale or incomplete results.
#[derive(Clone)]
pub struct SearchIndex {
    store: Arc<dyn SearchStore>,
    collection: String,
    index: String,
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex")
            .field("collection", &self.collection)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl SearchIndex {
    /// Bind a handle to an existing index without provisioning it
    pub fn new(
        store: Arc<dyn SearchStore>,
        collection: impl Into<String>,
        index: impl Into<String>,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            index: index.into(),
        }
    }

    /// The collection this index is built over
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The index name
    pub fn name(&self) -> &str {
        &self.index
    }

    /// Free-text query across all document fields
    ///
    /// Matches the query string against every field (wildcard field path)
    /// and returns documents in store relevance order, unpaginated. No
    /// match is not an error: the result is simply empty.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Document>> {
        let hits = self
            .store
            .search_text(&self.collection, &self.index, query)
            .await?;

        debug!(index = %self.index, query, hits = hits.len(), "search executed");
        Ok(hits)
    }
}
