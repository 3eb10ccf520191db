//! In-memory search store (for tests and local development)

use crate::index::{IndexState, IndexStatus, SearchIndexSpec};
use crate::store::{Document, SearchStore, StoreError, StoreResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Asynchrony model for [`InMemoryStore`]
///
/// Real stores build indexes and propagate documents asynchronously; these
/// knobs reproduce that delay in terms of observed polls, which keeps the
/// model deterministic regardless of wall-clock timing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreBehavior {
    /// Number of status polls an index reports a non-ready state for
    /// before flipping to READY
    pub status_polls_until_ready: u32,

    /// Number of count polls inserted documents stay invisible for
    pub count_polls_until_visible: u32,
}

struct IndexRecord {
    spec: SearchIndexSpec,
    status_polls: AtomicU32,
    count_polls: AtomicU32,
}

#[derive(Default)]
struct CollectionState {
    documents: Vec<Document>,
    indexes: Vec<IndexRecord>,
}

/// In-memory document store
///
/// Reference [`SearchStore`] implementation. Collections auto-create on
/// first insert, search is a case-insensitive whole-token match over every
/// string value in a document (recursing through arrays and nested
/// objects), and results come back in insertion order.
pub struct InMemoryStore {
    collections: DashMap<String, CollectionState>,
    behavior: StoreBehavior,
}

impl InMemoryStore {
    /// Store with no artificial delays: indexes are READY on the first
    /// poll and documents are visible immediately
    pub fn new() -> Self {
        Self::with_behavior(StoreBehavior::default())
    }

    /// Store with the given asynchrony model
    pub fn with_behavior(behavior: StoreBehavior) -> Self {
        Self {
            collections: DashMap::new(),
            behavior,
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchStore for InMemoryStore {
    async fn insert_documents(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> StoreResult<usize> {
        let mut state = self.collections.entry(collection.to_string()).or_default();
        state.documents.extend_from_slice(documents);

        tracing::debug!(collection, inserted = documents.len(), "documents inserted");
        Ok(documents.len())
    }

    async fn create_search_index(
        &self,
        collection: &str,
        spec: &SearchIndexSpec,
    ) -> StoreResult<()> {
        if spec.name.is_empty() {
            return Err(StoreError::Rejected(
                "index name must not be empty".to_string(),
            ));
        }

        let mut state = self.collections.entry(collection.to_string()).or_default();
        if state.indexes.iter().any(|r| r.spec.name == spec.name) {
            return Err(StoreError::Rejected(format!(
                "search index {} already exists on collection {}",
                spec.name, collection
            )));
        }

        state.indexes.push(IndexRecord {
            spec: spec.clone(),
            status_polls: AtomicU32::new(0),
            count_polls: AtomicU32::new(0),
        });

        tracing::debug!(collection, index = %spec.name, "search index created");
        Ok(())
    }

    async fn list_search_indexes(&self, collection: &str) -> StoreResult<Vec<IndexStatus>> {
        let Some(state) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(state
            .indexes
            .iter()
            .map(|record| {
                let seen = record.status_polls.fetch_add(1, Ordering::SeqCst);
                let status = if seen >= self.behavior.status_polls_until_ready {
                    IndexState::Ready
                } else {
                    IndexState::Building
                };
                IndexStatus {
                    name: record.spec.name.clone(),
                    status,
                }
            })
            .collect())
    }

    async fn indexed_document_count(&self, collection: &str, index: &str) -> StoreResult<u64> {
        let state = self
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownIndex(index.to_string()))?;
        let record = state
            .indexes
            .iter()
            .find(|r| r.spec.name == index)
            .ok_or_else(|| StoreError::UnknownIndex(index.to_string()))?;

        let seen = record.count_polls.fetch_add(1, Ordering::SeqCst);
        if seen >= self.behavior.count_polls_until_visible {
            Ok(state.documents.len() as u64)
        } else {
            Ok(0)
        }
    }

    async fn matching_document_count(&self, collection: &str, index: &str) -> StoreResult<u64> {
        let state = self
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownIndex(index.to_string()))?;
        let record = state
            .indexes
            .iter()
            .find(|r| r.spec.name == index)
            .ok_or_else(|| StoreError::UnknownIndex(index.to_string()))?;

        // Does not advance the poll counter: this is the diagnostic shape,
        // it reports whatever is visible right now.
        if record.count_polls.load(Ordering::SeqCst) >= self.behavior.count_polls_until_visible {
            Ok(state.documents.len() as u64)
        } else {
            Ok(0)
        }
    }

    async fn search_text(
        &self,
        collection: &str,
        index: &str,
        query: &str,
    ) -> StoreResult<Vec<Document>> {
        let state = self
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownIndex(index.to_string()))?;
        let record = state
            .indexes
            .iter()
            .find(|r| r.spec.name == index)
            .ok_or_else(|| StoreError::UnknownIndex(index.to_string()))?;

        if record.count_polls.load(Ordering::SeqCst) < self.behavior.count_polls_until_visible {
            return Ok(Vec::new());
        }

        Ok(state
            .documents
            .iter()
            .filter(|document| matches_text(document, query))
            .cloned()
            .collect())
    }
}

/// Whole-token, case-insensitive match of `query` against every string
/// value in the document
fn matches_text(document: &Document, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return false;
    }

    let mut texts = Vec::new();
    collect_text(document, &mut texts);

    texts.iter().any(|text| {
        text.split_whitespace().any(|token| {
            token
                .trim_matches(|c: char| c.is_ascii_punctuation() && c != '-')
                .to_lowercase()
                == needle
        })
    })
}

fn collect_text<'a>(value: &'a Document, out: &mut Vec<&'a str>) {
    match value {
        serde_json::Value::String(text) => out.push(text),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_text(item, out);
            }
        }
        serde_json::Value::Object(fields) => {
            for item in fields.values() {
                collect_text(item, out);
            }
        }
        _ => {}
    }
}
