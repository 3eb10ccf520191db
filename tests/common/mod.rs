//! Shared store doubles for the provisioning tests
//!
//! Each double implements [`SearchStore`] with one deliberately broken or
//! scripted behavior, so the polling state machine can be pinned down
//! deterministically under tokio's paused clock.

use async_trait::async_trait;
use search_provisioner::{
    Document, IndexState, IndexStatus, InMemoryStore, SearchIndexSpec, SearchStore, StoreError,
    StoreResult,
};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

/// Install a test subscriber so swallowed store errors show up with
/// `RUST_LOG=search_provisioner=debug`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Store whose indexes never leave the BUILDING state
#[derive(Default)]
pub struct NeverReadyStore {
    index_names: Mutex<Vec<String>>,
    pub status_polls: AtomicU32,
}

impl NeverReadyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SearchStore for NeverReadyStore {
    async fn insert_documents(
        &self,
        _collection: &str,
        documents: &[Document],
    ) -> StoreResult<usize> {
        Ok(documents.len())
    }

    async fn create_search_index(
        &self,
        _collection: &str,
        spec: &SearchIndexSpec,
    ) -> StoreResult<()> {
        self.index_names.lock().unwrap().push(spec.name.clone());
        Ok(())
    }

    async fn list_search_indexes(&self, _collection: &str) -> StoreResult<Vec<IndexStatus>> {
        self.status_polls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .index_names
            .lock()
            .unwrap()
            .iter()
            .map(|name| IndexStatus {
                name: name.clone(),
                status: IndexState::Building,
            })
            .collect())
    }

    async fn indexed_document_count(&self, _collection: &str, _index: &str) -> StoreResult<u64> {
        Ok(0)
    }

    async fn matching_document_count(&self, _collection: &str, _index: &str) -> StoreResult<u64> {
        Ok(0)
    }

    async fn search_text(
        &self,
        _collection: &str,
        _index: &str,
        _query: &str,
    ) -> StoreResult<Vec<Document>> {
        Ok(Vec::new())
    }
}

/// Store whose visible count climbs by one on every count poll, capped at
/// `ceiling`
pub struct RampingCountStore {
    ceiling: u64,
    pub count_polls: AtomicU64,
}

impl RampingCountStore {
    pub fn new(ceiling: u64) -> Self {
        Self {
            ceiling,
            count_polls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl SearchStore for RampingCountStore {
    async fn insert_documents(
        &self,
        _collection: &str,
        documents: &[Document],
    ) -> StoreResult<usize> {
        Ok(documents.len())
    }

    async fn create_search_index(
        &self,
        _collection: &str,
        _spec: &SearchIndexSpec,
    ) -> StoreResult<()> {
        Ok(())
    }

    async fn list_search_indexes(&self, _collection: &str) -> StoreResult<Vec<IndexStatus>> {
        Ok(Vec::new())
    }

    async fn indexed_document_count(&self, _collection: &str, _index: &str) -> StoreResult<u64> {
        let n = self.count_polls.fetch_add(1, Ordering::SeqCst);
        Ok(n.min(self.ceiling))
    }

    async fn matching_document_count(&self, _collection: &str, _index: &str) -> StoreResult<u64> {
        Ok(self.count_polls.load(Ordering::SeqCst).min(self.ceiling))
    }

    async fn search_text(
        &self,
        _collection: &str,
        _index: &str,
        _query: &str,
    ) -> StoreResult<Vec<Document>> {
        Ok(Vec::new())
    }
}

/// Store that fails the first `failures` status and count queries with a
/// transport error, then behaves like the wrapped in-memory store
pub struct FlakyStore {
    inner: InMemoryStore,
    pub failures_remaining: AtomicU32,
}

impl FlakyStore {
    pub fn new(failures: u32) -> Self {
        Self {
            inner: InMemoryStore::new(),
            failures_remaining: AtomicU32::new(failures),
        }
    }

    fn take_failure(&self) -> bool {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return true;
        }
        false
    }
}

#[async_trait]
impl SearchStore for FlakyStore {
    async fn insert_documents(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> StoreResult<usize> {
        self.inner.insert_documents(collection, documents).await
    }

    async fn create_search_index(
        &self,
        collection: &str,
        spec: &SearchIndexSpec,
    ) -> StoreResult<()> {
        self.inner.create_search_index(collection, spec).await
    }

    async fn list_search_indexes(&self, collection: &str) -> StoreResult<Vec<IndexStatus>> {
        if self.take_failure() {
            return Err(StoreError::Transport("connection reset".to_string()));
        }
        self.inner.list_search_indexes(collection).await
    }

    async fn indexed_document_count(&self, collection: &str, index: &str) -> StoreResult<u64> {
        if self.take_failure() {
            return Err(StoreError::Transport("connection reset".to_string()));
        }
        self.inner.indexed_document_count(collection, index).await
    }

    async fn matching_document_count(&self, collection: &str, index: &str) -> StoreResult<u64> {
        self.inner.matching_document_count(collection, index).await
    }

    async fn search_text(
        &self,
        collection: &str,
        index: &str,
        query: &str,
    ) -> StoreResult<Vec<Document>> {
        self.inner.search_text(collection, index, query).await
    }
}

/// Store whose two count-query shapes disagree: the primary count is
/// pinned, the diagnostic either answers or errors
pub struct SplitCountStore {
    primary: u64,
    diagnostic: Option<u64>,
    index_names: Mutex<Vec<String>>,
}

impl SplitCountStore {
    pub fn new(primary: u64, diagnostic: Option<u64>) -> Self {
        Self {
            primary,
            diagnostic,
            index_names: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchStore for SplitCountStore {
    async fn insert_documents(
        &self,
        _collection: &str,
        documents: &[Document],
    ) -> StoreResult<usize> {
        Ok(documents.len())
    }

    async fn create_search_index(
        &self,
        _collection: &str,
        spec: &SearchIndexSpec,
    ) -> StoreResult<()> {
        self.index_names.lock().unwrap().push(spec.name.clone());
        Ok(())
    }

    async fn list_search_indexes(&self, _collection: &str) -> StoreResult<Vec<IndexStatus>> {
        Ok(self
            .index_names
            .lock()
            .unwrap()
            .iter()
            .map(|name| IndexStatus {
                name: name.clone(),
                status: IndexState::Ready,
            })
            .collect())
    }

    async fn indexed_document_count(&self, _collection: &str, _index: &str) -> StoreResult<u64> {
        Ok(self.primary)
    }

    async fn matching_document_count(&self, _collection: &str, _index: &str) -> StoreResult<u64> {
        self.diagnostic
            .ok_or_else(|| StoreError::Transport("connection reset".to_string()))
    }

    async fn search_text(
        &self,
        _collection: &str,
        _index: &str,
        _query: &str,
    ) -> StoreResult<Vec<Document>> {
        Ok(Vec::new())
    }
}
