//! Index provisioning and propagation waiting
//!
//! Both wait stages here run the same bounded state machine:
//!
//! ```text
//! PENDING --(poll: not ready, time remains)--> PENDING
//! PENDING --(poll: ready)-----------------> READY      (success)
//! PENDING --(time exhausted)--------------> TIMED_OUT  (failure)
//! ```
//!
//! The deadline clock is `tokio::time::Instant`, so the whole protocol can
//! be driven deterministically under tokio's paused test clock.

use crate::config::ProvisionerConfig;
use crate::error::{ProvisionError, ProvisionResult};
use crate::index::{IndexState, SearchIndexSpec};
use crate::query::SearchIndex;
use crate::store::{Document, SearchStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Provisions search indexes and blocks until they are queryable
///
/// One logical flow per call: create, poll until READY, then poll the
/// visible document count until it reaches the expected count. A single
/// caller-supplied budget bounds the whole pipeline; each stage receives
/// whatever the previous stages left over, never a fresh timer.
///
/// Independent flows over different collections or indexes may run
/// concurrently against one shared store handle; the provisioner holds no
/// mutable state of its own.
pub struct IndexProvisioner {
    store: Arc<dyn SearchStore>,
    config: ProvisionerConfig,
}

impl IndexProvisioner {
    /// Create a provisioner over a store handle
    pub fn new(store: Arc<dyn SearchStore>, config: ProvisionerConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration
    pub fn config(&self) -> &ProvisionerConfig {
        &self.config
    }

    /// Bulk-insert documents, provision the index, and wait for every
    /// inserted document to become visible, under the configured default
    /// budget
    ///
    /// See [`IndexProvisioner::seed_within`].
    pub async fn seed(
        &self,
        collection: &str,
        documents: &[Document],
        spec: &SearchIndexSpec,
    ) -> ProvisionResult<SearchIndex> {
        self.seed_within(collection, documents, spec, self.config.budget())
            .await
    }

    /// Bulk-insert documents, provision the index, and wait for every
    /// inserted document to become visible, within `budget`
    ///
    /// The budget starts before the insert and is consumed sequentially
    /// across insert, provisioning, and propagation waiting. On success
    /// the returned [`SearchIndex`] is safe to query.
    pub async fn seed_within(
        &self,
        collection: &str,
        documents: &[Document],
        spec: &SearchIndexSpec,
        budget: Duration,
    ) -> ProvisionResult<SearchIndex> {
        let started = Instant::now();

        let inserted = self
            .store
            .insert_documents(collection, documents)
            .await
            .map_err(|source| ProvisionError::InsertFailed {
                collection: collection.to_string(),
                source,
            })?;
        debug!(collection, inserted, "documents inserted");

        self.provision(collection, spec, budget.saturating_sub(started.elapsed()))
            .await?;

        let remaining = budget.saturating_sub(started.elapsed());
        self.await_propagation(collection, spec, inserted as u64, remaining)
            .await?;

        Ok(SearchIndex::new(
            Arc::clone(&self.store),
            collection,
            &spec.name,
        ))
    }

    /// Create the index and block until the store reports it READY
    ///
    /// A rejected create call fails immediately with
    /// [`ProvisionError::CreateFailed`]; creation is never retried. After
    /// that the status list is polled at the configured interval until
    /// the index is READY or `budget` runs out.
    pub async fn provision(
        &self,
        collection: &str,
        spec: &SearchIndexSpec,
        budget: Duration,
    ) -> ProvisionResult<()> {
        let started = Instant::now();

        self.store
            .create_search_index(collection, spec)
            .await
            .map_err(|source| ProvisionError::CreateFailed {
                index: spec.name.clone(),
                source,
            })?;

        self.await_ready(
            collection,
            &spec.name,
            budget.saturating_sub(started.elapsed()),
        )
        .await
    }

    async fn await_ready(
        &self,
        collection: &str,
        index: &str,
        budget: Duration,
    ) -> ProvisionResult<()> {
        let started = Instant::now();
        let deadline = started + budget;

        while Instant::now() < deadline {
            match self.store.list_search_indexes(collection).await {
                Ok(statuses) => {
                    let state = statuses
                        .iter()
                        .find(|status| status.name == index)
                        .map(|status| status.status);

                    if state.is_some_and(IndexState::is_ready) {
                        info!(
                            index,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "search index ready"
                        );
                        return Ok(());
                    }
                    debug!(index, ?state, "index not ready yet");
                }
                // Transient fetch errors count as "not ready yet".
                Err(err) => warn!(index, error = %err, "status fetch failed, retrying"),
            }

            pause_before_retry(deadline, self.config.poll_interval()).await;
        }

        Err(ProvisionError::ReadyTimeout {
            index: index.to_string(),
            waited: budget,
        })
    }

    /// Block until the index's visible document count reaches `expected`
    ///
    /// Even a READY index may not yet expose newly inserted documents to
    /// queries; this closes that gap deterministically instead of via a
    /// fixed sleep. Succeeds the moment the visible count first reaches
    /// or exceeds `expected` (tolerating concurrent inserts by other
    /// actors). On timeout, one best-effort diagnostic query reports how
    /// many documents actually were visible.
    pub async fn await_propagation(
        &self,
        collection: &str,
        spec: &SearchIndexSpec,
        expected: u64,
        budget: Duration,
    ) -> ProvisionResult<()> {
        let started = Instant::now();
        let deadline = started + budget;

        while Instant::now() < deadline {
            match self.store.indexed_document_count(collection, &spec.name).await {
                Ok(visible) if visible >= expected => {
                    info!(
                        index = %spec.name,
                        visible,
                        expected,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "documents propagated into index"
                    );
                    return Ok(());
                }
                Ok(visible) => debug!(index = %spec.name, visible, expected, "still propagating"),
                Err(err) => warn!(index = %spec.name, error = %err, "count query failed, retrying"),
            }

            pause_before_retry(deadline, self.config.poll_interval()).await;
        }

        let waited = started.elapsed();
        let visible = self
            .store
            .matching_document_count(collection, &spec.name)
            .await
            .unwrap_or(0);

        Err(ProvisionError::PropagationTimeout {
            index: spec.name.clone(),
            visible,
            expected,
            waited,
        })
    }
}

/// Sleep one poll interval, truncated to the remaining budget so the loop
/// re-checks the deadline exactly when it expires
async fn pause_before_retry(deadline: Instant, interval: Duration) {
    let remaining = deadline.saturating_duration_since(Instant::now());
    sleep(interval.min(remaining)).await;
}
