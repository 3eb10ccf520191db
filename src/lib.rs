//! Deadline-bounded provisioning for full-text search indexes
//!
//! This crate takes a document collection living in an external,
//! search-capable document store, provisions a named full-text index over
//! it, and blocks until the index is actually queryable:
//!
//! - **Index provisioning**: create the index, then poll its status until
//!   the store reports `READY`
//! - **Propagation waiting**: after documents are loaded, poll the index's
//!   visible document count until it reaches the expected count
//! - **Single deadline**: one caller-supplied budget is consumed
//!   sequentially across both wait stages, never two independent timers
//! - **Search**: a free-text, wildcard-path query against the ready index
//!
//! The store itself is an external collaborator behind the
//! [`SearchStore`] trait; an in-memory implementation with a configurable
//! asynchrony model ships for tests and local development.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │              IndexProvisioner                    │
//! ├──────────────────────────────────────────────────┤
//! │  seed()        insert → provision → propagation  │
//! │  provision()   create index, poll until READY    │
//! │  await_propagation()  poll count until expected  │
//! └──────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────────┐
//! │           SearchStore (trait)                    │
//! ├──────────────────────────────────────────────────┤
//! │  insert_documents      list_search_indexes       │
//! │  create_search_index   indexed_document_count    │
//! │  search_text           matching_document_count   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Both wait stages run the same bounded state machine: poll, sleep a
//! fixed interval, re-check the deadline. Transient store errors inside a
//! loop are swallowed and retried until the deadline; only the terminal
//! timeout is surfaced.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use search_provisioner::{IndexProvisioner, InMemoryStore, ProvisionerConfig, SearchIndexSpec};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryStore::new());
//!     let provisioner = IndexProvisioner::new(store, ProvisionerConfig::default());
//!
//!     let movies = vec![
//!         json!({ "_id": "1", "title": "Inception", "genres": ["Action", "Sci-Fi"] }),
//!         json!({ "_id": "2", "title": "The Dark Knight", "genres": ["Action", "Crime"] }),
//!     ];
//!
//!     let spec = SearchIndexSpec::dynamic("movies_search");
//!     let index = provisioner.seed("movies", &movies, &spec).await?;
//!
//!     let hits = index.search("Inception").await?;
//!     println!("found {} movies", hits.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod provisioner;
pub mod query;
pub mod store;

pub use config::{ProvisionerConfig, ProvisionerConfigBuilder};
pub use error::{ProvisionError, ProvisionResult};
pub use index::{IndexState, IndexStatus, SearchIndexSpec};
pub use provisioner::IndexProvisioner;
pub use query::SearchIndex;
pub use store::{Document, InMemoryStore, SearchStore, StoreBehavior, StoreError, StoreResult};
