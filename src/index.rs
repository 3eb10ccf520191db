//! Search index specifications and status snapshots

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Specification of a search index to provision
///
/// Identity is `name`, unique per collection. The definition is an opaque
/// mapping-configuration blob handed to the store untouched; this crate
/// never interprets it. A spec is immutable once submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndexSpec {
    /// Index name, unique per collection
    pub name: String,

    /// Mapping configuration, in whatever shape the store expects
    pub definition: serde_json::Value,
}

impl SearchIndexSpec {
    /// Create a spec with an explicit definition
    pub fn new(name: impl Into<String>, definition: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }

    /// Create a spec with dynamic mappings over all fields
    pub fn dynamic(name: impl Into<String>) -> Self {
        Self::new(
            name,
            serde_json::json!({
                "mappings": {
                    "dynamic": true,
                    "fields": {}
                }
            }),
        )
    }
}

/// Build state of a search index as reported by the store
///
/// Only [`IndexState::Ready`] means the store will accept queries against
/// the index; every other state keeps the provisioner polling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexState {
    Pending,
    Building,
    Ready,
    Stale,
    Failed,
    Deleting,
}

impl IndexState {
    /// Whether the index is built and queryable
    pub fn is_ready(self) -> bool {
        matches!(self, IndexState::Ready)
    }
}

/// Point-in-time status of one index
///
/// A snapshot, not a stream: the store offers no readiness notifications,
/// so status must be re-fetched by polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatus {
    /// Index name
    pub name: String,

    /// Build state at the time of the listing
    pub status: IndexState,
}
