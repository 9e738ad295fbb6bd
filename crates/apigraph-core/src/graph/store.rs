//! Graph store seam
//!
//! The materializer and the CLI talk to a [`GraphStore`], never to a
//! concrete database. [`crate::graph::neo4j::Neo4jClient`] is the real one;
//! [`crate::graph::memory::MemoryStore`] has the same merge semantics and
//! lives in-process.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use super::convert::NodeUpsert;
use super::model::{Edge, Label};

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),
}

impl StoreError {
    /// Whether retrying the same write may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Neo4j(_))
    }
}

/// A node as read back from a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredNode {
    pub unique_key: String,
    pub label: Option<Label>,
    pub name: String,
    /// String properties other than `unique_key` and `name`
    pub properties: BTreeMap<String, String>,
}

impl StoredNode {
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}

/// Node and relationship counts
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes_by_label: BTreeMap<String, i64>,
    pub edges_by_type: BTreeMap<String, i64>,
}

impl GraphStats {
    #[must_use]
    pub fn total_nodes(&self) -> i64 {
        self.nodes_by_label.values().sum()
    }

    #[must_use]
    pub fn total_edges(&self) -> i64 {
        self.edges_by_type.values().sum()
    }
}

/// Property graph holding materialized entities
///
/// Every write has merge semantics: replaying it leaves the store as it
/// was. An edge whose endpoints are not both present is not created.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Delete every node and relationship
    async fn clear(&self) -> Result<(), StoreError>;

    /// Create the node or update its name and the given properties
    ///
    /// Properties not named in `node` are left untouched.
    async fn upsert_node(&self, node: &NodeUpsert) -> Result<(), StoreError>;

    /// Create the edge unless it already exists
    async fn merge_edge(&self, edge: &Edge) -> Result<(), StoreError>;

    /// Node with the given unique key
    async fn find_node(&self, unique_key: &str) -> Result<Option<StoredNode>, StoreError>;

    /// All nodes carrying a label, ordered by key
    async fn nodes_with_label(&self, label: Label) -> Result<Vec<StoredNode>, StoreError>;

    /// Nodes with a membership edge to the module, ordered by key
    async fn nodes_in_module(&self, module: &str) -> Result<Vec<StoredNode>, StoreError>;

    /// Targets of the containment edges leaving a node, ordered by key
    async fn members_of(&self, unique_key: &str) -> Result<Vec<StoredNode>, StoreError>;

    /// Module members that contain at least one member themselves
    async fn containers_in_module(&self, module: &str) -> Result<Vec<StoredNode>, StoreError>;

    /// Node counts per label and edge counts per type
    async fn stats(&self) -> Result<GraphStats, StoreError>;
}
