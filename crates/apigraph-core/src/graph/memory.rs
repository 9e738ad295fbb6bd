//! In-memory graph store
//!
//! Same merge semantics as the Neo4j store: nodes are keyed by label and
//! unique key, edges by their endpoints and type. Used for dry runs and
//! tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::convert::NodeUpsert;
use super::model::{Edge, EdgeKind, Label};
use super::store::{GraphStats, GraphStore, StoreError, StoredNode};

#[derive(Debug, Default)]
struct MemoryData {
    nodes: BTreeMap<(Label, String), StoredNode>,
    edges: BTreeSet<Edge>,
}

impl MemoryData {
    fn contains(&self, label: Label, key: &str) -> bool {
        self.nodes.contains_key(&(label, key.to_string()))
    }

    /// First node with the key, in label order
    fn by_key(&self, key: &str) -> Option<&StoredNode> {
        self.nodes.values().find(|node| node.unique_key == key)
    }

    fn targets<'a>(&'a self, edges: impl Iterator<Item = &'a Edge>) -> Vec<StoredNode> {
        let mut found: Vec<StoredNode> = edges
            .filter_map(|edge| {
                self.nodes
                    .get(&(edge.target_label, edge.target_key.clone()))
                    .cloned()
            })
            .collect();
        found.sort_by(|a, b| a.unique_key.cmp(&b.unique_key));
        found.dedup();
        found
    }

    fn module_members(&self, module: &str) -> Vec<StoredNode> {
        let mut members: Vec<StoredNode> = self
            .edges
            .iter()
            .filter(|edge| {
                edge.kind == EdgeKind::BelongsTo
                    && edge.target_label == Label::Module
                    && edge.target_key == module
            })
            .filter_map(|edge| {
                self.nodes
                    .get(&(edge.source_label, edge.source_key.clone()))
                    .cloned()
            })
            .collect();
        members.sort_by(|a, b| a.unique_key.cmp(&b.unique_key));
        members.dedup();
        members
    }

    fn has_members(&self, node: &StoredNode) -> bool {
        self.edges.iter().any(|edge| {
            matches!(edge.kind, EdgeKind::Has(_))
                && edge.source_key == node.unique_key
                && Some(edge.source_label) == node.label
        })
    }
}

/// Graph store kept in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes
    pub async fn node_count(&self) -> usize {
        self.data.lock().await.nodes.len()
    }

    /// Number of stored edges
    pub async fn edge_count(&self) -> usize {
        self.data.lock().await.edges.len()
    }

    /// Every stored edge, in a stable order
    pub async fn edges(&self) -> Vec<Edge> {
        self.data.lock().await.edges.iter().cloned().collect()
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn clear(&self) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        data.nodes.clear();
        data.edges.clear();
        Ok(())
    }

    async fn upsert_node(&self, node: &NodeUpsert) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let stored = data
            .nodes
            .entry((node.label, node.unique_key.clone()))
            .or_insert_with(|| StoredNode {
                unique_key: node.unique_key.clone(),
                label: Some(node.label),
                ..StoredNode::default()
            });
        stored.name.clone_from(&node.name);
        stored.properties.extend(
            node.properties
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Ok(())
    }

    async fn merge_edge(&self, edge: &Edge) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        if data.contains(edge.source_label, &edge.source_key)
            && data.contains(edge.target_label, &edge.target_key)
        {
            data.edges.insert(edge.clone());
        }
        Ok(())
    }

    async fn find_node(&self, unique_key: &str) -> Result<Option<StoredNode>, StoreError> {
        Ok(self.data.lock().await.by_key(unique_key).cloned())
    }

    async fn nodes_with_label(&self, label: Label) -> Result<Vec<StoredNode>, StoreError> {
        let data = self.data.lock().await;
        Ok(data
            .nodes
            .iter()
            .filter(|((node_label, _), _)| *node_label == label)
            .map(|(_, node)| node.clone())
            .collect())
    }

    async fn nodes_in_module(&self, module: &str) -> Result<Vec<StoredNode>, StoreError> {
        Ok(self.data.lock().await.module_members(module))
    }

    async fn members_of(&self, unique_key: &str) -> Result<Vec<StoredNode>, StoreError> {
        let data = self.data.lock().await;
        let members = data.targets(data.edges.iter().filter(|edge| {
            matches!(edge.kind, EdgeKind::Has(_)) && edge.source_key == unique_key
        }));
        Ok(members)
    }

    async fn containers_in_module(&self, module: &str) -> Result<Vec<StoredNode>, StoreError> {
        let data = self.data.lock().await;
        Ok(data
            .module_members(module)
            .into_iter()
            .filter(|node| data.has_members(node))
            .collect())
    }

    async fn stats(&self) -> Result<GraphStats, StoreError> {
        let data = self.data.lock().await;
        let mut stats = GraphStats::default();
        for (label, _) in data.nodes.keys() {
            *stats.nodes_by_label.entry(label.to_string()).or_insert(0) += 1;
        }
        for edge in &data.edges {
            *stats.edges_by_type.entry(edge.kind.to_string()).or_insert(0) += 1;
        }
        Ok(stats)
    }
}
