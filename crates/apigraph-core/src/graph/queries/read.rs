//! Read-only query operations for Neo4j

use std::collections::BTreeMap;

use neo4rs::{Query, Row};

use super::Neo4jClient;
use crate::graph::convert::NODE_PROPERTIES;
use crate::graph::model::Label;
use crate::graph::store::{GraphStats, StoreError, StoredNode};

/// `RETURN` clause shared by every node query, bound to `n`
fn node_projection() -> String {
    let properties: Vec<String> = NODE_PROPERTIES
        .iter()
        .map(|p| format!("n.{p} AS {p}"))
        .collect();
    format!(
        "RETURN DISTINCT n.unique_key AS unique_key, labels(n)[0] AS label, n.name AS name, {}",
        properties.join(", ")
    )
}

fn stored_node(row: &Row) -> StoredNode {
    let label: String = row.get("label").unwrap_or_default();
    let properties: BTreeMap<String, String> = NODE_PROPERTIES
        .iter()
        .filter_map(|p| Some((p.to_string(), row.get::<String>(p).ok()?)))
        .collect();

    StoredNode {
        unique_key: row.get("unique_key").unwrap_or_default(),
        label: Label::from_name(&label),
        name: row.get("name").unwrap_or_default(),
        properties,
    }
}

impl Neo4jClient {
    async fn fetch_nodes(&self, query: Query) -> Result<Vec<StoredNode>, StoreError> {
        let mut result = self.graph().execute(query).await?;
        let mut nodes = Vec::new();

        while let Some(row) = result.next().await? {
            nodes.push(stored_node(&row));
        }

        Ok(nodes)
    }

    /// Find a node by unique key
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn node_by_key(&self, unique_key: &str) -> Result<Option<StoredNode>, StoreError> {
        let query = Query::new(format!(
            "MATCH (n {{unique_key: $unique_key}}) {} LIMIT 1",
            node_projection()
        ))
        .param("unique_key", unique_key);

        Ok(self.fetch_nodes(query).await?.into_iter().next())
    }

    /// List nodes carrying a label
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn nodes_labelled(&self, label: Label) -> Result<Vec<StoredNode>, StoreError> {
        let query = Query::new(format!(
            "MATCH (n:{label}) {} ORDER BY unique_key",
            node_projection()
        ));

        self.fetch_nodes(query).await
    }

    /// List entities with a membership edge to a module
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn module_members(&self, module: &str) -> Result<Vec<StoredNode>, StoreError> {
        let query = Query::new(format!(
            r#"
            MATCH (n)-[:BELONGS_TO]->(:Module {{unique_key: $module}})
            {} ORDER BY unique_key
            "#,
            node_projection()
        ))
        .param("module", module);

        self.fetch_nodes(query).await
    }

    /// List the members a node contains
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn contained_members(&self, unique_key: &str) -> Result<Vec<StoredNode>, StoreError> {
        let query = Query::new(format!(
            r#"
            MATCH ({{unique_key: $unique_key}})-[r]->(n)
            WHERE type(r) STARTS WITH 'HAS_'
            {} ORDER BY unique_key
            "#,
            node_projection()
        ))
        .param("unique_key", unique_key);

        self.fetch_nodes(query).await
    }

    /// List module members that contain members of their own
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn module_containers(&self, module: &str) -> Result<Vec<StoredNode>, StoreError> {
        let query = Query::new(format!(
            r#"
            MATCH (n)-[:BELONGS_TO]->(:Module {{unique_key: $module}})
            MATCH (n)-[r]->()
            WHERE type(r) STARTS WITH 'HAS_'
            {} ORDER BY unique_key
            "#,
            node_projection()
        ))
        .param("module", module);

        self.fetch_nodes(query).await
    }

    /// Get graph statistics
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn graph_stats(&self) -> Result<GraphStats, StoreError> {
        let query = Query::new(
            r#"
            MATCH (n)
            WITH labels(n)[0] as label, count(n) as cnt
            RETURN label, cnt
            ORDER BY label
            "#
            .to_string(),
        );

        let mut result = self.graph().execute(query).await?;
        let mut stats = GraphStats::default();

        while let Some(row) = result.next().await? {
            let label: String = row.get("label").unwrap_or_default();
            let count: i64 = row.get("cnt").unwrap_or(0);
            stats.nodes_by_label.insert(label, count);
        }

        let rel_query = Query::new(
            r#"
            MATCH ()-[r]->()
            WITH type(r) as rel_type, count(r) as cnt
            RETURN rel_type, cnt
            ORDER BY rel_type
            "#
            .to_string(),
        );

        let mut rel_result = self.graph().execute(rel_query).await?;
        while let Some(row) = rel_result.next().await? {
            let rel_type: String = row.get("rel_type").unwrap_or_default();
            let count: i64 = row.get("cnt").unwrap_or(0);
            stats.edges_by_type.insert(rel_type, count);
        }

        Ok(stats)
    }
}
