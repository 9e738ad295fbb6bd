//! Neo4j client for graph storage

use std::sync::Arc;

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};

use super::convert::NodeUpsert;
use super::model::{Edge, Label};
use super::store::{GraphStats, GraphStore, StoreError, StoredNode};

/// Configuration for Neo4j connection
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
}

impl Neo4jConfig {
    /// Create a new Neo4j configuration
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: None,
        }
    }

    /// Set the database name
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Client for interacting with Neo4j
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

impl Neo4jClient {
    /// Connect to Neo4j and ensure indexes exist
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, StoreError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password);

        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }

        let neo_config = builder
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let graph = Graph::connect(neo_config).await?;

        let client = Self {
            graph: Arc::new(graph),
        };

        client.ensure_indexes().await?;

        Ok(client)
    }

    /// Create one `unique_key` index per label if missing
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        for label in Label::ALL {
            let statement = format!(
                "CREATE INDEX {}_unique_key IF NOT EXISTS FOR (n:{label}) ON (n.unique_key)",
                label.as_str().to_lowercase()
            );
            self.graph.run(Query::new(statement)).await?;
        }

        Ok(())
    }

    /// Get access to the graph for query modules
    pub(super) fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl GraphStore for Neo4jClient {
    async fn clear(&self) -> Result<(), StoreError> {
        self.delete_all().await
    }

    async fn upsert_node(&self, node: &NodeUpsert) -> Result<(), StoreError> {
        self.merge_node(node).await
    }

    async fn merge_edge(&self, edge: &Edge) -> Result<(), StoreError> {
        self.merge_relationship(edge).await
    }

    async fn find_node(&self, unique_key: &str) -> Result<Option<StoredNode>, StoreError> {
        self.node_by_key(unique_key).await
    }

    async fn nodes_with_label(&self, label: Label) -> Result<Vec<StoredNode>, StoreError> {
        self.nodes_labelled(label).await
    }

    async fn nodes_in_module(&self, module: &str) -> Result<Vec<StoredNode>, StoreError> {
        self.module_members(module).await
    }

    async fn members_of(&self, unique_key: &str) -> Result<Vec<StoredNode>, StoreError> {
        self.contained_members(unique_key).await
    }

    async fn containers_in_module(&self, module: &str) -> Result<Vec<StoredNode>, StoreError> {
        self.module_containers(module).await
    }

    async fn stats(&self) -> Result<GraphStats, StoreError> {
        self.graph_stats().await
    }
}
