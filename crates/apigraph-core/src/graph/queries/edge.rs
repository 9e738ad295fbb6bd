//! Relationship writes

use neo4rs::Query;

use super::Neo4jClient;
use crate::graph::model::Edge;
use crate::graph::store::StoreError;

impl Neo4jClient {
    /// Merge a relationship between two existing nodes
    ///
    /// Nothing is created when either endpoint is missing.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn merge_relationship(&self, edge: &Edge) -> Result<(), StoreError> {
        let query = Query::new(format!(
            r#"
            MATCH (a:{source} {{unique_key: $source_key}})
            MATCH (b:{target} {{unique_key: $target_key}})
            MERGE (a)-[:{kind}]->(b)
            "#,
            source = edge.source_label,
            target = edge.target_label,
            kind = edge.kind
        ))
        .param("source_key", edge.source_key.clone())
        .param("target_key", edge.target_key.clone());

        self.graph().run(query).await?;
        Ok(())
    }
}
