//! Node writes

use std::collections::HashMap;

use neo4rs::Query;

use super::Neo4jClient;
use crate::graph::convert::NodeUpsert;
use crate::graph::store::StoreError;

impl Neo4jClient {
    /// Merge a node on its label and unique key, then set its properties
    ///
    /// Properties the write does not name are kept.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn merge_node(&self, node: &NodeUpsert) -> Result<(), StoreError> {
        let properties: HashMap<String, String> = node
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        // Labels come from a closed enum, never from input text
        let query = Query::new(format!(
            r#"
            MERGE (n:{label} {{unique_key: $unique_key}})
            SET n.name = $name, n += $properties
            "#,
            label = node.label
        ))
        .param("unique_key", node.unique_key.clone())
        .param("name", node.name.clone())
        .param("properties", properties);

        self.graph().run(query).await?;
        Ok(())
    }

    /// Delete every node and relationship
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn delete_all(&self) -> Result<(), StoreError> {
        self.graph()
            .run(Query::new("MATCH (n) DETACH DELETE n".to_string()))
            .await?;
        Ok(())
    }
}
