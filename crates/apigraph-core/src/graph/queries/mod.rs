//! Neo4j query modules organized by operation

mod edge;
mod node;
mod read;

// Re-export Neo4jClient for the impl blocks
pub(super) use super::neo4j::Neo4jClient;
