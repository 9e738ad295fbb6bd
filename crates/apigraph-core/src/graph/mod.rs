//! Graph module: entity model, key resolution and graph storage
//!
//! Turns parsed node lists into a property graph. Keys are resolved per
//! list, then the materializer writes nodes and edges through a
//! [`store::GraphStore`], backed by Neo4j or by memory.

pub mod convert;
pub mod load;
pub mod materialize;
pub mod memory;
pub mod model;
pub mod neo4j;
pub mod queries;
pub mod resolve;
pub mod store;

#[cfg(test)]
mod tests;
