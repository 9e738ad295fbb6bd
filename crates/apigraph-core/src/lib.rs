//! apigraph core library
//!
//! Extracts API declarations from TypeScript/ArkTS declaration files into
//! flat node lists and materializes them as a property graph:
//!
//! - [`parser`] turns one source unit into an ordered [`graph::model::NodeList`]
//! - [`graph::resolve`] assigns hierarchy-qualified unique keys
//! - [`graph::materialize`] writes nodes and edges through a [`graph::store::GraphStore`]
//! - [`scanner`] discovers declaration files and drives batch extraction

pub mod graph;
pub mod parser;
pub mod scanner;
