//! Load command: node-list documents into Neo4j

use std::path::Path;

use anyhow::Result;
use apigraph_core::graph::load::{load_directory, LoadOptions, LoadSummary};
use apigraph_core::graph::neo4j::Neo4jClient;
use apigraph_core::graph::store::GraphStore;
use tracing::info;

use super::types::{BatchArgs, Neo4jArgs};

/// Run the load command
///
/// # Errors
/// Returns an error if the connection or the initial clear fails.
pub async fn run(docs: &Path, neo4j: &Neo4jArgs, batch: &BatchArgs) -> Result<LoadSummary> {
    let client = Neo4jClient::connect(&neo4j.config()?).await?;
    load_into(&client, docs, &batch.options()).await
}

/// Load every document under `docs` into `store`
///
/// # Errors
/// Returns an error if the initial clear fails.
pub async fn load_into(
    store: &dyn GraphStore,
    docs: &Path,
    options: &LoadOptions,
) -> Result<LoadSummary> {
    let summary = load_directory(store, docs, options).await?;

    info!(
        "✓ Load completed: {}/{} documents, {} nodes, {} edges, {} parent warnings",
        summary.loaded, summary.documents, summary.nodes, summary.edges, summary.warnings
    );
    Ok(summary)
}
