//! Build command: extract, resolve and materialize in one pass

use std::path::Path;

use anyhow::Result;
use apigraph_core::graph::load::{load_node_lists, LoadOptions, LoadSummary};
use apigraph_core::graph::memory::MemoryStore;
use apigraph_core::graph::neo4j::Neo4jClient;
use apigraph_core::graph::store::{GraphStats, GraphStore};
use apigraph_core::scanner::{extract_units, ScanOptions, ScanSummary};
use tracing::info;

use super::types::{BatchArgs, Neo4jArgs, ScanArgs};

/// Run the build command
///
/// With `dry_run` the graph is built in memory and its statistics printed.
///
/// # Errors
/// Returns an error if the connection or the initial clear fails.
pub async fn run(
    src: &Path,
    scan: &ScanArgs,
    neo4j: &Neo4jArgs,
    batch: &BatchArgs,
    dry_run: bool,
) -> Result<()> {
    let options = scan.options(src);

    if dry_run {
        let store = MemoryStore::new();
        build_into(&store, &options, &batch.options()).await?;
        print!("{}", render_stats(&store.stats().await?));
        return Ok(());
    }

    let client = Neo4jClient::connect(&neo4j.config()?).await?;
    build_into(&client, &options, &batch.options()).await?;
    Ok(())
}

/// Extract every unit under the scan root and materialize it into `store`
///
/// # Errors
/// Returns an error if the initial clear fails.
pub async fn build_into(
    store: &dyn GraphStore,
    scan: &ScanOptions,
    options: &LoadOptions,
) -> Result<(ScanSummary, LoadSummary)> {
    info!("Building graph from {}", scan.root.display());

    let (lists, scanned) = extract_units(scan);
    let loaded = load_node_lists(store, lists, options).await?;

    info!(
        "✓ Build completed: {} units, {} nodes, {} edges, {} failed",
        loaded.loaded,
        loaded.nodes,
        loaded.edges,
        scanned.failed + loaded.failed
    );
    Ok((scanned, loaded))
}

/// Statistics table, one line per label and relationship type
#[must_use]
pub fn render_stats(stats: &GraphStats) -> String {
    let mut lines = vec![
        String::new(),
        "=== Graph Statistics ===".to_string(),
        String::new(),
        "Nodes:".to_string(),
    ];
    lines.extend(
        stats
            .nodes_by_label
            .iter()
            .map(|(label, count)| format!("  {label:<16} {count}")),
    );
    lines.push(format!("  {:<16} {}", "total", stats.total_nodes()));

    lines.push(String::new());
    lines.push("Relationships:".to_string());
    lines.extend(
        stats
            .edges_by_type
            .iter()
            .map(|(kind, count)| format!("  {kind:<20} {count}")),
    );
    lines.push(format!("  {:<20} {}", "total", stats.total_edges()));

    lines.join("\n") + "\n"
}
