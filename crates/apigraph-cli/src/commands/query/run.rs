//! Query command: read-only lookups against the graph

use anyhow::{bail, Result};
use apigraph_core::graph::model::Label;
use apigraph_core::graph::neo4j::Neo4jClient;
use apigraph_core::graph::store::{GraphStore, StoredNode};
use tracing::info;

use crate::commands::build::render_stats;
use crate::commands::types::{Neo4jArgs, QueryCommands};

/// Run the query command
///
/// # Errors
/// Returns an error if the connection or the query fails.
pub async fn run(cmd: &QueryCommands, neo4j: &Neo4jArgs) -> Result<()> {
    let client = Neo4jClient::connect(&neo4j.config()?).await?;
    print!("{}", render(&client, cmd).await?);
    Ok(())
}

/// Run a query against `store` and format the result for the terminal
///
/// # Errors
/// Returns an error if the query fails or the label is unknown.
pub async fn render(store: &dyn GraphStore, cmd: &QueryCommands) -> Result<String> {
    match cmd {
        QueryCommands::Node { key } => {
            info!("Looking up '{key}'...");
            Ok(match store.find_node(key).await? {
                Some(node) => render_node(&node),
                None => format!("No node with key '{key}'\n"),
            })
        }
        QueryCommands::Label { label } => {
            let Some(parsed) = Label::from_name(label) else {
                let known: Vec<&str> = Label::ALL.iter().map(|l| l.as_str()).collect();
                bail!("Unknown label '{label}' (expected one of: {})", known.join(", "));
            };
            info!("Listing {parsed} nodes...");
            let nodes = store.nodes_with_label(parsed).await?;
            Ok(render_table(&nodes, &format!("{parsed} nodes")))
        }
        QueryCommands::Module { name } => {
            info!("Listing members of module '{name}'...");
            let nodes = store.nodes_in_module(name).await?;
            Ok(render_table(&nodes, &format!("entities in module '{name}'")))
        }
        QueryCommands::Members { key } => {
            info!("Listing members of '{key}'...");
            let nodes = store.members_of(key).await?;
            Ok(render_table(&nodes, &format!("members of '{key}'")))
        }
        QueryCommands::Containers { module } => {
            info!("Listing containers in module '{module}'...");
            let nodes = store.containers_in_module(module).await?;
            Ok(render_table(&nodes, &format!("containers in module '{module}'")))
        }
        QueryCommands::Stats => {
            info!("Getting graph statistics...");
            Ok(render_stats(&store.stats().await?))
        }
    }
}

fn label_name(node: &StoredNode) -> &str {
    node.label.map_or("?", Label::as_str)
}

fn render_node(node: &StoredNode) -> String {
    let mut lines = vec![
        String::new(),
        format!("{} ({})", node.unique_key, label_name(node)),
        format!("  name: {}", node.name),
    ];
    lines.extend(
        node.properties
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(key, value)| format!("  {key}: {}", value.replace('\n', "\n    "))),
    );
    lines.join("\n") + "\n"
}

fn render_table(nodes: &[StoredNode], what: &str) -> String {
    if nodes.is_empty() {
        return format!("No {what} found\n");
    }

    let mut lines = vec![
        String::new(),
        format!("{:<60} {:<15} NAME", "KEY", "LABEL"),
        "-".repeat(100),
    ];
    lines.extend(nodes.iter().map(|node| {
        format!(
            "{:<60} {:<15} {}",
            truncate_key(&node.unique_key, 60),
            label_name(node),
            truncate_str(&node.name, 40),
        )
    }));
    lines.push(String::new());
    lines.push(format!("Found {} {what}", nodes.len()));
    lines.join("\n") + "\n"
}

/// Cut `s` to at most `max_len` characters, ending in `...`
pub(super) fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Like [`truncate_str`] but keeps the end of the key
pub(super) fn truncate_key(key: &str, max_len: usize) -> String {
    let count = key.chars().count();
    if count <= max_len {
        return key.to_string();
    }
    let kept: String = key.chars().skip(count - max_len.saturating_sub(3)).collect();
    format!("...{kept}")
}
