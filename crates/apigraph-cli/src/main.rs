//! apigraph: build a knowledge graph from API declaration files

use anyhow::Result;
use apigraph_cli::commands::{build, extract, load, query};
use apigraph_cli::logging::setup_logging;
use apigraph_cli::{Cli, Commands};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Extract { src, out, scan } => {
            extract::run(&src, &out, &scan)?;
        }
        Commands::Load { docs, neo4j, batch } => {
            load::run(&docs, &neo4j, &batch).await?;
        }
        Commands::Build {
            src,
            scan,
            neo4j,
            batch,
            dry_run,
        } => {
            build::run(&src, &scan, &neo4j, &batch, dry_run).await?;
        }
        Commands::Query { query, neo4j } => {
            query::run(&query, &neo4j).await?;
        }
    }

    Ok(())
}
