//! Command types shared between main and library

use std::path::PathBuf;

use anyhow::{Context, Result};
use apigraph_core::graph::load::LoadOptions;
use apigraph_core::graph::materialize::RetryPolicy;
use apigraph_core::graph::neo4j::Neo4jConfig;
use apigraph_core::scanner::{Dialect, ScanOptions, DEFAULT_EXCLUDED_STEMS};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "apigraph", version, about = "Build a knowledge graph from API declarations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract declaration files into node-list JSON documents
    Extract {
        /// Directory of declaration files
        src: PathBuf,
        /// Output directory, mirrors the source tree
        out: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Load node-list documents into Neo4j
    Load {
        /// Document directory (or a single document)
        docs: PathBuf,
        #[command(flatten)]
        neo4j: Neo4jArgs,
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Extract and load in one pass, without intermediate files
    Build {
        /// Directory of declaration files
        src: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
        #[command(flatten)]
        neo4j: Neo4jArgs,
        #[command(flatten)]
        batch: BatchArgs,
        /// Build into memory and print statistics instead of writing to Neo4j
        #[arg(long)]
        dry_run: bool,
    },
    /// Query the graph
    Query {
        #[command(subcommand)]
        query: QueryCommands,
        #[command(flatten)]
        neo4j: Neo4jArgs,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum QueryCommands {
    /// Show one node by unique key
    Node {
        /// Unique key, e.g. `Network.Kit.socket.Socket`
        key: String,
    },
    /// List nodes carrying a label
    Label {
        /// Label name, e.g. `Interface`
        label: String,
    },
    /// List entities belonging to a module
    Module {
        /// Module name
        name: String,
    },
    /// List the members a node contains
    Members {
        /// Unique key of the containing node
        key: String,
    },
    /// List a module's entities that have members
    Containers {
        /// Module name
        module: String,
    },
    /// Show graph statistics
    Stats,
}

#[derive(Args, Debug, Clone)]
pub struct Neo4jArgs {
    /// Neo4j connection URI
    #[arg(long, default_value = "bolt://localhost:7687")]
    pub neo4j_uri: String,

    /// Neo4j username
    #[arg(long, default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password (not needed with --dry-run)
    #[arg(long)]
    pub neo4j_password: Option<String>,

    /// Neo4j database name
    #[arg(long)]
    pub database: Option<String>,
}

impl Neo4jArgs {
    /// Connection settings
    ///
    /// # Errors
    /// Returns an error if no password was given.
    pub fn config(&self) -> Result<Neo4jConfig> {
        let password = self
            .neo4j_password
            .as_deref()
            .context("--neo4j-password is required")?;

        let config = Neo4jConfig::new(&self.neo4j_uri, &self.neo4j_user, password);
        Ok(match &self.database {
            Some(database) => config.with_database(database),
            None => config,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Only scan this dialect (d.ts, d.ets, ts, ets); repeatable
    #[arg(long = "dialect")]
    pub dialects: Vec<Dialect>,

    /// Skip files with this stem; repeatable, adds to the defaults
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,

    /// Do not skip the default stems (permission)
    #[arg(long)]
    pub no_default_excludes: bool,
}

impl ScanArgs {
    #[must_use]
    pub fn options(&self, root: impl Into<PathBuf>) -> ScanOptions {
        let mut stems: Vec<String> = if self.no_default_excludes {
            Vec::new()
        } else {
            DEFAULT_EXCLUDED_STEMS.iter().map(ToString::to_string).collect()
        };
        stems.extend(self.exclude.iter().cloned());

        let options = ScanOptions::new(root).with_excluded_stems(stems);
        if self.dialects.is_empty() {
            options
        } else {
            options.with_dialects(self.dialects.clone())
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Clear the whole graph before the first document
    #[arg(long)]
    pub clear: bool,

    /// Documents materialized concurrently
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,

    /// Attempts per store write before giving up
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,
}

impl BatchArgs {
    #[must_use]
    pub fn options(&self) -> LoadOptions {
        LoadOptions {
            clear: self.clear,
            jobs: self.jobs.max(1),
            retry: RetryPolicy {
                max_attempts: self.max_attempts.max(1),
                ..RetryPolicy::default()
            },
        }
    }
}
