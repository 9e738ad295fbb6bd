//! Batch loading of node-list documents
//!
//! Each document is resolved with [`resolve_keys`] and handed to the
//! [`Materializer`]. A document that fails never stops the batch; only the
//! optional store clear, run once before the first document, is fatal.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::materialize::{MaterializeSummary, Materializer, RetryPolicy};
use super::model::NodeList;
use super::resolve::resolve_keys;
use super::store::{GraphStore, StoreError};

/// Errors that can occur while loading documents
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed input file {}: {reason}", path.display())]
    MalformedInputFile { path: PathBuf, reason: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Options for a load batch
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Clear the store before the first document
    pub clear: bool,
    /// Documents materialized concurrently
    pub jobs: usize,
    pub retry: RetryPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            clear: false,
            jobs: 1,
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome counts for a load batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub documents: usize,
    pub loaded: usize,
    pub malformed: usize,
    pub failed: usize,
    pub nodes: usize,
    pub edges: usize,
    /// Ambiguous or unresolved parent references
    pub warnings: usize,
}

impl LoadSummary {
    fn record(&mut self, outcome: Outcome) {
        self.documents += 1;
        match outcome {
            Outcome::Loaded { written, warnings } => {
                self.loaded += 1;
                self.nodes += written.nodes;
                self.edges += written.edges;
                self.warnings += warnings;
            }
            Outcome::Malformed => self.malformed += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

enum Document {
    File(PathBuf),
    Parsed(NodeList),
}

enum Outcome {
    Loaded {
        written: MaterializeSummary,
        warnings: usize,
    },
    Malformed,
    Failed,
}

/// Find node-list documents under `root`, sorted by path
///
/// A file path is returned as-is.
#[must_use]
pub fn discover_documents(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();

    paths.sort();
    paths
}

/// Read and parse one node-list document
///
/// # Errors
/// Returns `Io` if the file cannot be read, `MalformedInputFile` if it is
/// not valid JSON, its top level is not a mapping, or it does not describe
/// a node list.
pub fn read_document(path: &Path) -> Result<NodeList, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let malformed = |reason: String| LoadError::MalformedInputFile {
        path: path.to_path_buf(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("top-level value is not a mapping".to_string()));
    }

    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

/// Load every document found under `root`
///
/// # Errors
/// Returns an error only if the initial store clear fails.
pub async fn load_directory(
    store: &dyn GraphStore,
    root: &Path,
    options: &LoadOptions,
) -> Result<LoadSummary, LoadError> {
    let paths = discover_documents(root);
    info!("Loading {} document(s) from {}", paths.len(), root.display());
    run_batch(store, paths.into_iter().map(Document::File).collect(), options).await
}

/// Resolve and materialize node lists already in memory
///
/// # Errors
/// Returns an error only if the initial store clear fails.
pub async fn load_node_lists(
    store: &dyn GraphStore,
    lists: Vec<NodeList>,
    options: &LoadOptions,
) -> Result<LoadSummary, LoadError> {
    run_batch(store, lists.into_iter().map(Document::Parsed).collect(), options).await
}

async fn run_batch(
    store: &dyn GraphStore,
    documents: Vec<Document>,
    options: &LoadOptions,
) -> Result<LoadSummary, LoadError> {
    let materializer = Materializer::new(store).with_retry(options.retry);

    if options.clear {
        info!("Clearing graph store");
        materializer.clear().await?;
    }

    let outcomes: Vec<Outcome> = stream::iter(documents)
        .map(|document| load_document(&materializer, document))
        .buffer_unordered(options.jobs.max(1))
        .collect()
        .await;

    let mut summary = LoadSummary::default();
    for outcome in outcomes {
        summary.record(outcome);
    }

    info!(
        "Loaded {}/{} document(s): {} nodes, {} edges, {} malformed, {} failed",
        summary.loaded,
        summary.documents,
        summary.nodes,
        summary.edges,
        summary.malformed,
        summary.failed
    );

    Ok(summary)
}

async fn load_document(materializer: &Materializer<'_>, document: Document) -> Outcome {
    let (mut list, origin) = match document {
        Document::Parsed(list) => {
            let origin = list.source_path.clone().unwrap_or_else(|| list.module.clone());
            (list, origin)
        }
        Document::File(path) => match read_document(&path) {
            Ok(list) => (list, path.display().to_string()),
            Err(e @ LoadError::MalformedInputFile { .. }) => {
                warn!("Skipping document: {e}");
                return Outcome::Malformed;
            }
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                return Outcome::Failed;
            }
        },
    };

    let warnings = resolve_keys(&mut list.nodes).len();

    match materializer.materialize(&list.nodes).await {
        Ok(written) => {
            debug!(module = %list.module, nodes = written.nodes, "Loaded {origin}");
            Outcome::Loaded { written, warnings }
        }
        Err(e) => {
            warn!("Failed to load {origin}: {e}");
            Outcome::Failed
        }
    }
}
