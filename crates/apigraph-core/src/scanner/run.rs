//! Batch extraction of declaration trees into node lists

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::dialect::Dialect;
use super::walker::{content_hash, DiscoveredFile, Scanner, DEFAULT_EXCLUDED_STEMS};
use crate::graph::model::NodeList;
use crate::parser::unit::extract_unit;

/// Errors that can occur during batch extraction
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What to scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    /// File stems (name up to the first dot) to skip
    pub excluded_stems: Vec<String>,
    /// Only these dialects, all when `None`
    pub dialects: Option<Vec<Dialect>>,
}

impl ScanOptions {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_stems: DEFAULT_EXCLUDED_STEMS
                .iter()
                .map(ToString::to_string)
                .collect(),
            dialects: None,
        }
    }

    #[must_use]
    pub fn with_dialects(mut self, dialects: Vec<Dialect>) -> Self {
        self.dialects = Some(dialects);
        self
    }

    #[must_use]
    pub fn with_excluded_stems(mut self, stems: Vec<String>) -> Self {
        self.excluded_stems = stems;
        self
    }

    fn scanner(&self) -> Scanner {
        let scanner = Scanner::new(&self.root).with_excluded_stems(self.excluded_stems.clone());
        match &self.dialects {
            Some(dialects) => scanner.with_dialects(dialects.clone()),
            None => scanner,
        }
    }
}

/// Outcome counts for a batch extraction
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub files: usize,
    pub extracted: usize,
    /// Units without a module marker
    pub skipped: usize,
    pub failed: usize,
    pub nodes: usize,
    /// Documents written to disk
    pub written: usize,
}

/// Extract one declaration file
///
/// `source_path` is recorded relative to `root`. Returns `Ok(None)` when
/// the unit carries no module marker.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn extract_file(file: &DiscoveredFile, root: &Path) -> Result<Option<NodeList>, ScanError> {
    let bytes = fs::read(&file.path)?;
    let text = String::from_utf8_lossy(&bytes);

    let Some(mut list) = extract_unit(&text) else {
        return Ok(None);
    };

    let relative = file.path.strip_prefix(root).unwrap_or(file.path.as_path());
    list.source_path = Some(relative.display().to_string());
    list.content_hash = Some(content_hash(&bytes));
    Ok(Some(list))
}

/// Extract every declaration file under the root, in sorted path order
///
/// Unreadable files are counted as failed; the batch carries on.
#[must_use]
pub fn extract_units(options: &ScanOptions) -> (Vec<NodeList>, ScanSummary) {
    let mut summary = ScanSummary::default();
    let mut lists = Vec::new();

    for file in options.scanner().scan() {
        summary.files += 1;
        match extract_file(&file, &options.root) {
            Ok(Some(list)) => {
                summary.extracted += 1;
                summary.nodes += list.nodes.len();
                lists.push(list);
            }
            Ok(None) => {
                debug!("No module marker, skipping {}", file.path.display());
                summary.skipped += 1;
            }
            Err(e) => {
                warn!("Failed to extract {}: {e}", file.path.display());
                summary.failed += 1;
            }
        }
    }

    info!(
        "Extracted {} of {} file(s): {} nodes, {} skipped, {} failed",
        summary.extracted, summary.files, summary.nodes, summary.skipped, summary.failed
    );
    (lists, summary)
}

/// Document path for a unit: the input tree mirrored under `out_dir`
#[must_use]
pub fn document_path(out_dir: &Path, source_path: &str) -> PathBuf {
    out_dir.join(source_path).with_extension("json")
}

/// Extract every unit and write one JSON document per unit under `out_dir`
///
/// # Errors
/// Returns an error if `out_dir` cannot be created. Failures on single
/// documents are counted and logged.
pub fn write_documents(options: &ScanOptions, out_dir: &Path) -> Result<ScanSummary, ScanError> {
    fs::create_dir_all(out_dir)?;
    let (lists, mut summary) = extract_units(options);

    for list in &lists {
        let relative = list.source_path.as_deref().unwrap_or(list.module.as_str());
        let target = document_path(out_dir, relative);
        match write_document(&target, list) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                warn!("Failed to write {}: {e}", target.display());
                summary.failed += 1;
            }
        }
    }

    info!("Wrote {} document(s) to {}", summary.written, out_dir.display());
    Ok(summary)
}

fn write_document(target: &Path, list: &NodeList) -> Result<(), ScanError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(list)?;
    fs::write(target, json)?;
    Ok(())
}
