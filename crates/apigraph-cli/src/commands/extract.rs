//! Extract command: declaration files to node-list documents

use std::path::Path;

use anyhow::Result;
use apigraph_core::scanner::{write_documents, ScanSummary};
use tracing::info;

use super::types::ScanArgs;

/// Run the extract command
///
/// # Errors
/// Returns an error if the output directory cannot be created.
pub fn run(src: &Path, out: &Path, scan: &ScanArgs) -> Result<ScanSummary> {
    info!("Extracting {} into {}", src.display(), out.display());

    let summary = write_documents(&scan.options(src), out)?;

    info!(
        "✓ Extract completed: {} documents, {} nodes, {} skipped, {} failed",
        summary.written, summary.nodes, summary.skipped, summary.failed
    );
    Ok(summary)
}
