//! Scanner module: declaration file discovery and batch extraction
//!
//! Walks a directory tree (respecting .gitignore), detects the dialect of
//! each declaration file and turns every marked unit into a node list.

mod dialect;
mod run;
mod walker;

pub use dialect::Dialect;
pub use run::{
    document_path, extract_file, extract_units, write_documents, ScanError, ScanOptions,
    ScanSummary,
};
pub use walker::{content_hash, DiscoveredFile, Scanner, DEFAULT_EXCLUDED_STEMS};
