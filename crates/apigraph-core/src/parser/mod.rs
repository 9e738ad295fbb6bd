//! Parser module: declaration text to ordered entity nodes
//!
//! A best-effort structural extractor for `.d.ts`/`.d.ets` API
//! declarations. Nothing here type-checks; malformed constructs are logged
//! and skipped rather than failing the unit.

mod balance;
pub mod classify;
pub mod comment;
pub mod segment;
pub mod unit;
pub mod walker;

use thiserror::Error;

pub use classify::{classify, Candidate, Entity};
pub use comment::{scan_doc_comments, CommentScan, DocComment};
pub use segment::{segment, Segments};
pub use unit::{extract_unit, module_marker, ModuleMarker};
pub use walker::{walk_block, Cursor, Member, MAX_DEPTH};

/// Failure while walking one block
///
/// Raised per block; the unit driver drops that block and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unbalanced block: {prefix}")]
    UnbalancedBlock { prefix: String },

    #[error("Block nested {depth} levels deep: {prefix}")]
    NestingTooDeep { prefix: String, depth: u32 },
}

#[cfg(test)]
mod tests;
