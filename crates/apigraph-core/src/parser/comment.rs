//! Documentation comment scanner
//!
//! Locates the run of `/** ... */` blocks sitting directly on top of a
//! declaration. Consecutive blocks with no gap between them are kept as
//! competing candidates; [`CommentScan::select`] picks the one with the
//! highest `@since` version.

use std::cmp::Reverse;

use once_cell::sync::Lazy;
use regex::Regex;

pub const DOC_OPEN: &str = "/**";
pub const DOC_CLOSE: &str = "*/";

static SINCE_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"@since\s+(\d+)").ok());

/// Description and tags of a selected documentation comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocComment {
    /// Non-tag lines joined with single spaces
    pub description: String,
    /// `@tag ...` lines in source order
    pub metadata_tags: Vec<String>,
}

/// One complete `/** ... */` block, as trimmed source lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    lines: Vec<String>,
}

impl CommentBlock {
    /// Version from the block's `@since N` tag, or -1 without one
    #[must_use]
    pub fn since(&self) -> i64 {
        self.lines
            .iter()
            .find_map(|line| SINCE_RE.as_ref()?.captures(line))
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(-1)
    }

    /// Split the block into description text and tag lines
    #[must_use]
    pub fn to_doc(&self) -> DocComment {
        let mut description = Vec::new();
        let mut metadata_tags = Vec::new();

        for line in &self.lines {
            let mut text = line.trim();
            if let Some(rest) = text.strip_prefix(DOC_OPEN) {
                text = rest;
            }
            if let Some(rest) = text.strip_suffix(DOC_CLOSE) {
                text = rest;
            }
            let text = text.trim().trim_start_matches('*').trim();
            if text.is_empty() {
                continue;
            }
            if text.starts_with('@') {
                metadata_tags.push(text.to_string());
            } else {
                description.push(text);
            }
        }

        DocComment {
            description: description.join(" "),
            metadata_tags,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Result of scanning for documentation comments at the top of some text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentScan {
    /// Candidate blocks in source order
    pub blocks: Vec<CommentBlock>,
    /// Lines up to and including the last complete block
    pub lines_consumed: usize,
}

impl CommentScan {
    /// First complete block encountered
    #[must_use]
    pub fn first(&self) -> Option<&CommentBlock> {
        self.blocks.first()
    }

    /// Candidate with the highest `@since`; ties keep source order
    #[must_use]
    pub fn select(&self) -> Option<&CommentBlock> {
        let mut ranked: Vec<&CommentBlock> = self.blocks.iter().collect();
        ranked.sort_by_key(|block| Reverse(block.since()));
        ranked.first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    AwaitingCommentStart,
    InsideComment,
    AfterCommentGap,
    InsideSecondaryComment,
    Terminal,
}

/// Scan `lines` for the doc comment blocks preceding the first code line
///
/// Leading blank lines are skipped. After a block closes, only a line that
/// immediately opens another block continues the run; anything else ends
/// it. An unterminated trailing block is not reported. Returns `None` when
/// no complete block precedes the first code line.
#[must_use]
pub fn scan_doc_comments<S: AsRef<str>>(lines: &[S]) -> Option<CommentScan> {
    let mut state = ScanState::AwaitingCommentStart;
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut lines_consumed = 0;

    for (index, raw) in lines.iter().enumerate() {
        let line = raw.as_ref().trim();

        state = match state {
            ScanState::AwaitingCommentStart if line.is_empty() => ScanState::AwaitingCommentStart,
            ScanState::AwaitingCommentStart | ScanState::AfterCommentGap
                if line.starts_with(DOC_OPEN) =>
            {
                current.push(line.to_string());
                if line[DOC_OPEN.len()..].contains(DOC_CLOSE) {
                    blocks.push(CommentBlock {
                        lines: std::mem::take(&mut current),
                    });
                    lines_consumed = index + 1;
                    ScanState::AfterCommentGap
                } else if state == ScanState::AwaitingCommentStart {
                    ScanState::InsideComment
                } else {
                    ScanState::InsideSecondaryComment
                }
            }
            ScanState::InsideComment | ScanState::InsideSecondaryComment => {
                current.push(line.to_string());
                if line.ends_with(DOC_CLOSE) {
                    blocks.push(CommentBlock {
                        lines: std::mem::take(&mut current),
                    });
                    lines_consumed = index + 1;
                    ScanState::AfterCommentGap
                } else {
                    state
                }
            }
            _ => ScanState::Terminal,
        };

        if state == ScanState::Terminal {
            break;
        }
    }

    if blocks.is_empty() {
        return None;
    }

    Some(CommentScan {
        blocks,
        lines_consumed,
    })
}

/// Index of the line closing the comment opened on `lines[start]`
pub(crate) fn comment_end<S: AsRef<str>>(lines: &[S], start: usize) -> usize {
    for (index, line) in lines.iter().enumerate().skip(start) {
        let line = line.as_ref().trim();
        let body = if index == start {
            line.strip_prefix(DOC_OPEN).unwrap_or(line)
        } else {
            line
        };
        if body.contains(DOC_CLOSE) {
            return index;
        }
    }
    lines.len().saturating_sub(1)
}
