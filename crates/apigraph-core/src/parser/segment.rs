//! Block segmenter: splits a source unit into top-level blocks
//! and standalone declarations

use once_cell::sync::Lazy;
use regex::Regex;

use super::balance::{is_comment_line, Balance};
use super::comment::{comment_end, DOC_CLOSE, DOC_OPEN};

static STRUCTURAL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\b(class|interface|enum|namespace|struct)\b").ok());
static EXPORT_GROUP_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^export\s*\{[\s\S]*\}\s*;?$").ok());

/// Output of [`segment`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Top-level blocks, each with its leading doc comment and decorators
    pub blocks: Vec<String>,
    /// Semicolon-terminated statements outside any block
    pub declarations: Vec<String>,
}

/// Whether a line opens a class/interface/enum/namespace/struct body
#[must_use]
pub fn opens_structural_block(line: &str) -> bool {
    line.contains('{')
        && STRUCTURAL_RE
            .as_ref()
            .is_some_and(|re| re.is_match(line))
}

/// Partition a header- and import-stripped source unit
#[must_use]
pub fn segment(code: &str) -> Segments {
    let lines: Vec<&str> = code.lines().collect();
    let mut consumed = vec![false; lines.len()];
    let mut blocks = Vec::new();
    let mut pending: Option<usize> = None;
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index].trim();

        if line.is_empty() {
            index += 1;
        } else if line.starts_with(DOC_OPEN) {
            pending.get_or_insert(index);
            index = comment_end(&lines, index) + 1;
        } else if line.starts_with('@') {
            pending.get_or_insert(index);
            index += 1;
        } else if opens_structural_block(line) {
            let start = pending.take().unwrap_or(index);
            let end = block_end(&lines, index);
            consumed[start..=end].iter_mut().for_each(|c| *c = true);
            blocks.push(lines[start..=end].join("\n").trim().to_string());
            index = end + 1;
        } else {
            // Orphaned comment/decorators stay behind for the declarations
            pending = None;
            index += 1;
        }
    }

    let ends_with_export_group = blocks.last().is_some_and(|last| {
        EXPORT_GROUP_RE
            .as_ref()
            .is_some_and(|re| re.is_match(last.trim()))
    });
    if ends_with_export_group {
        blocks.pop();
    }

    let leftover = lines
        .iter()
        .zip(&consumed)
        .filter(|(_, used)| !**used)
        .map(|(line, _)| *line);

    Segments {
        blocks,
        declarations: split_declarations(leftover),
    }
}

/// Index of the line where the block opened on `lines[start]` closes
fn block_end(lines: &[&str], start: usize) -> usize {
    let mut balance = Balance::default();
    for (index, line) in lines.iter().enumerate().skip(start) {
        balance.add_line(line);
        if balance.braces <= 0 {
            return index;
        }
    }
    lines.len().saturating_sub(1)
}

/// Group loose lines into statements ending in `;`
///
/// A statement only ends once every brace, bracket and paren it opened is
/// closed again, so `;` inside an object type or a parameter list does not
/// split it. Doc comments are never split either.
fn split_declarations<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut declarations = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut balance = Balance::default();
    let mut in_comment = false;

    for line in lines.map(str::trim).filter(|l| !l.is_empty()) {
        buffer.push(line);

        if in_comment {
            in_comment = !line.contains(DOC_CLOSE);
            continue;
        }
        if line.starts_with("/*") {
            in_comment = !line[2..].contains(DOC_CLOSE);
            continue;
        }
        if is_comment_line(line) {
            continue;
        }
        balance.add_line(line);
        if line.ends_with(';') && balance.is_closed() {
            declarations.push(buffer.join("\n"));
            buffer.clear();
            balance = Balance::default();
        }
    }

    if !buffer.is_empty() {
        declarations.push(buffer.join("\n"));
    }

    declarations
}
