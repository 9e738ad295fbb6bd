//! Recursive body walker
//!
//! A block's inner body is consumed one member at a time by a [`Cursor`].
//! Each step picks up the doc comment and decorators sitting on top of the
//! next member, then takes the shortest run of lines that closes every
//! brace, bracket and paren it opens. That run is one member: a single-line
//! leaf or a whole nested block, which is walked in turn.

use tracing::debug;

use super::balance::{is_comment_line, Balance};
use super::classify::{classify, Candidate};
use super::comment::{comment_end, scan_doc_comments, DocComment, DOC_OPEN};
use super::ParseError;
use crate::graph::model::{EntityKind, EntityNode, UNKNOWN_MODULE};

/// Deepest nesting level the walker descends to
pub const MAX_DEPTH: u32 = 64;

/// One member peeled off a body, with what was pending on top of it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Member {
    pub doc: Option<DocComment>,
    pub decorators: Vec<String>,
    /// Code lines of the member, newline-joined
    pub text: String,
}

/// Position inside a body plus the comment and decorators not yet attached
#[derive(Debug, Clone, Default)]
pub struct Cursor<'a> {
    remaining: &'a [&'a str],
    pending_comment: Option<DocComment>,
    pending_decorators: Vec<String>,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self {
            remaining: lines,
            ..Self::default()
        }
    }

    /// Lines not consumed yet
    #[must_use]
    pub const fn remaining(&self) -> &'a [&'a str] {
        self.remaining
    }

    /// Consume the doc comment run at the top, keeping the `@since` winner
    ///
    /// A later comment replaces an earlier pending one.
    #[must_use]
    pub fn take_comment(self) -> Self {
        match scan_doc_comments(self.remaining) {
            Some(scan) => Self {
                remaining: &self.remaining[scan.lines_consumed..],
                pending_comment: scan.select().map(|block| block.to_doc()),
                ..self
            },
            // Unterminated: drop the comment text and keep going after it
            None => self.skip_comment(),
        }
    }

    /// Consume decorator lines at the top
    ///
    /// A decorator whose argument list spans lines is taken until its
    /// brackets balance.
    #[must_use]
    pub fn take_decorators(mut self) -> Self {
        while let Some(first) = self.remaining.first() {
            if !first.trim().starts_with('@') {
                break;
            }
            let (taken, rest) = split_balanced(self.remaining);
            self.pending_decorators.push(join_trimmed(taken, " "));
            self.remaining = rest;
        }
        self
    }

    /// Take the next member, attaching whatever is pending
    #[must_use]
    pub fn take_member(self) -> Option<(Member, Self)> {
        if self.remaining.is_empty() {
            return None;
        }
        let (taken, rest) = split_balanced(self.remaining);
        let member = Member {
            doc: self.pending_comment,
            decorators: self.pending_decorators,
            text: join_trimmed(taken, "\n"),
        };
        Some((
            member,
            Self {
                remaining: rest,
                ..Self::default()
            },
        ))
    }

    /// Advance to and peel the next member declaration
    ///
    /// Blank lines, plain comments and stray closing brackets between
    /// members are skipped.
    #[must_use]
    pub fn next_member(mut self) -> Option<(Member, Self)> {
        loop {
            let line = self.remaining.first()?.trim();
            self = if line.is_empty() || is_closing_residue(line) {
                self.skip_lines(1)
            } else if line.starts_with(DOC_OPEN) {
                self.take_comment()
            } else if line.starts_with('@') {
                self.take_decorators()
            } else if line.starts_with("/*") {
                self.skip_comment()
            } else if is_comment_line(line) {
                self.skip_lines(1)
            } else {
                return self.take_member();
            };
        }
    }

    fn skip_lines(self, count: usize) -> Self {
        Self {
            remaining: self.remaining.get(count..).unwrap_or_default(),
            ..self
        }
    }

    fn skip_comment(self) -> Self {
        let end = comment_end(self.remaining, 0);
        self.skip_lines(end + 1)
    }
}

/// Split off the shortest prefix whose brackets all balance
fn split_balanced<'a>(lines: &'a [&'a str]) -> (&'a [&'a str], &'a [&'a str]) {
    let mut balance = Balance::default();
    for (index, line) in lines.iter().enumerate() {
        balance.add_line(line);
        if balance.is_closed() {
            return lines.split_at(index + 1);
        }
    }
    (lines, &[])
}

fn join_trimmed(lines: &[&str], separator: &str) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// `}`, `};`, `)` and friends left over after a nested body
fn is_closing_residue(line: &str) -> bool {
    line.chars()
        .all(|c| matches!(c, '}' | ']' | ')' | ';' | ',') || c.is_whitespace())
}

/// Build the node for a peeled member
///
/// Members that match no classifier rule keep their first code line as
/// `source_text` so they still reach the graph.
#[must_use]
pub fn entity_node(
    member: &Member,
    parent: Option<&str>,
    depth: u32,
    module: Option<String>,
) -> EntityNode {
    let doc = member.doc.clone().unwrap_or_default();
    let mut node = EntityNode {
        parent_name: parent.map(str::to_string),
        module,
        depth,
        description: doc.description,
        metadata_tags: doc.metadata_tags,
        decorators: member.decorators.clone(),
        ..EntityNode::default()
    };

    let candidate = Candidate::new(&member.text, parent);
    match classify(&candidate) {
        Some(entity) => entity.apply_to(&mut node),
        None => {
            debug!(line = candidate.head(), "Unclassified member");
            node.source_text = Some(candidate.head().to_string());
        }
    }
    node
}

/// Whether a member's text carries a body worth descending into
///
/// Only multi-line text whose first line opens a brace has one. A
/// semicolon-terminated method is a signature, never a body.
fn opens_body(text: &str, node: &EntityNode) -> bool {
    let mut lines = text.lines();
    let first_opens = lines.next().is_some_and(|line| line.contains('{'));
    let multi_line = lines.next().is_some();
    let signature_only = node.kind == Some(EntityKind::Method) && text.trim_end().ends_with(';');
    first_opens && multi_line && !signature_only
}

/// Text between the first `{` and the last `}`
fn inner_body(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open + 1..close])
}

fn prefix_of(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

/// Emit `node`, then walk every member of its body
///
/// `text` is the member's code, header line through closing brace. Nested
/// members get `depth + 1`, the node's name as parent and an unknown
/// module.
///
/// # Errors
///
/// [`ParseError::UnbalancedBlock`] when braces in a body do not pair up,
/// [`ParseError::NestingTooDeep`] past [`MAX_DEPTH`]. Nodes already pushed
/// to `out` are left there; callers discard them.
pub fn walk_block(text: &str, node: EntityNode, out: &mut Vec<EntityNode>) -> Result<(), ParseError> {
    if node.depth > MAX_DEPTH {
        return Err(ParseError::NestingTooDeep {
            prefix: prefix_of(text),
            depth: node.depth,
        });
    }

    let descend = opens_body(text, &node);
    let enclosing = node.key_segment().to_string();
    let depth = node.depth;
    out.push(node);

    if !descend {
        return Ok(());
    }

    let unbalanced = || ParseError::UnbalancedBlock {
        prefix: prefix_of(text),
    };
    if Balance::of_text(text).braces != 0 {
        return Err(unbalanced());
    }
    let body = inner_body(text).ok_or_else(unbalanced)?;

    let lines: Vec<&str> = body.lines().collect();
    let mut cursor = Cursor::new(&lines);
    while let Some((member, next)) = cursor.next_member() {
        cursor = next;
        let child = entity_node(
            &member,
            Some(&enclosing),
            depth + 1,
            Some(UNKNOWN_MODULE.to_string()),
        );
        walk_block(&member.text, child, out)?;
    }

    Ok(())
}

/// Classify a member and walk it; unit-level entry point
///
/// # Errors
///
/// See [`walk_block`].
pub fn walk_member(
    member: &Member,
    parent: &str,
    depth: u32,
    module: Option<String>,
    out: &mut Vec<EntityNode>,
) -> Result<(), ParseError> {
    let node = entity_node(member, Some(parent), depth, module);
    walk_block(&member.text, node, out)
}

