//! Source-unit driver
//!
//! Turns one declaration file into its ordered node list: module root
//! first, then every top-level block walked in order, then the standalone
//! declarations.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::comment::DOC_CLOSE;
use super::segment::segment;
use super::walker::{entity_node, walk_member, Cursor};
use crate::graph::model::{EntityNode, NodeList};

static MARKER_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"@kit\b([^\n]*)").ok());
static IMPORT_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^import\b\s*[^(\s]").ok());
static IMPORT_END_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#";\s*$|\bfrom\s*['"][^'"]*['"]|^import\s*['"]"#).ok());
static PLUMBING_RE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^export\s*(?:default\s+[\w$.]+\s*;?$|\{|\*|=)").ok()
});

/// Module name declared in a unit's header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMarker {
    /// Marker value with whitespace runs replaced by dots
    pub name: String,
    /// Byte offset just past the header comment carrying the marker
    pub header_end: usize,
}

/// Find the module marker of a unit
///
/// The value runs to the end of the marker's line, minus any closing
/// `*/`. Returns `None` when there is no marker or its value is empty.
#[must_use]
pub fn module_marker(text: &str) -> Option<ModuleMarker> {
    let caps = MARKER_RE.as_ref()?.captures(text)?;
    let value = caps.get(1)?;

    let raw = value.as_str();
    let raw = raw.find(DOC_CLOSE).map_or(raw, |end| &raw[..end]);
    let name = raw.split_whitespace().collect::<Vec<_>>().join(".");
    if name.is_empty() {
        return None;
    }

    let header_end = text[value.start()..]
        .find(DOC_CLOSE)
        .map_or(value.end(), |offset| value.start() + offset + DOC_CLOSE.len());

    Some(ModuleMarker { name, header_end })
}

/// Remove `import` statements, including ones spanning several lines
#[must_use]
pub fn strip_imports(code: &str) -> String {
    let is_import = |line: &str| IMPORT_RE.as_ref().is_some_and(|re| re.is_match(line));
    let ends_import = |line: &str| IMPORT_END_RE.as_ref().map_or(true, |re| re.is_match(line));

    let mut kept = Vec::new();
    let mut in_import = false;
    for line in code.lines() {
        let trimmed = line.trim();
        if in_import || is_import(trimmed) {
            in_import = !ends_import(trimmed);
        } else {
            kept.push(line);
        }
    }
    kept.join("\n")
}

/// Whether a standalone declaration only re-exports other entities
fn is_plumbing(text: &str) -> bool {
    PLUMBING_RE
        .as_ref()
        .is_some_and(|re| re.is_match(text.trim_start()))
}

/// Extract the node list of one source unit
///
/// Returns `None` for a unit without a module marker. A block that fails
/// to walk is logged and dropped with everything it produced; the rest of
/// the unit is unaffected.
#[must_use]
pub fn extract_unit(text: &str) -> Option<NodeList> {
    let marker = module_marker(text)?;
    let module = marker.name;
    let code = strip_imports(&text[marker.header_end..]);
    let segments = segment(&code);

    let mut nodes = vec![EntityNode::module_root(module.clone())];
    for block in &segments.blocks {
        extract_top_level(block, &module, false, &mut nodes);
    }
    for declaration in &segments.declarations {
        extract_top_level(declaration, &module, true, &mut nodes);
    }

    debug!(
        module = %module,
        blocks = segments.blocks.len(),
        declarations = segments.declarations.len(),
        nodes = nodes.len(),
        "Extracted source unit"
    );

    Some(NodeList {
        module,
        source_path: None,
        content_hash: None,
        nodes,
    })
}

/// Walk every member of a top-level segment into `out`
///
/// Standalone declarations are leaves: an object type in a type alias or a
/// parameter list is part of the declaration, not a body.
fn extract_top_level(text: &str, module: &str, standalone: bool, out: &mut Vec<EntityNode>) {
    let lines: Vec<&str> = text.lines().collect();
    let mut cursor = Cursor::new(&lines);

    while let Some((member, next)) = cursor.next_member() {
        cursor = next;
        if standalone {
            if !is_plumbing(&member.text) {
                out.push(entity_node(&member, Some(module), 1, Some(module.to_string())));
            }
            continue;
        }

        let mut produced = Vec::new();
        match walk_member(&member, module, 1, Some(module.to_string()), &mut produced) {
            Ok(()) => out.append(&mut produced),
            Err(error) => warn!(%error, module, "Block extraction failed, skipping block"),
        }
    }
}
