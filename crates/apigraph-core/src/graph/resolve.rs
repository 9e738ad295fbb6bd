//! Key resolution
//!
//! Assigns every node of a flat list a hierarchy-qualified `unique_key`
//! (`Module.Class.member`) and rewrites `parent_name` from a bare name to
//! the parent's key.
//!
//! Keys are a pure function of the list: the same input always yields the
//! same keys. Nodes that would collide get a `#n` suffix in document order
//! (`Test.Foo`, `Test.Foo#2`), so keys are unique within one list.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::model::EntityNode;

/// Non-fatal problem met while rewriting a parent reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveWarning {
    /// Several nodes carry the parent's name and none has it as its key tail
    AmbiguousParent {
        node_key: String,
        parent_name: String,
        candidates: usize,
    },
    /// No node carries the parent's name
    UnresolvedParent {
        node_key: String,
        parent_name: String,
    },
}

impl std::fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousParent {
                node_key,
                parent_name,
                candidates,
            } => write!(
                f,
                "{node_key}: parent '{parent_name}' matches {candidates} nodes, none exactly"
            ),
            Self::UnresolvedParent {
                node_key,
                parent_name,
            } => write!(f, "{node_key}: parent '{parent_name}' not found"),
        }
    }
}

/// Provisional key: `parent_name.segment`, or the bare segment at the root
fn provisional_key(node: &EntityNode) -> String {
    match node.parent_name.as_deref() {
        Some(parent) if !parent.is_empty() => format!("{parent}.{}", node.key_segment()),
        _ => node.key_segment().to_string(),
    }
}

/// Whether `key` ends with the whole of `name` as its final path segment
fn has_key_tail(key: &str, name: &str) -> bool {
    key == name
        || key
            .strip_suffix(name)
            .is_some_and(|head| head.ends_with('.'))
}

/// Index of the node `index` hangs under, among the nodes before it
///
/// The nearest earlier node one level up carrying the parent's name wins;
/// then a node whose provisional key equals the reference (already
/// qualified input); then the nearest earlier node with that name.
fn structural_parent(
    nodes: &[EntityNode],
    index: usize,
    provisional: &HashMap<&str, usize>,
) -> Option<usize> {
    let node = &nodes[index];
    let parent = node.parent_name.as_deref()?;
    let earlier = &nodes[..index];
    let named = |n: &EntityNode| n.key_segment() == parent;

    earlier
        .iter()
        .rposition(|n| named(n) && n.depth + 1 == node.depth)
        .or_else(|| provisional.get(parent).copied().filter(|&p| p < index))
        .or_else(|| earlier.iter().rposition(named))
}

/// Populate `unique_key` and rewrite `parent_name` on every node
///
/// Returns the warnings raised while rewriting parents; each is also
/// logged. A node whose parent cannot be pinned down keeps its bare
/// parent name.
pub fn resolve_keys(nodes: &mut [EntityNode]) -> Vec<ResolveWarning> {
    let provisional_keys: Vec<String> = nodes.iter().map(provisional_key).collect();
    let mut provisional: HashMap<&str, usize> = HashMap::new();
    for (index, key) in provisional_keys.iter().enumerate() {
        provisional.entry(key.as_str()).or_insert(index);
    }

    // Parents always come first, so one forward pass sees every parent key
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(nodes.len());
    let mut keys: Vec<String> = Vec::with_capacity(nodes.len());
    let mut used: HashSet<String> = HashSet::new();

    for index in 0..nodes.len() {
        let parent = structural_parent(nodes, index, &provisional);
        let segment = nodes[index].key_segment();
        let base = match (parent, nodes[index].parent_name.as_deref()) {
            (Some(p), _) => format!("{}.{segment}", keys[p]),
            (None, Some(name)) if !name.is_empty() => format!("{name}.{segment}"),
            _ => segment.to_string(),
        };

        let key = unique(&base, &used);
        used.insert(key.clone());
        keys.push(key);
        parents.push(parent);
    }

    let mut warnings = Vec::new();
    let view: &[EntityNode] = nodes;
    let rewritten: Vec<Option<String>> = (0..view.len())
        .map(|index| rewrite_parent(view, &keys, &used, index, parents[index], &mut warnings))
        .collect();

    for ((node, key), parent) in nodes.iter_mut().zip(keys).zip(rewritten) {
        node.unique_key = Some(key);
        if parent.is_some() {
            node.parent_name = parent;
        }
    }

    for warning in &warnings {
        warn!(%warning, "Parent reference left unresolved");
    }
    warnings
}

fn unique(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}#{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Resolved parent reference for one node, or `None` to keep it as is
fn rewrite_parent(
    nodes: &[EntityNode],
    keys: &[String],
    used: &HashSet<String>,
    index: usize,
    structural: Option<usize>,
    warnings: &mut Vec<ResolveWarning>,
) -> Option<String> {
    let parent = nodes[index].parent_name.as_deref()?;
    let candidates: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.key_segment() == parent)
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [only] => Some(keys[*only].clone()),
        [] if used.contains(parent) => None,
        [] => {
            warnings.push(ResolveWarning::UnresolvedParent {
                node_key: keys[index].clone(),
                parent_name: parent.to_string(),
            });
            None
        }
        many => {
            let exact: Vec<usize> = many
                .iter()
                .copied()
                .filter(|&i| has_key_tail(&keys[i], parent))
                .collect();
            let chosen = structural
                .filter(|s| exact.contains(s))
                .or_else(|| exact.first().copied());
            if chosen.is_none() {
                warnings.push(ResolveWarning::AmbiguousParent {
                    node_key: keys[index].clone(),
                    parent_name: parent.to_string(),
                    candidates: many.len(),
                });
            }
            chosen.map(|i| keys[i].clone())
        }
    }
}
