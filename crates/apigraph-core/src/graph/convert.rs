//! Conversion from resolved entity nodes to store writes

use std::collections::{BTreeMap, HashMap, HashSet};

use super::model::{Edge, EdgeKind, EntityNode, Label};

/// Properties a materialized node may carry besides `unique_key` and `name`
pub const NODE_PROPERTIES: [&str; 10] = [
    "kind",
    "description",
    "metadata",
    "decorators",
    "return_type",
    "property_type",
    "supertype",
    "aliased_to",
    "value",
    "source_text",
];

/// Kind recorded for nodes no classifier rule matched
pub const UNCLASSIFIED: &str = "unclassified";

/// One node write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUpsert {
    pub unique_key: String,
    pub label: Label,
    pub name: String,
    pub properties: BTreeMap<String, String>,
}

impl NodeUpsert {
    /// Bare module node, as ensured before a membership edge
    #[must_use]
    pub fn module(name: &str) -> Self {
        Self {
            unique_key: name.to_string(),
            label: Label::Module,
            name: name.to_string(),
            properties: BTreeMap::new(),
        }
    }
}

/// One store write, in the order it must be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphWrite {
    Node(NodeUpsert),
    Edge(Edge),
}

/// Build the node write for a resolved entity
///
/// Returns `None` for a node without a key or a name.
#[must_use]
pub fn node_upsert(node: &EntityNode) -> Option<NodeUpsert> {
    let unique_key = node.unique_key.clone()?;
    let name = node.key_segment();
    if name.is_empty() {
        return None;
    }

    let mut properties = BTreeMap::new();
    properties.insert(
        "kind".to_string(),
        node.kind
            .map_or_else(|| UNCLASSIFIED.to_string(), |kind| kind.to_string()),
    );
    properties.insert("description".to_string(), node.description.clone());
    properties.insert("metadata".to_string(), node.metadata_tags.join("\n"));
    if !node.decorators.is_empty() {
        properties.insert("decorators".to_string(), node.decorators.join("\n"));
    }

    let optional = [
        ("return_type", &node.return_type),
        ("property_type", &node.property_type),
        ("supertype", &node.supertype),
        ("aliased_to", &node.aliased_to),
        ("value", &node.value),
        ("source_text", &node.source_text),
    ];
    for (key, value) in optional
        .into_iter()
        .filter_map(|(key, value)| Some((key, value.as_ref()?)))
    {
        properties.insert(key.to_string(), value.clone());
    }

    Some(NodeUpsert {
        unique_key,
        label: node.label(),
        name: name.to_string(),
        properties,
    })
}

/// Plan every write for one resolved node list
///
/// Per node, in document order: the node itself; a containment edge from
/// its parent when the parent is a container and the node's module is
/// unknown; then the module node and a membership edge when the module is
/// known.
#[must_use]
pub fn graph_writes(nodes: &[EntityNode]) -> Vec<GraphWrite> {
    let labels: HashMap<&str, Label> = nodes
        .iter()
        .filter_map(|n| Some((n.unique_key.as_deref()?, n.label())))
        .collect();

    let mut modules_seen: HashSet<&str> = HashSet::new();
    let mut writes = Vec::new();

    for node in nodes {
        let Some(upsert) = node_upsert(node) else {
            continue;
        };
        let key = upsert.unique_key.clone();
        let label = upsert.label;
        writes.push(GraphWrite::Node(upsert));

        let container = node
            .parent_name
            .as_deref()
            .and_then(|parent| Some((parent, *labels.get(parent)?)))
            .filter(|(_, parent_label)| parent_label.is_container());

        match (node.known_module(), container) {
            (None, Some((parent, parent_label))) => {
                writes.push(GraphWrite::Edge(Edge {
                    source_key: parent.to_string(),
                    source_label: parent_label,
                    target_key: key,
                    target_label: label,
                    kind: EdgeKind::Has(node.kind),
                }));
            }
            (Some(module), _) => {
                if modules_seen.insert(module) {
                    writes.push(GraphWrite::Node(NodeUpsert::module(module)));
                }
                writes.push(GraphWrite::Edge(Edge {
                    source_key: key,
                    source_label: label,
                    target_key: module.to_string(),
                    target_label: Label::Module,
                    kind: EdgeKind::BelongsTo,
                }));
            }
            (None, None) => {}
        }
    }

    writes
}
