//! Tests for graph model types

#![allow(clippy::unwrap_used)]

use rstest::rstest;

use crate::graph::model::{EdgeKind, EntityKind, EntityNode, Label, NodeList, UNKNOWN_MODULE};

#[rstest]
#[case(EdgeKind::Has(Some(EntityKind::Method)), "HAS_METHOD")]
#[case(EdgeKind::Has(Some(EntityKind::EnumMember)), "HAS_ENUM_MEMBER")]
#[case(EdgeKind::Has(Some(EntityKind::CallSignature)), "HAS_CALL_SIGNATURE")]
#[case(EdgeKind::Has(None), "HAS_UNCLASSIFIED")]
#[case(EdgeKind::BelongsTo, "BELONGS_TO")]
fn test_edge_kind_display(#[case] kind: EdgeKind, #[case] expected: &str) {
    assert_eq!(kind.to_string(), expected);
}

#[test]
fn test_label_names_round_trip() {
    for label in Label::ALL {
        assert_eq!(Label::from_name(label.as_str()), Some(label));
    }
    assert_eq!(Label::from_name("Symbol"), None);
}

#[test]
fn test_structural_kinds_map_to_container_labels() {
    let kinds = [
        EntityKind::Module,
        EntityKind::Class,
        EntityKind::Interface,
        EntityKind::Namespace,
        EntityKind::Enum,
        EntityKind::Struct,
        EntityKind::Method,
        EntityKind::Property,
        EntityKind::CallSignature,
        EntityKind::EnumMember,
        EntityKind::TypeAlias,
        EntityKind::ExportImport,
    ];
    for kind in kinds {
        assert_eq!(kind.is_structural(), kind.label().is_container(), "{kind}");
    }
    assert!(!Label::Module.is_container());
    assert!(!Label::Unclassified.is_container());
}

#[test]
fn test_key_segment_fallbacks() {
    let named = EntityNode {
        name: Some("bar".into()),
        ..EntityNode::default()
    };
    let signature = EntityNode {
        kind: Some(EntityKind::CallSignature),
        signature: Some("(x: number): string".into()),
        ..EntityNode::default()
    };
    let unclassified = EntityNode {
        source_text: Some("weird thing".into()),
        ..EntityNode::default()
    };

    assert_eq!(named.key_segment(), "bar");
    assert_eq!(signature.key_segment(), "(x: number): string");
    assert_eq!(unclassified.key_segment(), "weird thing");
    assert_eq!(unclassified.label(), Label::Unclassified);
    assert_eq!(EntityNode::default().key_segment(), "");
}

#[test]
fn test_known_module_filters_sentinel() {
    let mut node = EntityNode::default();
    assert_eq!(node.known_module(), None);

    node.module = Some(UNKNOWN_MODULE.into());
    assert_eq!(node.known_module(), None);

    node.module = Some("Test".into());
    assert_eq!(node.known_module(), Some("Test"));
}

#[test]
fn test_node_list_reads_sparse_documents() {
    let json = r#"{
        "module": "Test",
        "nodes": [
            {"kind": "module", "name": "Test"},
            {"kind": "enum_member", "name": "A", "value": "1", "parent_name": "E", "depth": 2},
            {"source_text": "???"}
        ]
    }"#;

    let list: NodeList = serde_json::from_str(json).unwrap();
    assert_eq!(list.module, "Test");
    assert_eq!(list.source_path, None);
    assert_eq!(list.nodes[1].kind, Some(EntityKind::EnumMember));
    assert_eq!(list.nodes[1].depth, 2);
    assert_eq!(list.nodes[2].kind, None);
    assert_eq!(list.nodes[2].description, "");
}

#[test]
fn test_module_root_shape() {
    let root = EntityNode::module_root("Net.Kit");
    assert_eq!(root.kind, Some(EntityKind::Module));
    assert_eq!(root.name.as_deref(), Some("Net.Kit"));
    assert_eq!(root.depth, 0);
    assert!(root.parent_name.is_none());
    assert!(root.module.is_none());
}
