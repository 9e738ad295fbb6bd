//! Tests for MemoryStore

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use crate::graph::convert::NodeUpsert;
use crate::graph::memory::MemoryStore;
use crate::graph::model::{Edge, EdgeKind, EntityKind, Label};
use crate::graph::store::GraphStore;

fn upsert(label: Label, key: &str, properties: &[(&str, &str)]) -> NodeUpsert {
    NodeUpsert {
        unique_key: key.to_string(),
        label,
        name: key.rsplit('.').next().unwrap_or(key).to_string(),
        properties: properties
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn has_method(source: &str, target: &str) -> Edge {
    Edge {
        source_key: source.to_string(),
        source_label: Label::Class,
        target_key: target.to_string(),
        target_label: Label::Method,
        kind: EdgeKind::Has(Some(EntityKind::Method)),
    }
}

fn belongs_to(source: &str, label: Label, module: &str) -> Edge {
    Edge {
        source_key: source.to_string(),
        source_label: label,
        target_key: module.to_string(),
        target_label: Label::Module,
        kind: EdgeKind::BelongsTo,
    }
}

#[tokio::test]
async fn test_upsert_merges_properties() {
    let store = MemoryStore::new();
    store
        .upsert_node(&upsert(Label::Class, "T.Foo", &[("kind", "class"), ("score", "0.5")]))
        .await
        .unwrap();
    store
        .upsert_node(&upsert(Label::Class, "T.Foo", &[("description", "A foo.")]))
        .await
        .unwrap();

    let node = store.find_node("T.Foo").await.unwrap().unwrap();
    assert_eq!(store.node_count().await, 1);
    assert_eq!(node.label, Some(Label::Class));
    assert_eq!(node.name, "Foo");
    assert_eq!(node.property("score"), Some("0.5"));
    assert_eq!(node.property("description"), Some("A foo."));
}

#[tokio::test]
async fn test_edge_requires_both_endpoints() {
    let store = MemoryStore::new();
    store
        .upsert_node(&upsert(Label::Class, "T.Foo", &[]))
        .await
        .unwrap();

    store.merge_edge(&has_method("T.Foo", "T.Foo.bar")).await.unwrap();
    assert_eq!(store.edge_count().await, 0);

    store
        .upsert_node(&upsert(Label::Method, "T.Foo.bar", &[]))
        .await
        .unwrap();
    store.merge_edge(&has_method("T.Foo", "T.Foo.bar")).await.unwrap();
    store.merge_edge(&has_method("T.Foo", "T.Foo.bar")).await.unwrap();
    assert_eq!(store.edge_count().await, 1);
}

#[tokio::test]
async fn test_same_key_under_different_labels() {
    let store = MemoryStore::new();
    store
        .upsert_node(&upsert(Label::Namespace, "T.x", &[]))
        .await
        .unwrap();
    store
        .upsert_node(&upsert(Label::Method, "T.x", &[]))
        .await
        .unwrap();

    assert_eq!(store.node_count().await, 2);
    assert_eq!(store.nodes_with_label(Label::Method).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_module_reads() {
    let store = MemoryStore::new();
    for node in [
        upsert(Label::Module, "T", &[]),
        upsert(Label::Class, "T.Foo", &[]),
        upsert(Label::TypeAlias, "T.Id", &[]),
        upsert(Label::Method, "T.Foo.bar", &[]),
        upsert(Label::Method, "T.Foo.baz", &[]),
    ] {
        store.upsert_node(&node).await.unwrap();
    }
    for edge in [
        belongs_to("T.Foo", Label::Class, "T"),
        belongs_to("T.Id", Label::TypeAlias, "T"),
        has_method("T.Foo", "T.Foo.baz"),
        has_method("T.Foo", "T.Foo.bar"),
    ] {
        store.merge_edge(&edge).await.unwrap();
    }

    let in_module: Vec<String> = store
        .nodes_in_module("T")
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.unique_key)
        .collect();
    assert_eq!(in_module, vec!["T.Foo", "T.Id"]);

    let members: Vec<String> = store
        .members_of("T.Foo")
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.unique_key)
        .collect();
    assert_eq!(members, vec!["T.Foo.bar", "T.Foo.baz"]);

    let containers = store.containers_in_module("T").await.unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].unique_key, "T.Foo");

    assert!(store.nodes_in_module("Other").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stats_and_clear() {
    let store = MemoryStore::new();
    store.upsert_node(&upsert(Label::Module, "T", &[])).await.unwrap();
    store.upsert_node(&upsert(Label::Class, "T.Foo", &[])).await.unwrap();
    store.upsert_node(&upsert(Label::Method, "T.Foo.bar", &[])).await.unwrap();
    store.merge_edge(&belongs_to("T.Foo", Label::Class, "T")).await.unwrap();
    store.merge_edge(&has_method("T.Foo", "T.Foo.bar")).await.unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.total_nodes(), 3);
    assert_eq!(stats.total_edges(), 2);
    assert_eq!(stats.nodes_by_label.get("Class"), Some(&1));
    assert_eq!(stats.edges_by_type.get("HAS_METHOD"), Some(&1));
    assert_eq!(stats.edges_by_type.get("BELONGS_TO"), Some(&1));

    store.clear().await.unwrap();
    assert_eq!(store.node_count().await, 0);
    assert_eq!(store.edge_count().await, 0);
    assert!(store.find_node("T").await.unwrap().is_none());
}
