//! Tests for Neo4jClient
//!
//! These need a running Neo4j at `bolt://localhost:7687` and are ignored by
//! default: `cargo test -- --ignored`.

#![allow(clippy::unwrap_used)]

use serial_test::serial;

use crate::graph::materialize::Materializer;
use crate::graph::model::Label;
use crate::graph::neo4j::{Neo4jClient, Neo4jConfig};
use crate::graph::resolve::resolve_keys;
use crate::graph::store::GraphStore;
use crate::parser::unit::extract_unit;

async fn create_test_client() -> Neo4jClient {
    let config = Neo4jConfig::new("bolt://localhost:7687", "neo4j", "apigraph_dev_password");
    let client = Neo4jClient::connect(&config).await.unwrap();
    client.clear().await.unwrap();
    client
}

#[tokio::test]
#[serial]
#[ignore = "requires a running Neo4j"]
async fn test_connect_success() {
    let config = Neo4jConfig::new("bolt://localhost:7687", "neo4j", "apigraph_dev_password");

    assert!(Neo4jClient::connect(&config).await.is_ok());
}

#[tokio::test]
#[serial]
#[ignore = "requires a running Neo4j"]
async fn test_end_to_end_graph() {
    let client = create_test_client().await;
    let mut nodes = extract_unit("/** @kit Test */\nclass Foo {\n  bar(): void;\n}")
        .unwrap()
        .nodes;
    resolve_keys(&mut nodes);

    let materializer = Materializer::new(&client);
    materializer.materialize(&nodes).await.unwrap();
    let first = client.stats().await.unwrap();
    materializer.materialize(&nodes).await.unwrap();
    let second = client.stats().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.total_nodes(), 3);
    assert_eq!(second.edges_by_type.get("HAS_METHOD"), Some(&1));
    assert_eq!(second.edges_by_type.get("BELONGS_TO"), Some(&1));

    let method = client.find_node("Test.Foo.bar").await.unwrap().unwrap();
    assert_eq!(method.label, Some(Label::Method));
    assert_eq!(method.property("return_type"), Some("void"));

    let members = client.members_of("Test.Foo").await.unwrap();
    assert_eq!(members.len(), 1);
    let containers = client.containers_in_module("Test").await.unwrap();
    assert_eq!(containers[0].unique_key, "Test.Foo");

    client.clear().await.unwrap();
}
