//! Tests for batch loading of node-list documents

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::graph::convert::NodeUpsert;
use crate::graph::load::{
    discover_documents, load_directory, load_node_lists, read_document, LoadError, LoadOptions,
};
use crate::graph::memory::MemoryStore;
use crate::graph::model::{Label, NodeList};
use crate::graph::store::GraphStore;
use crate::parser::unit::extract_unit;

const FOO: &str = "/** @kit Test */\nclass Foo {\n  bar(): void;\n}";
const NET: &str = "/** @kit Net Kit */\ninterface Socket {\n  close(): void;\n  port: number;\n}";

fn write_document(dir: &Path, relative: &str, source: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let list = extract_unit(source).unwrap();
    fs::write(path, serde_json::to_string_pretty(&list).unwrap()).unwrap();
}

#[test]
fn test_discover_documents_sorted_json_only() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), "b/net.json", NET);
    write_document(dir.path(), "a.json", FOO);
    fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

    let found = discover_documents(dir.path());

    assert_eq!(
        found,
        vec![dir.path().join("a.json"), dir.path().join("b/net.json")]
    );
    assert_eq!(
        discover_documents(&dir.path().join("a.json")),
        vec![dir.path().join("a.json")]
    );
}

#[test]
fn test_read_document_rejects_non_mapping() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("list.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let err = read_document(&path).unwrap_err();
    assert!(matches!(
        &err,
        LoadError::MalformedInputFile { path: bad, reason }
            if *bad == path && reason.contains("mapping")
    ));
}

#[test]
fn test_read_document_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"module\": ").unwrap();

    assert!(matches!(
        read_document(&path),
        Err(LoadError::MalformedInputFile { .. })
    ));
}

#[tokio::test]
async fn test_malformed_files_do_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), "a.json", FOO);
    fs::write(dir.path().join("b.json"), "not json at all").unwrap();
    fs::write(dir.path().join("c.json"), "\"just a string\"").unwrap();
    write_document(dir.path(), "d.json", NET);

    let store = MemoryStore::new();
    let summary = load_directory(&store, dir.path(), &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.documents, 4);
    assert_eq!(summary.loaded, 2);
    assert_eq!(summary.malformed, 2);
    assert_eq!(summary.failed, 0);
    assert!(store.find_node("Test.Foo.bar").await.unwrap().is_some());
    assert!(store.find_node("Net.Kit.Socket.port").await.unwrap().is_some());
}

#[tokio::test]
async fn test_clear_runs_before_first_document_only() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), "a.json", FOO);
    write_document(dir.path(), "b.json", NET);

    let store = MemoryStore::new();
    store
        .upsert_node(&NodeUpsert::module("Stale"))
        .await
        .unwrap();

    let options = LoadOptions {
        clear: true,
        ..LoadOptions::default()
    };
    load_directory(&store, dir.path(), &options).await.unwrap();

    assert!(store.find_node("Stale").await.unwrap().is_none());
    assert!(store.find_node("Test").await.unwrap().is_some());
    assert!(store.find_node("Net.Kit").await.unwrap().is_some());
}

#[tokio::test]
async fn test_without_clear_existing_nodes_stay() {
    let dir = TempDir::new().unwrap();
    write_document(dir.path(), "a.json", FOO);

    let store = MemoryStore::new();
    store
        .upsert_node(&NodeUpsert::module("Stale"))
        .await
        .unwrap();
    load_directory(&store, dir.path(), &LoadOptions::default())
        .await
        .unwrap();

    assert!(store.find_node("Stale").await.unwrap().is_some());
}

#[tokio::test]
async fn test_concurrent_jobs_match_sequential() {
    let lists: Vec<NodeList> = [FOO, NET]
        .into_iter()
        .map(|source| extract_unit(source).unwrap())
        .collect();

    let sequential = MemoryStore::new();
    let parallel = MemoryStore::new();
    let one = load_node_lists(&sequential, lists.clone(), &LoadOptions::default())
        .await
        .unwrap();
    let four = load_node_lists(
        &parallel,
        lists,
        &LoadOptions {
            jobs: 4,
            ..LoadOptions::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(one, four);
    assert_eq!(sequential.stats().await.unwrap(), parallel.stats().await.unwrap());
    assert_eq!(
        parallel.nodes_with_label(Label::Module).await.unwrap().len(),
        2
    );
}
