//! Tests for the source-unit driver

use std::fmt::Write;

use crate::graph::model::EntityKind;
use crate::parser::unit::{extract_unit, module_marker, strip_imports};

#[test]
fn test_end_to_end_example() {
    let list = extract_unit("/** @kit Test */\nclass Foo {\n  bar(): void;\n}").unwrap();

    assert_eq!(list.module, "Test");
    let summary: Vec<(Option<EntityKind>, &str, Option<&str>, u32)> = list
        .nodes
        .iter()
        .map(|n| (n.kind, n.key_segment(), n.parent_name.as_deref(), n.depth))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some(EntityKind::Module), "Test", None, 0),
            (Some(EntityKind::Class), "Foo", Some("Test"), 1),
            (Some(EntityKind::Method), "bar", Some("Foo"), 2),
        ]
    );
    assert_eq!(list.nodes[2].return_type.as_deref(), Some("void"));
    assert_eq!(list.nodes[1].module.as_deref(), Some("Test"));
    assert!(list.nodes[2].known_module().is_none());
}

#[test]
fn test_unit_without_marker_is_skipped() {
    assert!(extract_unit("declare class Foo {\n  bar(): void;\n}").is_none());
    assert!(extract_unit("/** @kit */\nclass Foo {\n}").is_none());
}

#[test]
fn test_module_marker_maps_spaces_to_dots() {
    let marker = module_marker("/**\n * @kit Ability  Kit\n */\nclass A {\n}").unwrap();
    assert_eq!(marker.name, "Ability.Kit");

    let marker = module_marker("/** @kit ArkUI */").unwrap();
    assert_eq!(marker.name, "ArkUI");
}

#[test]
fn test_first_node_is_module_root() {
    let list = extract_unit("/*\n * Copyright\n */\n/**\n * @file\n * @kit Net Kit\n */\ntype A = string;").unwrap();

    let root = &list.nodes[0];
    assert_eq!(root.kind, Some(EntityKind::Module));
    assert_eq!(root.name.as_deref(), Some("Net.Kit"));
    assert!(root.parent_name.is_none());
    assert_eq!(root.depth, 0);
    assert_eq!(list.nodes.len(), 2);
    assert_eq!(list.nodes[1].kind, Some(EntityKind::TypeAlias));
}

#[test]
fn test_strip_imports_handles_multi_line_forms() {
    let code = "import { a,\n  b } from './ab';\nimport c from 'c'\nimport 'side-effect';\ntype D = string;";
    assert_eq!(strip_imports(code), "type D = string;");
}

#[test]
fn test_strip_imports_keeps_export_import() {
    let code = "export import X = y.X;";
    assert_eq!(strip_imports(code), code);
}

#[test]
fn test_class_member_counts() {
    let source = "/** @kit Test */\nclass Foo {\n  /** Name. */\n  name: string;\n  readonly size: number;\n  id?: string;\n  start(): void;\n  stop(force: boolean): Promise<void>;\n}";
    let list = extract_unit(source).unwrap();

    let count = |kind| list.nodes.iter().filter(|n| n.kind == Some(kind)).count();
    assert_eq!(count(EntityKind::Class), 1);
    assert_eq!(count(EntityKind::Method), 2);
    assert_eq!(count(EntityKind::Property), 3);
    assert!(list.nodes[2..]
        .iter()
        .all(|n| n.parent_name.as_deref() == Some("Foo")));
}

#[test]
fn test_declarations_follow_blocks() {
    let source = "/** @kit Test */\nimport { x } from 'x';\n/** Alias. */\ntype A = string;\ninterface B {\n  (v: number): void;\n}\n/** Entry. */\ndeclare function run(): void;\nexport default B;\nexport { A };";
    let list = extract_unit(source).unwrap();

    let names: Vec<&str> = list.nodes.iter().map(|n| n.key_segment()).collect();
    assert_eq!(names, vec!["Test", "B", "(v: number): void", "A", "run"]);

    let alias = &list.nodes[3];
    assert_eq!(alias.description, "Alias.");
    assert_eq!(alias.aliased_to.as_deref(), Some("string"));
    assert_eq!(alias.module.as_deref(), Some("Test"));
    assert_eq!(alias.depth, 1);

    assert_eq!(list.nodes[4].description, "Entry.");
}

#[test]
fn test_failed_block_does_not_abort_siblings() {
    let mut source = String::from("/** @kit Test */\n");
    for level in 0..70 {
        let _ = writeln!(source, "namespace n{level} {{");
    }
    for _ in 0..70 {
        source.push_str("}\n");
    }
    source.push_str("class Survivor {\n  ok(): void;\n}\n");

    let list = extract_unit(&source).unwrap();
    let names: Vec<&str> = list.nodes.iter().map(|n| n.key_segment()).collect();
    assert_eq!(names, vec!["Test", "Survivor", "ok"]);
}

#[test]
fn test_node_list_serializes_without_absent_fields() {
    let list = extract_unit("/** @kit Test */\nclass Foo {\n  bar(): void;\n}").unwrap();
    let json = serde_json::to_value(&list).unwrap();

    let class = &json["nodes"][1];
    assert_eq!(class["kind"], "class");
    assert_eq!(class["name"], "Foo");
    assert!(class.get("return_type").is_none());
    assert!(class.get("unique_key").is_none());
    assert_eq!(json["nodes"][2]["return_type"], "void");
}

#[test]
fn test_multi_line_type_alias_is_one_entity() {
    let list =
        extract_unit("/** @kit Test */\nexport type Options = {\n  a: string;\n  b: number;\n};\n")
            .unwrap();

    assert_eq!(list.nodes.len(), 2);
    let alias = &list.nodes[1];
    assert_eq!(alias.kind, Some(EntityKind::TypeAlias));
    assert_eq!(alias.key_segment(), "Options");
    assert_eq!(alias.parent_name.as_deref(), Some("Test"));
    assert_eq!(alias.depth, 1);
    assert_eq!(alias.aliased_to.as_deref(), Some("{ a: string; b: number; }"));
}

#[test]
fn test_function_with_object_typed_parameter_is_one_entity() {
    let list = extract_unit(
        "/** @kit Test */\ndeclare function foo(options: {\n  a: string;\n}): void;\ntype B = string;",
    )
    .unwrap();

    let summary: Vec<(Option<EntityKind>, &str)> = list
        .nodes
        .iter()
        .map(|n| (n.kind, n.key_segment()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some(EntityKind::Module), "Test"),
            (Some(EntityKind::Method), "foo"),
            (Some(EntityKind::TypeAlias), "B"),
        ]
    );
    assert_eq!(list.nodes[1].return_type.as_deref(), Some("void"));
    assert!(list.nodes.iter().all(|n| n.source_text.is_none()));
}
