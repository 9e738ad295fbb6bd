//! Tests for the documentation comment scanner

use crate::parser::comment::scan_doc_comments;

#[test]
fn test_scan_single_block() {
    let lines = ["/**", " * Gets the value.", " * @since 9", " */", "get(): number;"];

    let scan = scan_doc_comments(&lines).unwrap();
    assert_eq!(scan.blocks.len(), 1);
    assert_eq!(scan.lines_consumed, 4);

    let doc = scan.first().unwrap().to_doc();
    assert_eq!(doc.description, "Gets the value.");
    assert_eq!(doc.metadata_tags, vec!["@since 9"]);
}

#[test]
fn test_scan_single_line_block() {
    let lines = ["/** Short. */", "x: number;"];

    let scan = scan_doc_comments(&lines).unwrap();
    assert_eq!(scan.lines_consumed, 1);
    assert_eq!(scan.first().unwrap().to_doc().description, "Short.");
}

#[test]
fn test_scan_skips_leading_blank_lines() {
    let lines = ["", "   ", "/** Doc. */", "x: number;"];

    let scan = scan_doc_comments(&lines).unwrap();
    assert_eq!(scan.lines_consumed, 3);
}

#[test]
fn test_scan_returns_none_before_code() {
    let lines = ["foo(): void;", "/** Too late. */"];
    assert!(scan_doc_comments(&lines).is_none());
}

#[test]
fn test_scan_drops_unterminated_block() {
    let lines = ["/**", " * Never closed"];
    assert!(scan_doc_comments(&lines).is_none());
}

#[test]
fn test_scan_adjacent_blocks_are_candidates() {
    let lines = [
        "/**",
        " * Old behaviour.",
        " * @since 9",
        " */",
        "/**",
        " * New behaviour.",
        " * @since 11",
        " */",
        "foo(): void;",
    ];

    let scan = scan_doc_comments(&lines).unwrap();
    assert_eq!(scan.blocks.len(), 2);
    assert_eq!(scan.lines_consumed, 8);

    let doc = scan.select().unwrap().to_doc();
    assert_eq!(doc.description, "New behaviour.");
    assert_eq!(doc.metadata_tags, vec!["@since 11"]);
}

#[test]
fn test_scan_blank_line_ends_the_run() {
    let lines = ["/** First. */", "", "/** Second. */", "foo(): void;"];

    let scan = scan_doc_comments(&lines).unwrap();
    assert_eq!(scan.blocks.len(), 1);
    assert_eq!(scan.lines_consumed, 1);
}

#[test]
fn test_select_ties_keep_source_order() {
    let lines = ["/** First. */", "/** Second. */", "x: number;"];

    let scan = scan_doc_comments(&lines).unwrap();
    let selected = scan.select().unwrap();
    assert_eq!(selected.since(), -1);
    assert_eq!(selected.to_doc().description, "First.");
}

#[test]
fn test_select_untagged_ranks_below_tagged() {
    let lines = ["/** Untagged. */", "/**", " * Tagged.", " * @since 8", " */"];

    let scan = scan_doc_comments(&lines).unwrap();
    assert_eq!(scan.select().unwrap().to_doc().description, "Tagged.");
}

#[test]
fn test_to_doc_collects_tags_in_order() {
    let lines = [
        "/**",
        " * Creates a session.",
        " * Throws on bad input.",
        " *",
        " * @param { string } name - Session name.",
        " * @returns { Session }",
        " * @syscap SystemCapability.Test",
        " */",
    ];

    let doc = scan_doc_comments(&lines).unwrap().first().unwrap().to_doc();
    assert_eq!(doc.description, "Creates a session. Throws on bad input.");
    assert_eq!(
        doc.metadata_tags,
        vec![
            "@param { string } name - Session name.",
            "@returns { Session }",
            "@syscap SystemCapability.Test",
        ]
    );
}
