//! Completion tests, including incomplete documents typed mid-edit.

use lookml::base::Position;
use lookml::ide::{AnalysisHost, CompletionContext, CompletionKind, completion_context};
use lookml::syntax::NodeKind;
use rstest::rstest;

use crate::helpers::fixtures;

fn host_with(extra: &str) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    for (uri, source) in fixtures::shop() {
        host.set_file_content(uri, source);
    }
    host.set_file_content("edit.view.lkml", extra);
    host
}

fn labels(host: &AnalysisHost, position: Position) -> Vec<String> {
    host.analysis()
        .completions("edit.view.lkml", position)
        .into_iter()
        .map(|i| i.label.to_string())
        .collect()
}

#[test]
fn test_view_names_after_dollar_brace() {
    let host = host_with("view: edit {\n  dimension: x {\n    sql: ${ ;;\n  }\n}\n");
    let items = labels(&host, Position::new(2, 11));
    assert!(items.contains(&"orders".to_string()), "{items:?}");
    assert!(items.contains(&"users".to_string()), "{items:?}");
    assert!(items.contains(&"edit".to_string()), "{items:?}");
}

#[test]
fn test_fields_after_view_dot() {
    let host = host_with("view: edit {\n  dimension: x {\n    sql: ${orders. ;;\n  }\n}\n");
    let items = labels(&host, Position::new(2, 18));
    for expected in ["id", "user_id", "created", "count", "total", "created_week"] {
        assert!(items.contains(&expected.to_string()), "missing {expected}: {items:?}");
    }
    assert!(!items.contains(&"name".to_string()));
}

#[test]
fn test_refinement_completes_as_refined_view() {
    let host = host_with("view: +orders {\n  dimension: extra {\n    sql: ${ ;;\n  }\n}\n");
    let items = labels(&host, Position::new(2, 11));
    assert_eq!(items.iter().filter(|i| *i == "orders").count(), 1, "{items:?}");
    assert!(!items.iter().any(|i| i.starts_with('+')), "{items:?}");

    let host = host_with(
        "view: +orders {\n  dimension: extra { sql: 1 ;; }\n  dimension: y {\n    sql: ${orders. ;;\n  }\n}\n",
    );
    let items = labels(&host, Position::new(3, 18));
    for expected in ["id", "extra", "y"] {
        assert!(items.contains(&expected.to_string()), "missing {expected}: {items:?}");
    }
}

#[test]
fn test_unknown_view_after_dot_is_empty() {
    let host = host_with("view: edit {\n  dimension: x {\n    sql: ${nothing. ;;\n  }\n}\n");
    assert!(labels(&host, Position::new(2, 19)).is_empty());
}

#[test]
fn test_dimension_parameters() {
    let host = host_with("view: edit {\n  dimension: x {\n    \n  }\n}\n");
    let items = labels(&host, Position::new(2, 4));
    for expected in ["type", "sql", "primary_key", "hidden", "label", "description", "value_format"] {
        assert!(items.contains(&expected.to_string()), "missing {expected}: {items:?}");
    }
    assert!(!items.contains(&"sql_on".to_string()));
}

#[test]
fn test_join_parameters() {
    let host = host_with("explore: edit {\n  join: users {\n    \n  }\n}\n");
    let items = labels(&host, Position::new(2, 4));
    for expected in ["sql_on", "relationship", "type", "view_label"] {
        assert!(items.contains(&expected.to_string()), "missing {expected}: {items:?}");
    }
}

#[test]
fn test_top_level_snippets() {
    let host = host_with("\n");
    let items = host.analysis().completions("edit.view.lkml", Position::new(0, 0));
    let view = items.iter().find(|i| &*i.label == "view").unwrap();
    assert_eq!(view.kind, CompletionKind::Snippet);
    assert!(view.is_snippet());
    assert!(view.insert_text.as_deref().unwrap().contains("${1:name}"));
}

#[test]
fn test_incomplete_document_uses_open_braces() {
    // no closing braces: the document does not parse
    let source = "view: edit {\n  measure: total {\n    ";
    let mut host = host_with(source);
    assert!(host.set_file_content("edit.view.lkml", source).is_some());
    let items = labels(&host, Position::new(2, 4));
    assert!(items.contains(&"drill_fields".to_string()), "{items:?}");
    assert!(!items.contains(&"primary_key".to_string()));
}

#[rstest]
#[case::measure_type("view: edit {\n  measure: m {\n    type: \n  }\n}\n", 10, "count_distinct")]
#[case::dimension_type("view: edit {\n  dimension: d {\n    type: \n  }\n}\n", 10, "yesno")]
#[case::relationship("explore: edit {\n  join: users {\n    relationship: \n  }\n}\n", 18, "many_to_one")]
#[case::join_from("explore: edit {\n  join: buyers {\n    from: \n  }\n}\n", 10, "users")]
fn test_value_completions(#[case] source: &str, #[case] column: usize, #[case] expected: &str) {
    let host = host_with(source);
    let items = labels(&host, Position::new(2, column));
    assert!(items.contains(&expected.to_string()), "missing {expected}: {items:?}");
}

#[test]
fn test_context_inference() {
    let mut host = AnalysisHost::new();
    host.set_file_content("a.view.lkml", "view: a {\n  dimension: d {\n    sql: ${a. ;;\n  }\n}\n");
    let workspace = host.workspace();
    let document = workspace.get_document("a.view.lkml").unwrap();
    assert_eq!(
        completion_context(document, Position::new(2, 13)),
        CompletionContext::FieldReference("a".to_string())
    );
    assert_eq!(
        completion_context(document, Position::new(1, 0)),
        CompletionContext::Parameters(NodeKind::View)
    );
}
