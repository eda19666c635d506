//! Raw tree and position tree tests.

use lookml::base::{Position, Span};
use lookml::parser::{ParseErrorKind, RawScalar, RawValue, parse};
use rstest::rstest;

#[test]
fn test_positions_parallel_the_tree() {
    let doc = parse("view: orders {\n  dimension: id {\n    type: number\n  }\n}\n").unwrap();
    let view = &doc.tree().entries[0];
    assert_eq!(view.key, "view");
    assert_eq!(view.name.as_deref(), Some("orders"));

    let position = doc.positions().entry(0).unwrap();
    assert_eq!(position.span, Span::from_coords(0, 0, 4, 1));
    assert_eq!(position.name_span, Some(Span::from_coords(0, 6, 0, 12)));

    let body = view.value.as_object().unwrap();
    let children = position.children.as_ref().unwrap();
    assert_eq!(body.entries.len(), children.entries.len());
    assert_eq!(children.entries[0].span.start, Position::new(1, 2));
}

#[test]
fn test_duplicate_keys_are_kept_in_order() {
    let doc = parse("view: a {}\nview: a {}\nview: b {}").unwrap();
    let names: Vec<_> = doc
        .tree()
        .entries
        .iter()
        .map(|e| e.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["a", "a", "b"]);
}

#[test]
fn test_scalar_kinds() {
    let doc = parse("a: yes\nb: 12\nc: \"text\"\nd: [x, \"y\"]").unwrap();
    let values: Vec<&RawValue> = doc.tree().entries.iter().map(|e| &e.value).collect();
    assert_eq!(values[0], &RawValue::Scalar(RawScalar::Ident("yes".into())));
    assert_eq!(values[1], &RawValue::Scalar(RawScalar::Number(12.0)));
    assert_eq!(values[2], &RawValue::Scalar(RawScalar::String("text".into())));
    assert!(matches!(values[3], RawValue::List(items) if items.len() == 2));
}

#[test]
fn test_expression_is_trimmed() {
    let doc = parse("sql:   ${TABLE}.id   ;;").unwrap();
    assert_eq!(
        doc.tree().entries[0].value,
        RawValue::Expression("${TABLE}.id".into())
    );
}

#[rstest]
#[case::unclosed_brace("view: orders {", ParseErrorKind::UnclosedBrace)]
#[case::unclosed_nested("view: orders {\n  dimension: id {\n}", ParseErrorKind::UnclosedBrace)]
#[case::missing_colon("view orders {}", ParseErrorKind::ExpectedColon)]
#[case::stray_operator("view: v { x: 1 + 2 }", ParseErrorKind::InvalidCharacter)]
#[case::unterminated_expression("view: v { dimension: d { sql: x } }", ParseErrorKind::UnterminatedExpression)]
fn test_malformed_input(#[case] source: &str, #[case] kind: ParseErrorKind) {
    let err = parse(source).unwrap_err();
    assert_eq!(err.kind, kind);
    assert!(err.to_string().starts_with("Parse error"), "{err}");
}

#[test]
fn test_empty_and_comment_only() {
    assert!(parse("").unwrap().tree().is_empty());
    assert!(parse("# nothing here\n\n").unwrap().tree().is_empty());
}

#[rstest]
#[case::set_wildcard("drill_fields: [detail*]", &["detail*"])]
#[case::all_fields_with_exclusion("fields: [ALL_FIELDS*, -orders.secret]", &["ALL_FIELDS*", "-orders.secret"])]
#[case::view_wildcard("fields: [users.*]", &["users.*"])]
fn test_field_list_references(#[case] source: &str, #[case] expected: &[&str]) {
    let doc = parse(source).unwrap();
    let RawValue::List(items) = &doc.tree().entries[0].value else {
        panic!("expected a list");
    };
    let idents: Vec<RawValue> = expected
        .iter()
        .map(|s| RawValue::Scalar(RawScalar::Ident(s.to_string())))
        .collect();
    assert_eq!(items, &idents);
}
