//! Token stream tests.

use lookml::parser::{TokenKind, tokenize};

fn significant(text: &str) -> Vec<(TokenKind, &str)> {
    tokenize(text)
        .into_iter()
        .filter(|t| !t.kind.is_trivia())
        .map(|t| (t.kind, t.text))
        .collect()
}

#[test]
fn test_expression_value_runs_to_double_semicolon() {
    let tokens = significant("sql: ${TABLE}.id + 1 ;; label: \"x\"");
    assert_eq!(tokens[0], (TokenKind::Ident, "sql"));
    assert_eq!(tokens[1], (TokenKind::Colon, ":"));
    assert_eq!(tokens[2].0, TokenKind::Expression);
    assert_eq!(tokens[2].1.trim(), "${TABLE}.id + 1");
    assert_eq!(tokens[3], (TokenKind::DoubleSemicolon, ";;"));
    assert_eq!(tokens[4], (TokenKind::Ident, "label"));
    assert_eq!(tokens[6], (TokenKind::String, "\"x\""));
}

#[test]
fn test_expression_value_may_span_lines() {
    let tokens = significant("sql_on: ${a.id}\n  = ${b.id} ;;");
    assert_eq!(tokens[2].0, TokenKind::Expression);
    assert!(tokens[2].1.contains('\n'));
}

#[test]
fn test_unterminated_expression() {
    let tokens = significant("sql: ${TABLE}.id");
    assert_eq!(tokens.last().map(|t| t.0), Some(TokenKind::UnterminatedExpression));
}

#[test]
fn test_comments_and_refinements() {
    let tokens = tokenize("# header\nview: +orders {}");
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    let names: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Ident)
        .map(|t| t.text)
        .collect();
    assert_eq!(names, vec!["view", "+orders"]);
}
