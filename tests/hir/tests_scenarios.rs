//! End-to-end analysis of small inputs.

use lookml::base::Span;
use lookml::hir::{Severity, SymbolKind, codes};

use crate::helpers::{assert_no_diagnostics, codes, fixtures, with_code, workspace_from, workspace_with};

#[test]
fn test_single_view_symbols() {
    let workspace = workspace_with(
        "view: orders { dimension: id { type: number sql: ${TABLE}.id ;; } measure: count { type: count } }",
    );
    let model = workspace.model();
    assert_no_diagnostics(&model);
    assert_eq!(
        model.symbol_keys(),
        vec!["dimension:orders.id", "measure:orders.count", "view:orders"]
    );

    let id = model.lookup(SymbolKind::Dimension, "orders.id").unwrap();
    let view = model.view("orders").unwrap();
    assert_eq!(id.parent, Some(view.id));
    assert!(model.lookup(SymbolKind::Measure, "orders.id").is_none());
}

#[test]
fn test_undefined_join_target() {
    let source = "explore: sales { join: customers { sql_on: ${orders.customer_id} = ${customers.id} ;; relationship: many_to_one } }";
    let workspace = workspace_with(source);
    let model = workspace.model();
    assert_eq!(codes(&model), vec![codes::UNDEFINED_VIEW]);

    let diagnostic = &model.diagnostics()[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    let file = workspace.get_document("test.view.lkml").unwrap().ast().unwrap().clone();
    let join = file.explores.get("sales").unwrap().joins.get("customers").unwrap();
    assert_eq!(diagnostic.range, join.info.span);
}

#[test]
fn test_invalid_measure_type() {
    let workspace = workspace_with("view: t { measure: m { type: invalid_type } }");
    let model = workspace.model();
    let found = with_code(&model, codes::INVALID_MEASURE_TYPE);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].severity, Severity::Error);
    for allowed in ["count", "count_distinct", "sum", "average", "percentile", "list"] {
        assert!(found[0].message.contains(allowed), "{}", found[0].message);
    }
}

#[test]
fn test_empty_input() {
    let workspace = workspace_with("");
    let model = workspace.model();
    assert!(model.is_empty());
    assert_eq!(model.symbol_count(), 0);
}

#[test]
fn test_duplicate_dimension_reported_once_on_second() {
    let workspace = workspace_with(
        "view: v {\n  dimension: id { sql: 1 ;; }\n  dimension: id { sql: 2 ;; }\n}",
    );
    let model = workspace.model();
    let found = with_code(&model, codes::DUPLICATE_FIELD);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].range.start.line, 2);
}

#[test]
fn test_parse_failure() {
    let workspace = workspace_with("view: orders {\n  dimension: id {\n    sql: 1 ;;\n  }\n");
    let document = workspace.get_document("test.view.lkml").unwrap();
    assert!(document.ast().is_none());
    assert!(document.parse().error().is_some());

    let model = workspace.model();
    assert_eq!(model.diagnostics().len(), 1);
    let diagnostic = &model.diagnostics()[0];
    assert_eq!(diagnostic.code, codes::PARSE_ERROR);
    assert_eq!(diagnostic.severity, Severity::Error);
    assert!(diagnostic.message.contains("Parse error"));
    assert_eq!(diagnostic.range, Span::from_coords(0, 0, 0, 0));
    assert_eq!(diagnostic.source, "lookml");
}

#[test]
fn test_shop_is_clean() {
    let workspace = workspace_from(&fixtures::shop());
    let model = workspace.model();
    assert_no_diagnostics(&model);

    // `${orders.created_date}` style names resolve to the group
    let group = model.field("orders", "created_week").unwrap();
    assert_eq!(group.kind, SymbolKind::DimensionGroup);
    assert_eq!(group.name, "created");

    let join = model.lookup(SymbolKind::Join, "orders.users").unwrap();
    let explore = model.parent(join).unwrap();
    assert_eq!(explore.kind, SymbolKind::Explore);
    assert!(model.lookup(SymbolKind::Model, "shop").is_some());
}

#[test]
fn test_join_diagnostics() {
    let workspace = workspace_from(&[
        ("a.view.lkml", "view: a { dimension: id { sql: 1 ;; } }"),
        ("b.view.lkml", "view: b { dimension: id { sql: 1 ;; } }"),
        (
            "m.model.lkml",
            "explore: a {\n  join: b {\n    relationship: one_to_lots\n  }\n}",
        ),
    ]);
    let model = workspace.model();
    assert_eq!(with_code(&model, codes::MISSING_SQL_ON).len(), 1);
    let invalid = with_code(&model, codes::INVALID_RELATIONSHIP);
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].range.start.line, 2);
    assert!(invalid[0].message.contains("one_to_lots"));
}

#[test]
fn test_view_rules() {
    let workspace = workspace_with(
        "view: BadName {
  dimension: no_sql {}
  dimension: weird { type: banana sql: 1 ;; }
  dimension: old { sql: 1 ;; decimals: 2 }
  measure: camelCase { type: count }
}",
    );
    let model = workspace.model();
    let missing = with_code(&model, codes::MISSING_SQL);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, Severity::Warning);

    assert_eq!(with_code(&model, codes::INVALID_DIMENSION_TYPE).len(), 1);

    let deprecated = with_code(&model, codes::DEPRECATED_PARAMETER);
    assert_eq!(deprecated.len(), 1);
    assert_eq!(deprecated[0].severity, Severity::Warning);

    let naming = with_code(&model, codes::NAMING_CONVENTION);
    assert_eq!(naming.len(), 2);
    assert!(naming.iter().all(|d| d.severity == Severity::Information));
}

#[test]
fn test_unused_view_needs_an_explore() {
    let views_only = workspace_from(&[("a.view.lkml", "view: a {}"), ("b.view.lkml", "view: b {}")]);
    assert!(with_code(&views_only.model(), codes::UNUSED_VIEW).is_empty());

    let with_explore = workspace_from(&[
        ("a.view.lkml", "view: a {}"),
        ("b.view.lkml", "view: b {}"),
        ("m.model.lkml", "explore: a {}"),
    ]);
    let model = with_explore.model();
    let unused = with_code(&model, codes::UNUSED_VIEW);
    assert_eq!(unused.len(), 1);
    assert_eq!(unused[0].uri, "b.view.lkml");
    assert_eq!(unused[0].severity, Severity::Information);
}

#[test]
fn test_duplicate_construct_last_wins() {
    let workspace = workspace_with(
        "view: a {\n  dimension: first { sql: 1 ;; }\n}\nview: a {\n  dimension: second { sql: 2 ;; }\n}",
    );
    let model = workspace.model();
    let duplicates = with_code(&model, codes::DUPLICATE_CONSTRUCT);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].range.start.line, 0);
    assert!(model.field("a", "second").is_some());
    assert!(model.field("a", "first").is_none());
}

#[test]
fn test_view_in_later_file_replaces_earlier_fields() {
    let workspace = workspace_from(&[
        ("a.view.lkml", "view: orders {\n  dimension: old_field { sql: 1 ;; }\n}\n"),
        ("b.view.lkml", "view: orders {\n  dimension: id { sql: ${TABLE}.id ;; }\n}\n"),
    ]);
    let model = workspace.model();

    let view = model.view("orders").unwrap();
    assert_eq!(view.declaration.uri, "b.view.lkml");
    assert!(model.field("orders", "id").is_some());
    assert!(model.field("orders", "old_field").is_none());
    assert!(model.symbols_in_file("a.view.lkml").is_empty());

    let duplicates = with_code(&model, codes::DUPLICATE_CONSTRUCT);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].uri, "a.view.lkml");
    assert!(duplicates[0].message.contains("b.view.lkml"));
}

#[test]
fn test_refinement_extends_refined_view() {
    let workspace = workspace_from(&[
        ("orders.view.lkml", "view: orders {\n  dimension: id { sql: ${TABLE}.id ;; }\n}\n"),
        (
            "refinements.view.lkml",
            "view: +orders {\n  dimension: extra { sql: ${id} * 2 ;; }\n}\n",
        ),
        (
            "totals.view.lkml",
            "view: totals {\n  dimension: extra_total { sql: ${orders.extra} ;; }\n}\n",
        ),
    ]);
    let model = workspace.model();

    assert!(model.symbol("view:+orders").is_none());
    let view = model.view("orders").unwrap();
    assert_eq!(view.declaration.uri, "orders.view.lkml");

    let extra = model.field("orders", "extra").unwrap();
    assert_eq!(extra.qualified_name, "orders.extra");
    assert_eq!(extra.declaration.uri, "refinements.view.lkml");
    assert_eq!(extra.parent, Some(view.id));
    assert!(extra.references.iter().any(|r| r.uri == "totals.view.lkml"));

    // `${id}` inside the refinement resolves against the refined view
    let id = model.field("orders", "id").unwrap();
    assert!(id.references.iter().any(|r| r.uri == "refinements.view.lkml"));
    assert!(with_code(&model, codes::DUPLICATE_CONSTRUCT).is_empty());
}

#[test]
fn test_refinement_overrides_field() {
    let workspace = workspace_from(&[
        ("a.view.lkml", "view: orders {\n  dimension: status { type: number }\n}\n"),
        ("b.view.lkml", "view: +orders {\n  dimension: status { type: string }\n}\n"),
    ]);
    let model = workspace.model();
    let status = model.field("orders", "status").unwrap();
    assert_eq!(status.declaration.uri, "b.view.lkml");
    assert_eq!(
        model.symbol_keys(),
        vec!["dimension:orders.status", "view:orders"]
    );
}
