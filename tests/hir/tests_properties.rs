//! Properties that hold for every analysis.

use lookml::hir::{AnalysisConfig, SymbolKind, analyze, codes};
use rstest::rstest;

use crate::helpers::{fixtures, with_code, workspace_from, workspace_with};

#[test]
fn test_analysis_is_idempotent() {
    let workspace = workspace_from(&fixtures::shop());
    let documents: Vec<_> = workspace.all_documents().collect();
    let config = AnalysisConfig::default();

    let first = analyze(documents.iter().copied(), &config);
    let second = analyze(documents.iter().rev().copied(), &config);

    assert_eq!(first.symbol_keys(), second.symbol_keys());
    assert_eq!(first.diagnostics(), second.diagnostics());
    for key in first.symbol_keys() {
        assert_eq!(
            first.symbol(key).unwrap().references,
            second.symbol(key).unwrap().references,
            "references of {key}"
        );
    }
}

#[test]
fn test_referenced_views_have_references() {
    let workspace = workspace_from(&[
        ("orders.view.lkml", fixtures::ORDERS_VIEW),
        ("users.view.lkml", fixtures::USERS_VIEW),
        (
            "shop.model.lkml",
            "explore: orders {\n  join: users {\n    sql_on: ${orders.user_id} = ${users.id} ;;\n  }\n}\nexplore: customers {\n  from: users\n}\n",
        ),
    ]);
    let model = workspace.model();
    let documents: Vec<_> = workspace.parsed_documents().collect();
    for document in documents {
        let ast = document.ast().unwrap();
        for explore in ast.all_explores() {
            let base = model.view(explore.effective_base_view()).unwrap();
            assert!(!base.references.is_empty(), "{} unreferenced", base.name);
            for join in explore.joins.values() {
                let target = model.view(&join.view).unwrap();
                assert!(!target.references.is_empty(), "{} unreferenced", target.name);
            }
        }
    }
    // `${orders.user_id}` and the explore base
    let user_id = model.lookup(SymbolKind::Dimension, "orders.user_id").unwrap();
    assert_eq!(user_id.references.len(), 1);
    // `from: users` plus the join
    assert_eq!(model.view("users").unwrap().references.len(), 2);
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(5)]
fn test_duplicate_field_count(#[case] copies: usize) {
    let mut source = String::from("view: v {\n");
    for i in 0..copies {
        let kind = if i % 2 == 0 { "dimension" } else { "measure" };
        source.push_str(&format!("  {kind}: shared {{ sql: {i} ;; }}\n"));
    }
    source.push_str("  dimension: unique { sql: 1 ;; }\n}\n");

    let workspace = workspace_with(&source);
    let model = workspace.model();
    assert_eq!(with_code(&model, codes::DUPLICATE_FIELD).len(), copies - 1);
}

#[test]
fn test_join_cycle_back_to_base() {
    let workspace = workspace_from(&[
        ("orders.view.lkml", fixtures::ORDERS_VIEW),
        ("users.view.lkml", fixtures::USERS_VIEW),
        (
            "shop.model.lkml",
            "explore: orders {
  join: users {
    sql_on: ${orders.user_id} = ${users.id} ;;
    relationship: many_to_one
  }
  join: repeat_orders {
    from: orders
    sql_on: ${users.id} = ${repeat_orders.user_id} ;;
    relationship: one_to_many
  }
}
",
        ),
    ]);
    let model = workspace.model();
    let cycles = with_code(&model, codes::CYCLIC_JOIN);
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].message.contains("orders -> users -> orders"), "{}", cycles[0].message);
}

#[test]
fn test_acyclic_joins() {
    let workspace = workspace_from(&fixtures::shop());
    assert!(with_code(&workspace.model(), codes::CYCLIC_JOIN).is_empty());
}
