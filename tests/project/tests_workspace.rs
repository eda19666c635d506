//! Document store behavior.

use lookml::hir::{SymbolKind, codes};
use lookml::project::Workspace;

use crate::helpers::{fixtures, with_code, workspace_from};

#[test]
fn test_edit_reanalyzes_cross_file() {
    let mut workspace = workspace_from(&fixtures::shop());
    assert!(with_code(&workspace.model(), codes::UNDEFINED_VIEW).is_empty());

    workspace.remove_document("users.view.lkml");
    let model = workspace.model();
    let undefined = with_code(&model, codes::UNDEFINED_VIEW);
    assert_eq!(undefined.len(), 1);
    assert_eq!(undefined[0].uri, "shop.model.lkml");

    workspace.update_document("users.view.lkml", fixtures::USERS_VIEW);
    assert!(with_code(&workspace.model(), codes::UNDEFINED_VIEW).is_empty());
}

#[test]
fn test_documents_in_uri_order() {
    let workspace = workspace_from(&[("b.view.lkml", "view: b {}"), ("a.view.lkml", "view: a {}")]);
    let uris: Vec<&str> = workspace.all_documents().map(|d| d.uri()).collect();
    assert_eq!(uris, vec!["a.view.lkml", "b.view.lkml"]);
}

#[test]
fn test_file_name_and_content() {
    let mut workspace = Workspace::new();
    let doc = workspace.update_document("file:///project/views/a.view.lkml", "view: a {}");
    assert_eq!(doc.file_name(), "a.view.lkml");
    assert_eq!(doc.content(), "view: a {}");
    assert!(doc.is_parsed());
}

#[test]
fn test_field_list_wildcards_keep_document_analyzable() {
    let workspace = workspace_from(&[
        (
            "orders.view.lkml",
            "view: orders {\n  dimension: id { type: number }\n  measure: count {\n    type: count\n    drill_fields: [detail*]\n  }\n  set: detail { fields: [id, users.*] }\n}\n",
        ),
        (
            "shop.model.lkml",
            "explore: orders {\n  fields: [ALL_FIELDS*, -orders.id]\n}\n",
        ),
    ]);
    let model = workspace.model();
    assert!(with_code(&model, codes::PARSE_ERROR).is_empty());
    assert!(model.view("orders").is_some());
    assert!(model.field("orders", "count").is_some());
    assert!(model.lookup(SymbolKind::Explore, "orders").is_some());

    let count = workspace
        .get_document("orders.view.lkml")
        .and_then(|d| d.ast())
        .and_then(|ast| ast.views.get("orders"))
        .and_then(|view| view.measures.get("count"))
        .map(|m| m.drill_fields.clone());
    assert_eq!(count, Some(vec!["detail*".to_string()]));
}
