//! AST construction tests.

use lookml::syntax::{AstNode, NodeKind, Relationship, RelationshipValue, build_file};

use crate::helpers::fixtures::{ORDERS_VIEW, SHOP_MODEL};

#[test]
fn test_empty_input_builds_empty_file() {
    let file = build_file("", "empty.view.lkml").unwrap();
    assert!(file.views.is_empty());
    assert!(file.explores.is_empty());
    assert!(file.models.is_empty());
    assert!(file.dashboards.is_empty());
    assert!(file.is_empty());
}

#[test]
fn test_scenario_one_attributes() {
    let file = build_file(
        "view: orders { dimension: id { type: number sql: ${TABLE}.id ;; } measure: count { type: count } }",
        "orders.view.lkml",
    )
    .unwrap();
    let view = file.views.get("orders").unwrap();
    let id = view.dimensions.get("id").unwrap();
    assert_eq!(id.data_type.as_deref(), Some("number"));
    assert_eq!(id.sql.as_deref(), Some("${TABLE}.id"));
    let count = view.measures.get("count").unwrap();
    assert_eq!(count.measure_type.as_deref(), Some("count"));
}

#[test]
fn test_fields_of_every_kind() {
    let file = build_file(ORDERS_VIEW, "orders.view.lkml").unwrap();
    let view = file.views.get("orders").unwrap();
    assert_eq!(view.sql_table_name.as_deref(), Some("public.orders"));

    let names: Vec<&str> = view.fields().map(|f| f.name()).collect();
    assert_eq!(names, vec!["id", "user_id", "created", "count", "total"]);

    let created = view.dimension_groups.get("created").unwrap();
    assert_eq!(created.timeframes, vec!["date", "week", "month"]);

    let count = view.measures.get("count").unwrap();
    assert_eq!(count.drill_fields, vec!["id", "users.name"]);

    assert!(view.dimensions.get("id").unwrap().primary_key);
    assert!(!view.parameters.contains_key("dimension"));
}

#[test]
fn test_join_attributes() {
    let file = build_file(SHOP_MODEL, "shop.model.lkml").unwrap();
    let explore = file.explores.get("orders").unwrap();
    assert_eq!(explore.base_view, None);
    assert_eq!(explore.effective_base_view(), "orders");

    let join = explore.joins.get("users").unwrap();
    assert_eq!(join.view, "users");
    assert_eq!(join.join_type.as_deref(), Some("left_outer"));
    assert_eq!(
        join.relationship,
        Some(RelationshipValue::Known(Relationship::ManyToOne))
    );
    assert_eq!(join.sql_on.as_deref(), Some("${orders.user_id} = ${users.id}"));

    let model = file.models.get("shop").unwrap();
    assert_eq!(model.connection.as_deref(), Some("warehouse"));
    assert_eq!(model.includes, vec!["*.view.lkml"]);
}

#[test]
fn test_join_from_overrides_name() {
    let file = build_file(
        "explore: e { from: orders join: buyer { from: users sql_on: 1 = 1 ;; relationship: sideways } }",
        "e.explore.lkml",
    )
    .unwrap();
    let explore = file.explores.get("e").unwrap();
    assert_eq!(explore.effective_base_view(), "orders");
    let join = explore.joins.get("buyer").unwrap();
    assert_eq!(join.view, "users");
    assert_eq!(
        join.relationship,
        Some(RelationshipValue::Unknown("sideways".to_string()))
    );
}

#[test]
fn test_duplicate_views_last_wins() {
    let file = build_file(
        "view: a { dimension: first { sql: 1 ;; } }\nview: a { dimension: second { sql: 2 ;; } }",
        "a.view.lkml",
    )
    .unwrap();
    assert_eq!(file.views.len(), 2);
    let effective = file.views.get("a").unwrap();
    assert!(effective.dimensions.contains("second"));
    assert_eq!(file.views.shadowed().count(), 1);
}

#[test]
fn test_node_ids_are_unique() {
    let file = build_file(ORDERS_VIEW, "orders.view.lkml").unwrap();
    let mut ids: Vec<_> = file.as_node().descendants().iter().map(|n| n.id()).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn test_node_at_finds_innermost() {
    let file = build_file(ORDERS_VIEW, "orders.view.lkml").unwrap();
    // inside `sql: ${id} ;;` of measure `total`
    let node = file.node_at(lookml::Position::new(27, 10));
    assert_eq!(node.kind(), NodeKind::Measure);
    assert_eq!(node.name(), Some("total"));
    assert!(matches!(
        file.node_at(lookml::Position::new(1, 3)),
        AstNode::View(_)
    ));
}
