//! Every positioned node's source text re-parses to the same construct.

use lookml::parser::parse;
use lookml::syntax::{AstNode, build_file};
use rstest::rstest;

use crate::helpers::fixtures::{ORDERS_VIEW, SHOP_MODEL, USERS_VIEW};

#[rstest]
#[case("orders.view.lkml", ORDERS_VIEW)]
#[case("users.view.lkml", USERS_VIEW)]
#[case("shop.model.lkml", SHOP_MODEL)]
fn test_node_text_round_trips(#[case] name: &str, #[case] source: &str) {
    let file = build_file(source, name).unwrap();
    let mut checked = 0;
    for node in file.as_node().descendants() {
        if matches!(node, AstNode::File(_)) || node.span().is_unknown() {
            continue;
        }
        let Some(raw) = node.info().raw.as_deref() else {
            continue;
        };
        // implicit `*.model.lkml` models are anchored on their `connection:` entry
        if matches!(node, AstNode::Model(_)) && !raw.starts_with("model") {
            continue;
        }
        let reparsed = parse(raw).unwrap_or_else(|e| panic!("{raw:?} did not re-parse: {e}"));
        let entry = &reparsed.tree().entries[0];
        assert_eq!(entry.key, node.kind().keyword(), "in {raw:?}");
        assert_eq!(entry.name.as_deref(), node.name(), "in {raw:?}");
        checked += 1;
    }
    assert!(checked > 0);
}
