//! Hover rendering.

use lookml::base::Position;
use lookml::ide::AnalysisHost;

use crate::helpers::fixtures;

fn host() -> AnalysisHost {
    let mut host = AnalysisHost::new();
    for (uri, source) in fixtures::shop() {
        host.set_file_content(uri, source);
    }
    host
}

#[test]
fn test_hover_on_embedded_reference_shows_target() {
    let host = host();
    let analysis = host.analysis();
    // `${orders.user_id}` inside the join's sql_on
    let hover = analysis.hover("shop.model.lkml", Position::new(6, 16)).unwrap();
    assert!(hover.contents.contains("dimension: user_id"), "{}", hover.contents);
    assert!(hover.contents.contains("**Type:** number"));
    assert!(hover.contents.contains("${TABLE}.user_id"));
    assert_eq!(hover.range.start, Position::new(6, 12));
    assert_eq!(hover.range.end, Position::new(6, 29));
}

#[test]
fn test_hover_on_join() {
    let host = host();
    let analysis = host.analysis();
    let hover = analysis.hover("shop.model.lkml", Position::new(5, 4)).unwrap();
    assert!(hover.contents.contains("join: users"), "{}", hover.contents);
    assert!(hover.contents.contains("Explore: `orders`"));
    assert!(hover.contents.contains("**Relationship:** many_to_one"));
    assert!(hover.contents.contains("**Type:** left_outer"));
}

#[test]
fn test_hover_on_view_and_dimension_group() {
    let host = host();
    let analysis = host.analysis();
    let view = analysis.hover("orders.view.lkml", Position::new(0, 8)).unwrap();
    assert!(view.contents.contains("view: orders"));
    assert!(view.contents.contains("**Table:** `public.orders`"));

    let group = analysis.hover("orders.view.lkml", Position::new(14, 20)).unwrap();
    assert!(group.contents.contains("**Timeframes:** date, week, month"), "{}", group.contents);
}

#[test]
fn test_hover_misses_are_none() {
    let host = host();
    let analysis = host.analysis();
    assert!(analysis.hover("shop.model.lkml", Position::new(1, 3)).is_none());
    assert!(analysis.hover("unknown.lkml", Position::new(0, 0)).is_none());
}
