//! End-to-end scope scenarios: blocks, iterations, aliases and view attributes

mod common;

use common::{Fixture, block, keys, path};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;
use template_scope::model::{Segment, lookup};
use template_scope::{
    BlockType, EvaluationError, Expression, View, ViewAttributes, ViewOptions, Views,
};

fn items_fixture() -> Fixture {
    Fixture::new(json!({"items": [{"name": "x"}, {"name": "y"}]}))
}

#[test]
fn test_each_alias_reads_current_item() {
    let fixture = items_fixture();
    let items = block(&["items"], BlockType::Each, Some("#item"));
    let each = fixture.context.child(items);
    let iteration = each.each_child(1);

    let name = path(&["#item", "name"]);
    assert_eq!(name.get(&iteration).unwrap(), json!("y"));

    let resolved = name.resolve(&iteration).unwrap().unwrap();
    assert_eq!(resolved.keys(), vec!["items", "1", "name"]);
    match &resolved.segments()[1] {
        Segment::Item(context) => assert!(context.ptr_eq(&iteration)),
        other => panic!("expected a floating item segment, got {other:?}"),
    }
}

#[test]
fn test_relative_path_inside_iteration() {
    let fixture = items_fixture();
    let each = fixture.context.child(block(&["items"], BlockType::Each, None));
    let first = each.each_child(0);
    let second = each.each_child(1);
    let name = path(&["name"]);
    assert_eq!(name.get(&first).unwrap(), json!("x"));
    assert_eq!(name.get(&second).unwrap(), json!("y"));
    assert_eq!(keys(&name, &second), Some(vec!["items".into(), "1".into(), "name".into()]));
}

#[test]
fn test_resolved_path_follows_moved_item() {
    let fixture = items_fixture();
    let items = block(&["items"], BlockType::Each, Some("#item"));
    let iteration = fixture.context.child(items.clone()).each_child(1);
    let name = path(&["#item", "name"]);

    let cached = name.resolve(&iteration).unwrap().unwrap();
    let before = name.get(&iteration).unwrap();
    iteration.set_item(0);
    let after = name.get(&iteration).unwrap();

    assert_eq!(before, json!("y"));
    assert_eq!(after, json!("x"));
    assert_eq!(cached.to_string(), "items.0.name");
    assert_eq!(name.resolve(&iteration).unwrap().unwrap(), cached);
}

#[test]
fn test_nested_each_blocks() {
    let fixture = Fixture::new(json!({
        "groups": [
            {"label": "a", "rows": [1, 2]},
            {"label": "b", "rows": [3, 4, 5]}
        ]
    }));
    let groups = block(&["groups"], BlockType::Each, Some("#group"));
    let group = fixture.context.child(groups).each_child(1);
    let rows = block(&["rows"], BlockType::Each, Some("#row"));
    let row = group.child(rows).each_child(2);

    assert_eq!(path(&["#row"]).get(&row).unwrap(), json!(5));
    assert_eq!(path(&["#group", "label"]).get(&row).unwrap(), json!("b"));
    assert_eq!(
        keys(&path(&["#row"]), &row),
        Some(vec!["groups".into(), "1".into(), "rows".into(), "2".into()])
    );
}

#[rstest]
#[case(&["title"])]
#[case(&["user", "name"])]
#[case(&["user", "tags", "length"])]
#[case(&["missing", "deep"])]
fn test_relative_path_outside_blocks_matches_lookup(#[case] segments: &[&str]) {
    let fixture = Fixture::new(json!({"title": "t", "user": {"name": "Ann", "tags": ["a", "b"]}}));
    let expression = path(segments);
    let data = fixture.context.data();
    assert_eq!(expression.get(&fixture.context).unwrap(), lookup(segments, &data));
}

#[test]
fn test_unknown_alias_fails_everywhere() {
    let fixture = items_fixture();
    let iteration = fixture
        .context
        .child(block(&["items"], BlockType::Each, Some("#item")))
        .each_child(0);
    for context in [&fixture.context, &iteration] {
        let error = path(&["#other", "name"]).resolve(context).unwrap_err();
        assert_eq!(
            error,
            EvaluationError::AliasNotFound {
                alias: "#other".to_string()
            }
        );
    }
}

#[test]
fn test_conditional_blocks() {
    let fixture = Fixture::new(json!({"count": 0, "list": [], "flag": false}));
    let context = &fixture.context;
    assert!(block(&["count"], BlockType::If, None).truthy(context).unwrap());
    assert!(!block(&["list"], BlockType::If, None).truthy(context).unwrap());
    assert!(block(&["list"], BlockType::Unless, None).truthy(context).unwrap());
    assert!(block(&["flag"], BlockType::Else, None).truthy(context).unwrap());
    assert!(!block(&["missing"], BlockType::With, None).truthy(context).unwrap());
}

#[test]
fn test_view_attributes_in_nested_views() {
    let views = Arc::new(Views::new());
    views.register("app:card", "<div>{{@title}}</div>", ViewOptions::default());
    views.register("app:header", "<h1>{{@title}}</h1>", ViewOptions::default());
    let fixture = Fixture::with_views(json!({"page": {"title": "Docs"}}), views.clone());

    let card_view = fixture.context.find_view("app:card").unwrap();
    let card = fixture.context.view_child(
        card_view,
        Some(Arc::new(ViewAttributes::new().with("title", path(&["page", "title"])))),
    );
    let header_view = card.find_view("header").unwrap();
    assert_eq!(header_view.name(), "app:header");

    // Attributes passed through an inheriting boundary
    let header = card.view_child(
        header_view.clone(),
        Some(Arc::new(ViewAttributes::new().inheriting(true))),
    );
    let title = path(&["@title"]);
    assert_eq!(title.get(&header).unwrap(), json!("Docs"));
    assert_eq!(keys(&title, &header), Some(vec!["page".into(), "title".into()]));

    // A closed boundary hides the outer attribute
    let closed = card.view_child(header_view, Some(Arc::new(ViewAttributes::new())));
    assert_eq!(title.get(&closed).unwrap(), Value::Null);
    assert_eq!(keys(&title, &closed), None);
}

#[test]
fn test_attribute_expression_uses_declaring_scope() {
    let fixture = Fixture::new(json!({"items": [{"name": "x"}, {"name": "y"}]}));
    let iteration = fixture
        .context
        .child(block(&["items"], BlockType::Each, Some("#item")))
        .each_child(1);
    let view = Arc::new(View::new("item", "", ViewOptions::default()));
    let attributes = ViewAttributes::new().with("label", path(&["#item", "name"]));
    let instance = iteration.view_child(view, Some(Arc::new(attributes)));
    let inside = instance.child(Expression::literal(json!(true)));

    assert_eq!(path(&["@label"]).get(&inside).unwrap(), json!("y"));
    assert_eq!(
        keys(&path(&["@label"]), &inside),
        Some(vec!["items".into(), "1".into(), "name".into()])
    );
}

#[test]
fn test_missing_view_reports_known_views() {
    let views = Arc::new(Views::new());
    views.register("body", "<p>", ViewOptions::default());
    let fixture = Fixture::with_views(json!({}), views);
    let error = fixture.context.find_view("footer").unwrap_err();
    assert!(error.to_string().starts_with("Cannot find view \"footer\" in\n  body"));
}

#[test]
fn test_binding_hooks_and_ids() {
    let fixture = Fixture::with_views(json!({}), Arc::new(Views::new()));
    let child = fixture.context.child(path(&["a"]));
    assert_eq!(fixture.context.id(), "t_1");
    assert_eq!(child.id(), "t_2");
    child.on_add(&"binding");
    child.on_remove(&"binding");
}
