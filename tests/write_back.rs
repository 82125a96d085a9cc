//! Two-way binding write-back through resolved paths

mod common;

use common::{Fixture, block, path};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use template_scope::{
    BlockType, Component, ContextConfig, ContextMeta, EvaluationError, Expression, MemoryModel,
    Model,
};

#[test]
fn test_set_through_alias_in_iteration() {
    let fixture = Fixture::new(json!({"todos": [{"done": false}, {"done": false}]}));
    let iteration = fixture
        .context
        .child(block(&["todos"], BlockType::Each, Some("#todo")))
        .each_child(1);
    path(&["#todo", "done"]).set(&iteration, json!(true)).unwrap();
    assert_eq!(
        fixture.model.get(""),
        json!({"todos": [{"done": false}, {"done": true}]})
    );
}

#[test]
fn test_set_follows_moved_item() {
    let fixture = Fixture::new(json!({"todos": [{"done": false}, {"done": false}]}));
    let iteration = fixture
        .context
        .child(block(&["todos"], BlockType::Each, Some("#todo")))
        .each_child(1);
    iteration.set_item(0);
    path(&["#todo", "done"]).set(&iteration, json!(true)).unwrap();
    assert_eq!(fixture.model.get("todos.0.done"), json!(true));
    assert_eq!(fixture.model.get("todos.1.done"), json!(false));
}

#[test]
fn test_set_through_brackets() {
    let fixture = Fixture::new(json!({"scores": {"ann": 1}, "player": "ann"}));
    let score = Expression::brackets(path(&["scores"]), path(&["player"]));
    score.set(&fixture.context, json!(5)).unwrap();
    assert_eq!(fixture.model.get("scores.ann"), json!(5));
}

#[test]
fn test_set_through_brackets_with_huge_index_fails() {
    let fixture = Fixture::new(json!({"slots": [], "at": 10_000_000_000u64}));
    let slot = Expression::brackets(path(&["slots"]), path(&["at"]));
    let error = slot.set(&fixture.context, json!(1)).unwrap_err();
    assert!(matches!(error, EvaluationError::InvalidPath { .. }));
    assert_eq!(fixture.model.get("slots"), json!([]));
}

#[test]
fn test_set_creates_missing_parents() {
    let fixture = Fixture::new(json!({}));
    path(&["form", "fields", "email"])
        .set(&fixture.context, json!("a@b.c"))
        .unwrap();
    assert_eq!(fixture.model.get("form.fields.email"), json!("a@b.c"));
}

#[test]
fn test_set_without_path_fails() {
    let fixture = Fixture::new(json!({"n": 1}));
    let call = Expression::function(["join"], vec![path(&["n"])]);
    assert!(matches!(
        call.set(&fixture.context, json!(2)),
        Err(EvaluationError::Unresolvable { .. })
    ));

    let null_key = Expression::brackets(path(&["map"]), path(&["missing"]));
    assert!(matches!(
        null_key.set(&fixture.context, json!(2)),
        Err(EvaluationError::Unresolvable { .. })
    ));
}

#[test]
fn test_set_through_scalar_fails() {
    let fixture = Fixture::new(json!({"title": "t"}));
    let error = path(&["title", "text"])
        .set(&fixture.context, json!("x"))
        .unwrap_err();
    assert!(matches!(error, EvaluationError::InvalidPath { .. }));
}

#[test]
fn test_set_uses_configured_delimiter() {
    let model = Arc::new(MemoryModel::new(json!({"a": {"b": 1}})).with_delimiter("/"));
    let component = Component::builder(model.clone()).build();
    let meta = ContextMeta::new(ContextConfig::default().with_path_delimiter("/"));
    let context = template_scope::Context::root(Arc::new(meta), component);
    path(&["a", "b"]).set(&context, json!(2)).unwrap();
    assert_eq!(model.data()["a"]["b"], json!(2));
}

#[test]
fn test_component_child_writes_to_own_model() {
    let fixture = Fixture::new(json!({"title": "page"}));
    let child_model = Arc::new(MemoryModel::new(json!({"title": "child"})));
    let child = Component::builder(child_model.clone())
        .name("child")
        .parent(fixture.controller.clone())
        .build();
    let context = fixture.context.component_child(child);
    path(&["title"]).set(&context, json!("edited")).unwrap();
    assert_eq!(child_model.get("title"), json!("edited"));
    assert_eq!(fixture.model.get("title"), json!("page"));
}
