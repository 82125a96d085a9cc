//! Shared fixtures for scope and expression integration tests

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use template_scope::expression::ExpressionMeta;
use template_scope::{
    BlockType, Component, Context, ContextConfig, ContextMeta, Controller, Expression, MemoryModel,
    Views, function,
};

/// Initialise test logging once; honours `RUST_LOG`
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Page controller with its model and root context
pub struct Fixture {
    pub model: Arc<MemoryModel>,
    pub controller: Arc<dyn Controller>,
    pub context: Context,
}

impl Fixture {
    pub fn new(data: Value) -> Self {
        Self::with_meta(data, ContextMeta::default())
    }

    pub fn with_views(data: Value, views: Arc<Views>) -> Self {
        Self::with_meta(
            data,
            ContextMeta::new(ContextConfig::default().with_id_namespace("t")).with_views(views),
        )
    }

    pub fn with_meta(data: Value, meta: ContextMeta) -> Self {
        init_logging();
        let model = Arc::new(MemoryModel::new(data));
        let controller: Arc<dyn Controller> = Component::builder(model.clone())
            .name("page")
            .function("join", function(|inputs| {
                let parts: Vec<String> = inputs
                    .iter()
                    .map(|value| match value {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                Ok(json!(parts.join("-")))
            }))
            .build();
        let context = Context::root(Arc::new(meta), controller.clone());
        Self {
            model,
            controller,
            context,
        }
    }
}

/// Relative path expression
pub fn path(segments: &[&str]) -> Expression {
    Expression::relative_path(segments.iter().copied())
}

/// Block expression with source text and an optional alias
pub fn block(segments: &[&str], block_type: BlockType, alias: Option<&str>) -> Expression {
    let mut meta = ExpressionMeta::new(segments.join(".")).with_block_type(block_type);
    if let Some(alias) = alias {
        meta = meta.with_alias(alias);
    }
    path(segments).with_meta(meta)
}

/// Keys of a resolved path, rendered with current item indices
pub fn keys(expression: &Expression, context: &Context) -> Option<Vec<String>> {
    expression
        .resolve(context)
        .expect("resolve should not fail")
        .map(|path| path.keys())
}
