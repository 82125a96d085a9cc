//! Computed member access, `before[inside].after`

use super::Expression;
use super::dependencies::{append_dependencies, outer_dependency};
use crate::context::Context;
use crate::error::EvaluationResult;
use crate::model::{ResolvedPath, Segment, index_value, js_truthy, lookup, to_display_string};
use serde_json::Value;

/// Member access with a computed key
#[derive(Debug, Clone)]
pub struct BracketsExpression {
    before: Expression,
    inside: Expression,
    after_segments: Option<Vec<String>>,
}

impl BracketsExpression {
    pub(super) fn new(
        before: Expression,
        inside: Expression,
        after_segments: Option<Vec<String>>,
    ) -> Self {
        Self {
            before,
            inside,
            after_segments,
        }
    }

    /// Expression being indexed
    pub fn before(&self) -> &Expression {
        &self.before
    }

    /// Key expression
    pub fn inside(&self) -> &Expression {
        &self.inside
    }

    /// Property segments following the brackets
    pub fn after_segments(&self) -> Option<&[String]> {
        self.after_segments.as_deref()
    }

    pub(super) fn get(&self, scope: &Context) -> EvaluationResult<Value> {
        let key = self.inside.get(scope)?;
        if key.is_null() {
            return Ok(Value::Null);
        }
        let before = self.before.get(scope)?;
        if !js_truthy(&before) {
            return Ok(Value::Null);
        }
        let value = index_value(&before, &key);
        Ok(match &self.after_segments {
            Some(after) => lookup(after, &value),
            None => value,
        })
    }

    pub(super) fn resolve(&self, scope: &Context) -> EvaluationResult<Option<ResolvedPath>> {
        let key = self.inside.get(scope)?;
        if key.is_null() {
            return Ok(None);
        }
        let Some(mut path) = self.before.resolve(scope)? else {
            return Ok(None);
        };
        path.push(key_segment(&key));
        if let Some(after) = &self.after_segments {
            path.extend_keys(after);
        }
        Ok(Some(path))
    }

    pub(super) fn dependencies(
        &self,
        expression: &Expression,
        context: &Context,
        scope: &Context,
        for_inner_path: bool,
    ) -> EvaluationResult<Vec<ResolvedPath>> {
        let mut dependencies = Vec::new();
        if let Some(own) = outer_dependency(expression, context, for_inner_path)? {
            dependencies.push(own);
        }
        append_dependencies(&mut dependencies, self.inside.collect_dependencies(scope, false)?);
        append_dependencies(&mut dependencies, self.before.collect_dependencies(scope, true)?);
        Ok(dependencies)
    }
}

/// Segment captured from the current value of a bracket key
fn key_segment(key: &Value) -> Segment {
    match key {
        Value::String(name) => Segment::Key(name.clone()),
        Value::Number(number) => match number.as_u64().and_then(|n| usize::try_from(n).ok()) {
            Some(index) => Segment::Index(index),
            None => Segment::Key(to_display_string(key)),
        },
        _ => Segment::Key(to_display_string(key)),
    }
}
