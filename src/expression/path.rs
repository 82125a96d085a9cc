//! Property path expressions

use super::Expression;
use super::dependencies::{append_dependencies, outer_dependency};
use crate::context::Context;
use crate::error::EvaluationResult;
use crate::model::{ResolvedPath, lookup, lookup_item};
use serde_json::Value;

/// Anchor a path is looked up from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMode {
    /// The enclosing scope's value
    Relative,
    /// The controller's root data
    Absolute,
    /// The block declaring the alias, name including `#`
    Alias(String),
    /// A view attribute, name without `@`
    Attribute(String),
}

/// Property path such as `user.name`, `#item.title` or `@label`
#[derive(Debug, Clone)]
pub struct PathExpression {
    segments: Vec<String>,
    mode: PathMode,
}

impl PathExpression {
    pub(super) fn new(segments: Vec<String>, relative: bool) -> Self {
        let mode = match segments.first() {
            Some(first) if first.starts_with('#') => PathMode::Alias(first.clone()),
            Some(first) if first.starts_with('@') => PathMode::Attribute(first[1..].to_string()),
            _ if relative => PathMode::Relative,
            _ => PathMode::Absolute,
        };
        Self { segments, mode }
    }

    /// Every segment, including an alias or attribute anchor
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Anchor of the lookup
    pub fn mode(&self) -> &PathMode {
        &self.mode
    }

    /// Segments looked up below the anchor
    pub fn lookup_segments(&self) -> &[String] {
        match self.mode {
            PathMode::Alias(_) | PathMode::Attribute(_) => &self.segments[1..],
            PathMode::Relative | PathMode::Absolute => &self.segments,
        }
    }

    /// Value at the path, narrowed to `item` when read as an iteration
    pub(super) fn get(&self, scope: &Context, item: Option<usize>) -> EvaluationResult<Value> {
        let segments = self.lookup_segments();
        let read = |value: &Value| match item {
            Some(item) => lookup_item(segments, value, item),
            None => lookup(segments, value),
        };
        match &self.mode {
            PathMode::Relative => match scope.expression() {
                Some(expression) => Ok(read(&expression.get(scope)?)),
                None => Ok(read(&scope.data())),
            },
            PathMode::Absolute => Ok(read(&scope.data())),
            PathMode::Alias(alias) => {
                let alias_context = scope.for_alias(alias)?;
                Ok(read(&alias_context.get()?))
            }
            PathMode::Attribute(name) => match attribute_anchor(scope, name) {
                Some((expression, declaring)) => Ok(read(&expression.get(declaring)?)),
                None => Ok(Value::Null),
            },
        }
    }

    pub(super) fn resolve(&self, scope: &Context) -> EvaluationResult<Option<ResolvedPath>> {
        let base = match &self.mode {
            PathMode::Relative => match scope.expression() {
                Some(expression) => expression.resolve(scope)?,
                None => Some(ResolvedPath::new()),
            },
            PathMode::Absolute => Some(ResolvedPath::new()),
            PathMode::Alias(alias) => {
                let alias_context = scope.for_alias(alias)?;
                match alias_context.expression() {
                    Some(expression) => expression.resolve(alias_context)?,
                    None => None,
                }
            }
            PathMode::Attribute(name) => match attribute_anchor(scope, name) {
                Some((expression, declaring)) => expression.resolve(declaring)?,
                None => None,
            },
        };
        Ok(base.map(|mut path| {
            path.extend_keys(self.lookup_segments());
            path
        }))
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
        match &self.mode {
            PathMode::Relative => {
                if let Some(anchor) = scope.expression() {
                    let inner = anchor.collect_dependencies(scope, true)?;
                    append_dependencies(&mut dependencies, inner);
                }
            }
            PathMode::Absolute => {}
            PathMode::Alias(alias) => {
                let alias_context = scope.for_alias(alias)?;
                if let Some(anchor) = alias_context.expression() {
                    append_dependencies(
                        &mut dependencies,
                        anchor.collect_dependencies(alias_context, true)?,
                    );
                }
            }
            PathMode::Attribute(name) => {
                if let Some((anchor, declaring)) = attribute_anchor(scope, name) {
                    append_dependencies(
                        &mut dependencies,
                        anchor.collect_dependencies(declaring, true)?,
                    );
                }
            }
        }
        Ok(dependencies)
    }
}

/// Attribute expression for `name` and the scope it was declared in
fn attribute_anchor<'a>(scope: &'a Context, name: &str) -> Option<(&'a Expression, &'a Context)> {
    let boundary = scope.for_attribute(name)?;
    let expression = boundary.attribute(name)?;
    let declaring = boundary.for_view_parent().unwrap_or(boundary);
    Some((expression, declaring))
}
