//! Dependency collection helpers
//!
//! A dependency is a model path whose mutation invalidates a value. Paths
//! ending in [`Segment::Wildcard`] cover every descendant.

use super::Expression;
use crate::context::Context;
use crate::error::EvaluationResult;
use crate::model::{ResolvedPath, Segment};
use crate::views::ViewAttributes;

/// Own path of an expression, unless it only anchors an inner path
pub fn outer_dependency(
    expression: &Expression,
    context: &Context,
    for_inner_path: bool,
) -> EvaluationResult<Option<ResolvedPath>> {
    if for_inner_path {
        return Ok(None);
    }
    expression.resolve(context)
}

/// Append dependencies, skipping exact duplicates
pub fn append_dependencies(dependencies: &mut Vec<ResolvedPath>, more: Vec<ResolvedPath>) {
    for path in more {
        if !dependencies.contains(&path) {
            dependencies.push(path);
        }
    }
}

/// Dependencies of several expressions evaluated in one context
pub fn collect_dependencies_from<'a, I>(
    expressions: I,
    context: &Context,
) -> EvaluationResult<Option<Vec<ResolvedPath>>>
where
    I: IntoIterator<Item = &'a Expression>,
{
    let mut dependencies = Vec::new();
    for expression in expressions {
        append_dependencies(
            &mut dependencies,
            expression.collect_dependencies(context, false)?,
        );
    }
    Ok((!dependencies.is_empty()).then_some(dependencies))
}

/// Dependencies of every attribute expression of a view instance
pub fn collect_map_dependencies(
    attributes: &ViewAttributes,
    context: &Context,
) -> EvaluationResult<Option<Vec<ResolvedPath>>> {
    collect_dependencies_from(attributes.entries().values(), context)
}

/// Dependencies of call arguments
///
/// A function may read anything below an argument, so each argument path is
/// extended with a wildcard.
pub(super) fn argument_dependencies(
    args: &[Expression],
    scope: &Context,
) -> EvaluationResult<Vec<ResolvedPath>> {
    let mut dependencies = Vec::new();
    for arg in args {
        if let Some(path) = arg.resolve(scope)? {
            let path = if path.is_wildcard() {
                path
            } else {
                path.with(Segment::Wildcard)
            };
            append_dependencies(&mut dependencies, vec![path]);
        }
        append_dependencies(&mut dependencies, arg.collect_dependencies(scope, true)?);
    }
    Ok(dependencies)
}
