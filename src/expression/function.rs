//! Function calls, constructor calls, operators and comma sequences

use super::Expression;
use crate::context::Context;
use crate::controller::{CallTarget, TemplateFunction, find_function};
use crate::error::{EvaluationError, EvaluationResult};
use crate::model::{ResolvedPath, lookup};
use serde_json::Value;
use std::sync::Arc;

fn evaluate_args(
    args: &[Expression],
    scope: &Context,
    extra_inputs: &[Value],
) -> EvaluationResult<Vec<Value>> {
    let mut inputs = Vec::with_capacity(args.len() + extra_inputs.len());
    for arg in args {
        inputs.push(arg.get(scope)?);
    }
    inputs.extend_from_slice(extra_inputs);
    Ok(inputs)
}

fn apply_after(value: Value, after_segments: Option<&[String]>) -> Value {
    match after_segments {
        Some(after) => lookup(after, &value),
        None => value,
    }
}

/// Call of a controller function, `path.to.fn(args).after`
///
/// Also used for `new path.to.Type(args)`.
#[derive(Debug, Clone)]
pub struct FnExpression {
    segments: Vec<String>,
    args: Vec<Expression>,
    after_segments: Option<Vec<String>>,
}

impl FnExpression {
    pub(super) fn new(
        segments: Vec<String>,
        args: Vec<Expression>,
        after_segments: Option<Vec<String>>,
    ) -> Self {
        Self {
            segments,
            args,
            after_segments,
        }
    }

    /// Member path of the function
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments naming the object that owns the function
    pub fn parent_segments(&self) -> Option<&[String]> {
        match self.segments.len() {
            0 | 1 => None,
            len => Some(&self.segments[..len - 1]),
        }
    }

    /// Name of the function on its owning object
    pub fn last_segment(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Argument expressions
    pub fn args(&self) -> &[Expression] {
        &self.args
    }

    /// Property segments read off the result
    pub fn after_segments(&self) -> Option<&[String]> {
        self.after_segments.as_deref()
    }

    fn find(&self, scope: &Context) -> EvaluationResult<(CallTarget, Arc<dyn TemplateFunction>)> {
        find_function(scope.controller(), self.parent_segments(), self.last_segment()).ok_or_else(
            || EvaluationError::FunctionNotFound {
                path: self.segments.join("."),
            },
        )
    }

    pub(super) fn apply(&self, scope: &Context, extra_inputs: &[Value]) -> EvaluationResult<Value> {
        let (target, function) = self.find(scope)?;
        let inputs = evaluate_args(&self.args, scope, extra_inputs)?;
        function.call(target.receiver(), &inputs)
    }

    pub(super) fn apply_new(
        &self,
        scope: &Context,
        extra_inputs: &[Value],
    ) -> EvaluationResult<Value> {
        let (_, function) = self.find(scope)?;
        let inputs = evaluate_args(&self.args, scope, extra_inputs)?;
        function.construct(&inputs)
    }

    pub(super) fn get(&self, scope: &Context) -> EvaluationResult<Value> {
        let value = self.apply(scope, &[])?;
        Ok(apply_after(value, self.after_segments()))
    }

    pub(super) fn get_new(&self, scope: &Context) -> EvaluationResult<Value> {
        let value = self.apply_new(scope, &[])?;
        Ok(apply_after(value, self.after_segments()))
    }
}

/// Application of an operator from the operator table
#[derive(Debug, Clone)]
pub struct OperatorExpression {
    name: String,
    args: Vec<Expression>,
}

impl OperatorExpression {
    pub(super) fn new(name: String, args: Vec<Expression>) -> Self {
        Self { name, args }
    }

    /// Operator symbol
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operand expressions
    pub fn args(&self) -> &[Expression] {
        &self.args
    }

    pub(super) fn apply(&self, scope: &Context, extra_inputs: &[Value]) -> EvaluationResult<Value> {
        let inputs = evaluate_args(&self.args, scope, extra_inputs)?;
        match scope.meta().operators().evaluate(&self.name, &inputs) {
            Some(result) => Ok(result?),
            None => Err(EvaluationError::OperatorNotFound {
                name: self.name.clone(),
            }),
        }
    }
}

/// Comma sequence: every argument is evaluated, the last one is the value
#[derive(Debug, Clone)]
pub struct SequenceExpression {
    args: Vec<Expression>,
}

impl SequenceExpression {
    pub(super) fn new(args: Vec<Expression>) -> Self {
        Self { args }
    }

    /// Expressions in the sequence
    pub fn args(&self) -> &[Expression] {
        &self.args
    }

    /// Expression that supplies the value and path
    pub fn last(&self) -> Option<&Expression> {
        self.args.last()
    }

    pub(super) fn get(&self, scope: &Context) -> EvaluationResult<Value> {
        let mut value = Value::Null;
        for arg in &self.args {
            value = arg.get(scope)?;
        }
        Ok(value)
    }

    /// Evaluate leading expressions, then apply the last one
    pub(super) fn apply(&self, scope: &Context, extra_inputs: &[Value]) -> EvaluationResult<Value> {
        let Some((last, leading)) = self.args.split_last() else {
            return Ok(Value::Null);
        };
        for arg in leading {
            arg.get(scope)?;
        }
        if last.is_callable() {
            last.apply(scope, extra_inputs)
        } else {
            last.get(scope)
        }
    }

    pub(super) fn resolve(&self, scope: &Context) -> EvaluationResult<Option<ResolvedPath>> {
        match self.last() {
            Some(last) => last.resolve(scope),
            None => Ok(None),
        }
    }

    pub(super) fn dependencies(
        &self,
        scope: &Context,
        for_inner_path: bool,
    ) -> EvaluationResult<Vec<ResolvedPath>> {
        match self.last() {
            Some(last) => last.collect_dependencies(scope, for_inner_path),
            None => Ok(Vec::new()),
        }
    }
}
