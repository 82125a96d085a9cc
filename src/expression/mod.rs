//! Template expressions and their evaluation against a [`Context`]
//!
//! An [`Expression`] is an immutable tree produced by the template parser.
//! Every variant supports four operations:
//!
//! - `get`: the current value
//! - `resolve`: the canonical model path of the value, used for write-back
//! - `dependencies`: model paths whose change invalidates the value
//! - `truthy`: block-aware truthiness
//!
//! Values produced by an each block's own expression are indexed by the
//! live item of the iteration context they are evaluated in (see
//! [`Context::each_child`]).

mod brackets;
mod dependencies;
mod function;
mod path;

pub use brackets::BracketsExpression;
pub use dependencies::{
    append_dependencies, collect_dependencies_from, collect_map_dependencies, outer_dependency,
};
pub use function::{FnExpression, OperatorExpression, SequenceExpression};
pub use path::{PathExpression, PathMode};

use crate::context::Context;
use crate::error::{EvaluationError, EvaluationResult};
use crate::model::{ResolvedPath, Segment, index_item, template_truthy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_EXPRESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an expression node
///
/// Assigned once at construction and shared by every clone of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExpressionId(u64);

impl ExpressionId {
    fn next() -> Self {
        Self(NEXT_EXPRESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Kind of block an expression introduces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// `{{if}}`
    If,
    /// `{{unless}}`
    Unless,
    /// `{{else}}` and `{{else if}}`
    Else,
    /// `{{with}}`
    With,
    /// `{{each}}`
    Each,
    /// `{{bound}}`
    Bound,
    /// `{{unbound}}`
    Unbound,
}

/// Parser metadata attached to an expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpressionMeta {
    /// Source text
    pub source: String,
    /// Block introduced by the expression
    pub block_type: Option<BlockType>,
    /// Closing tag of a block
    pub is_end: bool,
    /// Alias declared with `as #name`
    #[serde(rename = "as")]
    pub alias: Option<String>,
    /// Triple-brace output
    pub unescaped: bool,
    /// Explicit `bound`/`unbound` modifier
    pub bind_type: Option<String>,
    /// Declared value type for typed attributes
    pub value_type: Option<String>,
}

impl ExpressionMeta {
    /// Create metadata for a source text
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Set the block type
    pub fn with_block_type(mut self, block_type: BlockType) -> Self {
        self.block_type = Some(block_type);
        self
    }

    /// Set the alias, including its leading `#`
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark as the closing tag of a block
    pub fn with_end(mut self) -> Self {
        self.is_end = true;
        self
    }

    /// Mark as unescaped output
    pub fn with_unescaped(mut self) -> Self {
        self.unescaped = true;
        self
    }

    /// Set the bind type modifier
    pub fn with_bind_type(mut self, bind_type: impl Into<String>) -> Self {
        self.bind_type = Some(bind_type.into());
        self
    }

    /// Set the value type
    pub fn with_value_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }
}

/// Expression variants
#[derive(Debug, Clone)]
pub enum ExpressionKind {
    /// Constant value
    Literal(Value),
    /// Property path
    Path(PathExpression),
    /// Computed member access `before[inside].after`
    Brackets(BracketsExpression),
    /// Controller function call
    Fn(FnExpression),
    /// Operator application
    Operator(OperatorExpression),
    /// Constructor call
    New(FnExpression),
    /// Comma sequence
    Sequence(SequenceExpression),
}

#[derive(Clone)]
struct ExpressionNode {
    id: ExpressionId,
    kind: ExpressionKind,
    meta: Option<ExpressionMeta>,
}

/// Shared handle to an expression node
#[derive(Clone)]
pub struct Expression {
    inner: Arc<ExpressionNode>,
}

fn to_strings<I, S>(segments: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    segments.into_iter().map(Into::into).collect()
}

fn optional_segments<I, S>(segments: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let segments = to_strings(segments);
    (!segments.is_empty()).then_some(segments)
}

impl Expression {
    fn from_kind(kind: ExpressionKind) -> Self {
        Self {
            inner: Arc::new(ExpressionNode {
                id: ExpressionId::next(),
                kind,
                meta: None,
            }),
        }
    }

    /// Constant value
    pub fn literal(value: Value) -> Self {
        Self::from_kind(ExpressionKind::Literal(value))
    }

    /// Property path
    ///
    /// A first segment starting with `#` names an alias, one starting with
    /// `@` names a view attribute. Otherwise `relative` selects between the
    /// enclosing scope and the controller's root data.
    pub fn path<I, S>(segments: I, relative: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_kind(ExpressionKind::Path(PathExpression::new(
            to_strings(segments),
            relative,
        )))
    }

    /// Path relative to the enclosing scope
    pub fn relative_path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::path(segments, true)
    }

    /// Path from the controller's root data
    pub fn absolute_path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::path(segments, false)
    }

    /// Computed member access
    pub fn brackets(before: Expression, inside: Expression) -> Self {
        Self::from_kind(ExpressionKind::Brackets(BracketsExpression::new(
            before, inside, None,
        )))
    }

    /// Computed member access followed by property segments
    pub fn brackets_with_after<I, S>(
        before: Expression,
        inside: Expression,
        after_segments: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_kind(ExpressionKind::Brackets(BracketsExpression::new(
            before,
            inside,
            optional_segments(after_segments),
        )))
    }

    /// Controller function call
    pub fn function<I, S>(segments: I, args: Vec<Expression>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_kind(ExpressionKind::Fn(FnExpression::new(
            to_strings(segments),
            args,
            None,
        )))
    }

    /// Controller function call followed by property segments
    pub fn function_with_after<I, S, A, T>(segments: I, args: Vec<Expression>, after: A) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        A: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::from_kind(ExpressionKind::Fn(FnExpression::new(
            to_strings(segments),
            args,
            optional_segments(after),
        )))
    }

    /// Operator application
    pub fn operator(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Self::from_kind(ExpressionKind::Operator(OperatorExpression::new(
            name.into(),
            args,
        )))
    }

    /// Constructor call
    pub fn new_instance<I, S>(segments: I, args: Vec<Expression>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_kind(ExpressionKind::New(FnExpression::new(
            to_strings(segments),
            args,
            None,
        )))
    }

    /// Comma sequence
    pub fn sequence(args: Vec<Expression>) -> Self {
        Self::from_kind(ExpressionKind::Sequence(SequenceExpression::new(args)))
    }

    /// Attach parser metadata, keeping the expression's identity
    pub fn with_meta(self, meta: ExpressionMeta) -> Self {
        let mut node = Arc::unwrap_or_clone(self.inner);
        node.meta = Some(meta);
        Self {
            inner: Arc::new(node),
        }
    }

    /// Identity of the node
    pub fn id(&self) -> ExpressionId {
        self.inner.id
    }

    /// Variant data
    pub fn kind(&self) -> &ExpressionKind {
        &self.inner.kind
    }

    /// Parser metadata
    pub fn meta(&self) -> Option<&ExpressionMeta> {
        self.inner.meta.as_ref()
    }

    /// Block introduced by the expression
    pub fn block_type(&self) -> Option<BlockType> {
        self.meta().and_then(|meta| meta.block_type)
    }

    /// Alias declared for the block
    pub fn alias(&self) -> Option<&str> {
        self.meta().and_then(|meta| meta.alias.as_deref())
    }

    /// Source text, empty without metadata
    pub fn source(&self) -> &str {
        self.meta().map(|meta| meta.source.as_str()).unwrap_or_default()
    }

    /// Check if two handles refer to the same expression
    pub fn same(&self, other: &Expression) -> bool {
        self.inner.id == other.inner.id
    }

    /// Current value
    pub fn get(&self, context: &Context) -> EvaluationResult<Value> {
        let scope = context.for_relative(self);
        let value = match self.kind() {
            ExpressionKind::Literal(value) => value.clone(),
            ExpressionKind::Path(path) => return path.get(scope, self.own_item(context)),
            ExpressionKind::Brackets(brackets) => brackets.get(scope)?,
            ExpressionKind::Fn(function) => function.get(scope)?,
            ExpressionKind::Operator(operator) => operator.apply(scope, &[])?,
            ExpressionKind::New(function) => function.get_new(scope)?,
            ExpressionKind::Sequence(sequence) => sequence.get(scope)?,
        };
        Ok(self.get_patch(context, value))
    }

    /// Canonical model path of the value
    ///
    /// `Ok(None)` means the value has no stable path.
    pub fn resolve(&self, context: &Context) -> EvaluationResult<Option<ResolvedPath>> {
        let scope = context.for_relative(self);
        let path = match self.kind() {
            ExpressionKind::Literal(_)
            | ExpressionKind::Fn(_)
            | ExpressionKind::Operator(_)
            | ExpressionKind::New(_) => None,
            ExpressionKind::Path(path) => path.resolve(scope)?,
            ExpressionKind::Brackets(brackets) => brackets.resolve(scope)?,
            ExpressionKind::Sequence(sequence) => sequence.resolve(scope)?,
        };
        Ok(self.resolve_patch(context, path))
    }

    /// Model paths whose change invalidates the value
    pub fn dependencies(&self, context: &Context) -> EvaluationResult<Option<Vec<ResolvedPath>>> {
        let dependencies = self.collect_dependencies(context, false)?;
        Ok((!dependencies.is_empty()).then_some(dependencies))
    }

    /// Collect dependencies
    ///
    /// With `for_inner_path` the expression's own path is left out, because
    /// the caller already depends on a path that extends it.
    pub fn collect_dependencies(
        &self,
        context: &Context,
        for_inner_path: bool,
    ) -> EvaluationResult<Vec<ResolvedPath>> {
        let scope = context.for_relative(self);
        match self.kind() {
            ExpressionKind::Literal(_) => Ok(Vec::new()),
            ExpressionKind::Path(path) => path.dependencies(self, context, scope, for_inner_path),
            ExpressionKind::Brackets(brackets) => {
                brackets.dependencies(self, context, scope, for_inner_path)
            }
            ExpressionKind::Fn(function) | ExpressionKind::New(function) => {
                dependencies::argument_dependencies(function.args(), scope)
            }
            ExpressionKind::Operator(operator) => {
                dependencies::argument_dependencies(operator.args(), scope)
            }
            ExpressionKind::Sequence(sequence) => {
                sequence.dependencies(scope, for_inner_path)
            }
        }
    }

    /// Block-aware truthiness
    ///
    /// `else` is always true and `unless` negates.
    pub fn truthy(&self, context: &Context) -> EvaluationResult<bool> {
        let block_type = self.block_type();
        if block_type == Some(BlockType::Else) {
            return Ok(true);
        }
        let value = template_truthy(&self.get(context)?);
        Ok(if block_type == Some(BlockType::Unless) {
            !value
        } else {
            value
        })
    }

    /// Check if the expression can be applied
    pub fn is_callable(&self) -> bool {
        matches!(
            self.kind(),
            ExpressionKind::Fn(_)
                | ExpressionKind::Operator(_)
                | ExpressionKind::New(_)
                | ExpressionKind::Sequence(_)
        )
    }

    /// Invoke a callable expression with extra trailing inputs
    ///
    /// Used for event hooks, which pass the event and element after the
    /// written arguments.
    pub fn apply(&self, context: &Context, extra_inputs: &[Value]) -> EvaluationResult<Value> {
        let scope = context.for_relative(self);
        match self.kind() {
            ExpressionKind::Fn(function) => function.apply(scope, extra_inputs),
            ExpressionKind::Operator(operator) => operator.apply(scope, extra_inputs),
            ExpressionKind::New(function) => function.apply_new(scope, extra_inputs),
            ExpressionKind::Sequence(sequence) => sequence.apply(scope, extra_inputs),
            _ => Err(EvaluationError::invalid_operation(format!(
                "expression '{self}' is not callable"
            ))),
        }
    }

    /// Write a value back to the model at the resolved path
    pub fn set(&self, context: &Context, value: Value) -> EvaluationResult<()> {
        let Some(path) = self.resolve(context)? else {
            return Err(EvaluationError::Unresolvable {
                expression: self.to_string(),
            });
        };
        let path = path.to_path_string(&context.meta().config().path_delimiter);
        log::debug!("setting '{path}' from expression '{self}'");
        context.controller().model().set(&path, value)
    }

    fn own_item(&self, context: &Context) -> Option<usize> {
        match context.expression() {
            Some(own) if own.same(self) => context.item(),
            _ => None,
        }
    }

    fn get_patch(&self, context: &Context, value: Value) -> Value {
        match self.own_item(context) {
            Some(item) => index_item(&value, item),
            None => value,
        }
    }

    fn resolve_patch(
        &self,
        context: &Context,
        path: Option<ResolvedPath>,
    ) -> Option<ResolvedPath> {
        match self.own_item(context) {
            Some(_) => path.map(|path| path.with(Segment::Item(context.clone()))),
            None => path,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.meta() {
            Some(meta) => write!(f, "Expression({:?})", meta.source),
            None => f
                .debug_tuple("Expression")
                .field(&self.inner.kind)
                .finish(),
        }
    }
}
