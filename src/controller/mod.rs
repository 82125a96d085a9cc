//! Controllers: the components and pages that own template data
//!
//! A controller exposes its [`Model`] for data reads and write-back, an
//! optional parent for upward function search, and named members that
//! function-call expressions look up by property path.

mod component;

pub use component::{Component, ComponentBuilder, Namespace};

use crate::error::{EvaluationError, EvaluationResult};
use crate::model::Model;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Anything with named members: a controller or one of its namespaces
pub trait Receiver: Send + Sync {
    /// Look up a member by name
    fn member(&self, name: &str) -> Option<Member>;
}

/// Owning component or page of a context
pub trait Controller: Receiver {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Data store of this controller
    fn model(&self) -> &dyn Model;

    /// Enclosing controller, searched when a function is not found here
    fn parent(&self) -> Option<Arc<dyn Controller>> {
        None
    }

    /// View of this controller as a call receiver
    fn as_receiver(&self) -> &dyn Receiver;
}

/// Function callable from a template expression
pub trait TemplateFunction: Send + Sync {
    /// Call with the object the function was found on as receiver
    fn call(&self, receiver: &dyn Receiver, inputs: &[Value]) -> EvaluationResult<Value>;

    /// Invoke as a constructor
    fn construct(&self, inputs: &[Value]) -> EvaluationResult<Value> {
        let _ = inputs;
        Err(EvaluationError::invalid_operation(
            "function cannot be invoked as a constructor",
        ))
    }
}

/// Named member of a receiver
#[derive(Clone)]
pub enum Member {
    /// Plain data
    Value(Value),
    /// Nested object with its own members
    Object(Arc<dyn Receiver>),
    /// Callable function or constructor
    Function(Arc<dyn TemplateFunction>),
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Object(_) => f.write_str("Object(..)"),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

struct ClosureFunction<F>(F);

impl<F> TemplateFunction for ClosureFunction<F>
where
    F: Fn(&[Value]) -> EvaluationResult<Value> + Send + Sync,
{
    fn call(&self, _receiver: &dyn Receiver, inputs: &[Value]) -> EvaluationResult<Value> {
        (self.0)(inputs)
    }
}

struct ClosureConstructor<F>(F);

impl<F> TemplateFunction for ClosureConstructor<F>
where
    F: Fn(&[Value]) -> EvaluationResult<Value> + Send + Sync,
{
    fn call(&self, _receiver: &dyn Receiver, inputs: &[Value]) -> EvaluationResult<Value> {
        (self.0)(inputs)
    }

    fn construct(&self, inputs: &[Value]) -> EvaluationResult<Value> {
        (self.0)(inputs)
    }
}

/// Wrap a closure as a template function that ignores its receiver
pub fn function<F>(f: F) -> Arc<dyn TemplateFunction>
where
    F: Fn(&[Value]) -> EvaluationResult<Value> + Send + Sync + 'static,
{
    Arc::new(ClosureFunction(f))
}

/// Wrap a closure as a constructor usable by `new` expressions
pub fn constructor<F>(f: F) -> Arc<dyn TemplateFunction>
where
    F: Fn(&[Value]) -> EvaluationResult<Value> + Send + Sync + 'static,
{
    Arc::new(ClosureConstructor(f))
}

/// Object on which a function was found, passed back as the call receiver
#[derive(Clone)]
pub enum CallTarget {
    /// The function is a direct member of a controller
    Controller(Arc<dyn Controller>),
    /// The function lives under a nested object of a controller
    Object(Arc<dyn Receiver>),
}

impl CallTarget {
    /// Receiver view of the target
    pub fn receiver(&self) -> &dyn Receiver {
        match self {
            Self::Controller(controller) => controller.as_receiver(),
            Self::Object(object) => object.as_ref(),
        }
    }
}

/// Walk a member path below a receiver, returning the object it names
pub fn lookup_object(receiver: &dyn Receiver, segments: &[String]) -> Option<Arc<dyn Receiver>> {
    let (first, rest) = segments.split_first()?;
    let mut current = match receiver.member(first)? {
        Member::Object(object) => object,
        _ => return None,
    };
    for segment in rest {
        current = match current.member(segment)? {
            Member::Object(object) => object,
            _ => return None,
        };
    }
    Some(current)
}

/// Search the controller ownership chain for a function
///
/// At each level the `parent_segments` are looked up to find the candidate
/// object, then `name` is read off it. The first level exposing a function
/// wins.
pub fn find_function(
    controller: &Arc<dyn Controller>,
    parent_segments: Option<&[String]>,
    name: &str,
) -> Option<(CallTarget, Arc<dyn TemplateFunction>)> {
    let mut current = Some(controller.clone());
    while let Some(level) = current {
        log::trace!("searching controller '{}' for {name}", level.name());
        let target = match parent_segments {
            Some(segments) => lookup_object(level.as_receiver(), segments).map(CallTarget::Object),
            None => Some(CallTarget::Controller(level.clone())),
        };
        if let Some(target) = target {
            if let Some(Member::Function(function)) = target.receiver().member(name) {
                return Some((target, function));
            }
        }
        current = level.parent();
    }
    None
}
