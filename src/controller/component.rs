//! Standard controller implementation

use super::{Controller, Member, Receiver, TemplateFunction};
use crate::error::EvaluationResult;
use crate::model::Model;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;

/// Named bag of members, usable as a nested call receiver
#[derive(Clone, Default)]
pub struct Namespace {
    members: FxHashMap<String, Member>,
}

impl Namespace {
    /// Create an empty namespace
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function member
    pub fn function(
        mut self,
        name: impl Into<String>,
        function: Arc<dyn TemplateFunction>,
    ) -> Self {
        self.members.insert(name.into(), Member::Function(function));
        self
    }

    /// Add a nested namespace
    pub fn namespace(mut self, name: impl Into<String>, namespace: Namespace) -> Self {
        self.members.insert(name.into(), Member::Object(Arc::new(namespace)));
        self
    }

    /// Add a plain value member
    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members.insert(name.into(), Member::Value(value));
        self
    }

    /// Check if a member exists
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }
}

impl Receiver for Namespace {
    fn member(&self, name: &str) -> Option<Member> {
        self.members.get(name).cloned()
    }
}

/// Component or page owning a model and a set of template-callable members
pub struct Component {
    name: String,
    model: Arc<dyn Model>,
    parent: Option<Arc<dyn Controller>>,
    members: Namespace,
}

impl Component {
    /// Start building a component around a model
    pub fn builder(model: Arc<dyn Model>) -> ComponentBuilder {
        ComponentBuilder {
            name: "app".to_string(),
            model,
            parent: None,
            members: Namespace::new(),
        }
    }

    /// Shared handle to the model
    pub fn model_handle(&self) -> Arc<dyn Model> {
        self.model.clone()
    }
}

impl Receiver for Component {
    fn member(&self, name: &str) -> Option<Member> {
        self.members.member(name)
    }
}

impl Controller for Component {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    fn parent(&self) -> Option<Arc<dyn Controller>> {
        self.parent.clone()
    }

    fn as_receiver(&self) -> &dyn Receiver {
        self
    }
}

/// Builder for [`Component`]
pub struct ComponentBuilder {
    name: String,
    model: Arc<dyn Model>,
    parent: Option<Arc<dyn Controller>>,
    members: Namespace,
}

impl ComponentBuilder {
    /// Set the diagnostic name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the owning controller
    pub fn parent(mut self, parent: Arc<dyn Controller>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add a function member
    pub fn function(
        mut self,
        name: impl Into<String>,
        function: Arc<dyn TemplateFunction>,
    ) -> Self {
        self.members = self.members.function(name, function);
        self
    }

    /// Add a constructor member usable by `new` expressions
    pub fn constructor<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> EvaluationResult<Value> + Send + Sync + 'static,
    {
        self.members = self.members.function(name, super::constructor(f));
        self
    }

    /// Add a nested namespace
    pub fn namespace(mut self, name: impl Into<String>, namespace: Namespace) -> Self {
        self.members = self.members.namespace(name, namespace);
        self
    }

    /// Add a plain value member
    pub fn value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.members = self.members.value(name, value);
        self
    }

    /// Finish the component
    pub fn build(self) -> Arc<Component> {
        Arc::new(Component {
            name: self.name,
            model: self.model,
            parent: self.parent,
            members: self.members,
        })
    }
}
