//! Lexical scope chain for template evaluation
//!
//! A [`Context`] is one node of the scope tree built while walking a
//! template: the implicit root of a controller, a block (`if`, `with`,
//! `each`, ...), one iteration of an `each` block, a nested component, or
//! a view instance. Each node adds exactly one binding to its parent and is
//! never changed after construction, apart from the floating item index of
//! iteration contexts.

mod meta;

pub use meta::{BindingHook, ContextMeta};

use crate::controller::Controller;
use crate::error::{EvaluationError, EvaluationResult};
use crate::expression::{BlockType, Expression};
use crate::views::{View, ViewAttributes};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One node of the scope tree
///
/// Cheap to clone: clones share the same node.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextNode>,
}

struct ContextNode {
    meta: Arc<ContextMeta>,
    controller: Arc<dyn Controller>,
    parent: Option<Context>,
    unbound: bool,
    expression: Option<Expression>,
    alias: Option<String>,
    item: Option<AtomicUsize>,
    view: Option<Arc<View>>,
    attributes: Option<Arc<ViewAttributes>>,
}

impl ContextNode {
    fn new(meta: Arc<ContextMeta>, controller: Arc<dyn Controller>) -> Self {
        Self {
            meta,
            controller,
            parent: None,
            unbound: false,
            expression: None,
            alias: None,
            item: None,
            view: None,
            attributes: None,
        }
    }
}

impl Context {
    /// Create the implicit root context of a controller
    pub fn root(meta: Arc<ContextMeta>, controller: Arc<dyn Controller>) -> Self {
        Self {
            inner: Arc::new(ContextNode::new(meta, controller)),
        }
    }

    fn derive(&self, controller: Arc<dyn Controller>, unbound: bool) -> ContextNode {
        ContextNode {
            parent: Some(self.clone()),
            unbound,
            ..ContextNode::new(self.inner.meta.clone(), controller)
        }
    }

    fn from_node(node: ContextNode) -> Self {
        Self {
            inner: Arc::new(node),
        }
    }

    /// Shared render-tree state
    pub fn meta(&self) -> &Arc<ContextMeta> {
        &self.inner.meta
    }

    /// Owning component or page
    pub fn controller(&self) -> &Arc<dyn Controller> {
        &self.inner.controller
    }

    /// Containing context
    pub fn parent(&self) -> Option<&Context> {
        self.inner.parent.as_ref()
    }

    /// Whether live bindings must not be attached in this subtree
    pub fn is_unbound(&self) -> bool {
        self.inner.unbound
    }

    /// Block expression that introduced this scope
    pub fn expression(&self) -> Option<&Expression> {
        self.inner.expression.as_ref()
    }

    /// Alias under which the block expression is exposed
    pub fn alias(&self) -> Option<&str> {
        self.inner.alias.as_deref()
    }

    /// Current index of an iteration context
    pub fn item(&self) -> Option<usize> {
        self.inner
            .item
            .as_ref()
            .map(|item| item.load(Ordering::Relaxed))
    }

    /// Move an iteration context to a new index
    ///
    /// Returns `false` for contexts that are not iteration contexts.
    pub fn set_item(&self, index: usize) -> bool {
        match &self.inner.item {
            Some(item) => {
                item.store(index, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// View this boundary belongs to
    pub fn view(&self) -> Option<&Arc<View>> {
        self.inner.view.as_ref()
    }

    /// Attributes passed to the view instance
    pub fn attributes(&self) -> Option<&Arc<ViewAttributes>> {
        self.inner.attributes.as_ref()
    }

    /// Attribute expression declared on this view boundary
    pub fn attribute(&self, name: &str) -> Option<&Expression> {
        self.attributes().and_then(|attributes| attributes.get(name))
    }

    /// Check if two handles refer to the same node
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Generate a unique id within this render tree
    pub fn id(&self) -> String {
        self.inner.meta.next_id()
    }

    /// Register a binding with the render tree
    pub fn on_add(&self, binding: &dyn Any) {
        self.inner.meta.on_add(binding);
    }

    /// Unregister a binding from the render tree
    pub fn on_remove(&self, binding: &dyn Any) {
        self.inner.meta.on_remove(binding);
    }

    /// Enter a block
    ///
    /// `unbound` blocks force the subtree unbound, `bound` blocks force it
    /// bound; every other block inherits the current mode.
    pub fn child(&self, expression: Expression) -> Context {
        let unbound = match expression.block_type() {
            Some(BlockType::Unbound) => true,
            Some(BlockType::Bound) => false,
            _ => self.inner.unbound,
        };
        let mut node = self.derive(self.inner.controller.clone(), unbound);
        node.alias = expression.alias().map(str::to_string);
        node.expression = Some(expression);
        Self::from_node(node)
    }

    /// Enter a nested component
    pub fn component_child(&self, component: Arc<dyn Controller>) -> Context {
        Self::from_node(self.derive(component, self.inner.unbound))
    }

    /// Create the context of one iteration of an each block
    ///
    /// Keeps this context's block expression so values produced by it are
    /// indexed by the live `index`.
    pub fn each_child(&self, index: usize) -> Context {
        let mut node = self.derive(self.inner.controller.clone(), self.inner.unbound);
        node.expression = self.inner.expression.clone();
        node.alias = self.inner.alias.clone();
        node.item = Some(AtomicUsize::new(index));
        Self::from_node(node)
    }

    /// Enter a view instance
    pub fn view_child(&self, view: Arc<View>, attributes: Option<Arc<ViewAttributes>>) -> Context {
        let mut node = self.derive(self.inner.controller.clone(), self.inner.unbound);
        node.view = Some(view);
        node.attributes = attributes;
        Self::from_node(node)
    }

    fn ancestors(&self) -> impl Iterator<Item = &Context> {
        std::iter::successors(Some(self), |context| context.parent())
    }

    /// Closest context (starting here) that declared the alias
    pub fn for_alias(&self, alias: &str) -> EvaluationResult<&Context> {
        log::trace!("looking up alias {alias}");
        self.ancestors()
            .find(|context| context.alias() == Some(alias))
            .ok_or_else(|| EvaluationError::AliasNotFound {
                alias: alias.to_string(),
            })
    }

    /// Closest view boundary that supplies the attribute, if any
    ///
    /// Stops at the nearest view boundary unless its attributes inherit.
    pub fn for_attribute(&self, attribute: &str) -> Option<&Context> {
        for context in self.ancestors() {
            if context.view().is_none() {
                continue;
            }
            let attributes = context.attributes()?;
            if attributes.contains(attribute) {
                return Some(context);
            }
            if !attributes.inherits() {
                log::trace!("attribute @{attribute} not declared on view boundary");
                return None;
            }
        }
        None
    }

    /// Closest scope not introduced by `expression`
    ///
    /// A block expression evaluated in its own block or iteration context
    /// reads the scope it was written in.
    pub fn for_relative(&self, expression: &Expression) -> &Context {
        let mut context = self;
        while let Some(parent) = context.parent() {
            match context.expression() {
                Some(own) if own.id() == expression.id() => context = parent,
                _ => break,
            }
        }
        context
    }

    /// Scope enclosing the nearest view boundary
    pub fn for_view_parent(&self) -> Option<&Context> {
        self.ancestors()
            .find(|context| context.view().is_some())
            .and_then(Context::parent)
    }

    /// Nearest enclosing view
    pub fn get_view(&self) -> Option<&Arc<View>> {
        self.ancestors().find_map(Context::view)
    }

    /// Find a view by name relative to the namespace of the enclosing view
    pub fn find_view(&self, name: &str) -> EvaluationResult<Arc<View>> {
        let context_view = self.get_view();
        let namespace = context_view.map(|view| view.namespace());
        let views = self.inner.meta.views();
        views.find(name, namespace).ok_or_else(|| {
            log::debug!("view '{name}' not found");
            EvaluationError::ViewNotFound {
                name: name.to_string(),
                message: views.find_error_message(name, context_view.map(|view| &**view)),
            }
        })
    }

    /// Current value of the scope (`this`)
    pub fn get(&self) -> EvaluationResult<Value> {
        match self.expression() {
            Some(expression) => expression.get(self),
            None => Ok((*self.data()).clone()),
        }
    }

    /// Root data of the owning controller
    pub fn data(&self) -> Arc<Value> {
        self.inner.controller.model().data()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("controller", &self.inner.controller.name())
            .field("unbound", &self.inner.unbound)
            .field("expression", &self.inner.expression)
            .field("item", &self.item())
            .field("view", &self.inner.view.as_ref().map(|view| view.name()))
            .finish()
    }
}
