//! State shared by every context of one render tree

use crate::config::ContextConfig;
use crate::registry::{OperatorRegistry, create_standard_registry};
use crate::views::Views;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Callback invoked when a binding is attached to or detached from a context
pub type BindingHook = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Render-tree wide state: view registry, operator table, binding hooks
/// and the id counter
pub struct ContextMeta {
    config: ContextConfig,
    views: Arc<Views>,
    operators: Arc<OperatorRegistry>,
    on_add: Option<BindingHook>,
    on_remove: Option<BindingHook>,
    // The only mutable state of the scope model
    id_count: AtomicU64,
}

impl Default for ContextMeta {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl ContextMeta {
    /// Create meta state with an empty view registry and the standard operators
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            views: Arc::new(Views::new()),
            operators: Arc::new(create_standard_registry()),
            on_add: None,
            on_remove: None,
            id_count: AtomicU64::new(0),
        }
    }

    /// Use a view registry
    pub fn with_views(mut self, views: Arc<Views>) -> Self {
        self.views = views;
        self
    }

    /// Use an operator table
    pub fn with_operators(mut self, operators: Arc<OperatorRegistry>) -> Self {
        self.operators = operators;
        self
    }

    /// Set the binding-added hook
    pub fn with_on_add(mut self, hook: BindingHook) -> Self {
        self.on_add = Some(hook);
        self
    }

    /// Set the binding-removed hook
    pub fn with_on_remove(mut self, hook: BindingHook) -> Self {
        self.on_remove = Some(hook);
        self
    }

    /// Configuration
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// View registry
    pub fn views(&self) -> &Arc<Views> {
        &self.views
    }

    /// Operator table
    pub fn operators(&self) -> &Arc<OperatorRegistry> {
        &self.operators
    }

    /// Generate the next unique id, `namespace + "_" + base36(count)`
    pub fn next_id(&self) -> String {
        let count = self.id_count.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}_{}", self.config.id_namespace, to_base36(count))
    }

    /// Number of ids generated so far
    pub fn id_count(&self) -> u64 {
        self.id_count.load(Ordering::Relaxed)
    }

    /// Forward to the binding-added hook
    pub fn on_add(&self, binding: &dyn Any) {
        if let Some(hook) = &self.on_add {
            hook(binding);
        }
    }

    /// Forward to the binding-removed hook
    pub fn on_remove(&self, binding: &dyn Any) {
        if let Some(hook) = &self.on_remove {
            hook(binding);
        }
    }
}

impl fmt::Debug for ContextMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMeta")
            .field("config", &self.config)
            .field("views", &self.views.len())
            .field("id_count", &self.id_count())
            .finish()
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
