//! View registry and view-instance attributes
//!
//! Views are registered by name with their template source. Lookup is
//! namespace-aware: a name used inside `app:nav` is first tried as
//! `app:nav:name` and then against each enclosing namespace.

use crate::expression::Expression;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Options declared when registering a view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Whitespace separated attribute names that take template content
    pub attributes: Option<String>,
    /// Whitespace separated `name/alias` pairs collected as arrays
    pub arrays: Option<String>,
    /// Keep whitespace in the template source
    pub unminified: bool,
    /// Render as a string rather than markup
    pub string: bool,
    /// Custom element name mapped to this view
    pub element: Option<String>,
}

/// A registered view definition
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    namespace: String,
    registered_name: String,
    source: String,
    options: ViewOptions,
    attributes_map: Option<FxHashSet<String>>,
    arrays_map: Option<FxHashMap<String, String>>,
}

impl View {
    /// Create a view definition
    pub fn new(name: impl Into<String>, source: impl Into<String>, options: ViewOptions) -> Self {
        let name = name.into();
        let mut segments: Vec<&str> = name.split(':').collect();
        let last = segments.pop().unwrap_or_default();
        let namespace = segments.join(":");
        let registered_name = if last == "index" {
            namespace.clone()
        } else {
            name.clone()
        };
        let attributes_map = options
            .attributes
            .as_deref()
            .map(|source| source.split_whitespace().map(str::to_string).collect());
        let arrays_map = options.arrays.as_deref().map(|source| {
            source
                .split_whitespace()
                .map(|item| match item.split_once('/') {
                    Some((name, alias)) => (name.to_string(), alias.to_string()),
                    None => (item.to_string(), item.to_string()),
                })
                .collect()
        });
        Self {
            namespace,
            registered_name,
            source: source.into(),
            options,
            attributes_map,
            arrays_map,
            name,
        }
    }

    /// Full view name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace the view was declared in
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Name under which the view is registered (`index` views use their namespace)
    pub fn registered_name(&self) -> &str {
        &self.registered_name
    }

    /// Template source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Registration options
    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Check if `name` is declared as a content attribute
    pub fn has_content_attribute(&self, name: &str) -> bool {
        self.attributes_map
            .as_ref()
            .is_some_and(|names| names.contains(name))
    }

    /// Alias under which array attribute `name` is collected
    pub fn array_alias(&self, name: &str) -> Option<&str> {
        self.arrays_map
            .as_ref()
            .and_then(|arrays| arrays.get(name))
            .map(String::as_str)
    }
}

#[derive(Default)]
struct ViewMaps {
    names: IndexMap<String, Arc<View>>,
    elements: FxHashMap<String, Arc<View>>,
}

/// Registry of views for one application
#[derive(Default)]
pub struct Views {
    maps: RwLock<ViewMaps>,
}

impl Views {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view, replacing any previous definition of the same name
    pub fn register(
        &self,
        name: impl Into<String>,
        source: impl Into<String>,
        options: ViewOptions,
    ) -> Arc<View> {
        let name = name.into();
        let map_name = name.strip_suffix(":index").unwrap_or(&name).to_string();
        let view = Arc::new(View::new(name, source, options));
        let mut maps = self.maps.write();
        maps.names.insert(map_name, view.clone());
        if let Some(element) = &view.options.element {
            maps.elements.insert(element.clone(), view.clone());
        }
        view
    }

    /// Find a view by name, relative to a namespace
    pub fn find(&self, name: &str, namespace: Option<&str>) -> Option<Arc<View>> {
        let maps = self.maps.read();
        let namespace = namespace.filter(|ns| !ns.is_empty());

        let exact = match namespace {
            Some(ns) => format!("{ns}:{name}"),
            None => name.to_string(),
        };
        if let Some(view) = maps.names.get(&exact) {
            return Some(view.clone());
        }

        let mut segments: Vec<&str> = name.split(':').collect();
        let mut name_segments = segments.len();
        if let Some(ns) = namespace {
            let mut full: Vec<&str> = ns.split(':').collect();
            full.extend(segments);
            segments = full;
        }
        // Drop namespace segments right before the kept name segments, one
        // at a time, then retry keeping fewer name segments
        while name_segments > 0 {
            while segments.len() > name_segments {
                segments.remove(segments.len() - 1 - name_segments);
                let candidate = segments.join(":");
                if let Some(view) = maps.names.get(&candidate) {
                    log::debug!("view '{name}' resolved to '{candidate}'");
                    return Some(view.clone());
                }
            }
            name_segments -= 1;
        }
        None
    }

    /// Find the view mapped to a custom element name
    pub fn find_element(&self, element: &str) -> Option<Arc<View>> {
        self.maps.read().elements.get(element).cloned()
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<String> {
        self.maps.read().names.keys().cloned().collect()
    }

    /// Number of registered views
    pub fn len(&self) -> usize {
        self.maps.read().names.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.maps.read().names.is_empty()
    }

    /// Diagnostic for a failed lookup
    pub fn find_error_message(&self, name: &str, context_view: Option<&View>) -> String {
        let mut message = format!("Cannot find view \"{name}\" in");
        for known in self.names() {
            message.push_str("\n  ");
            message.push_str(&known);
        }
        message.push('\n');
        if let Some(view) = context_view {
            message.push_str(&format!(
                "\nWithin template \"{}\":\n{}",
                view.name(),
                view.source()
            ));
        }
        message
    }
}

/// Attribute expressions passed to one view instance
#[derive(Clone, Default)]
pub struct ViewAttributes {
    entries: IndexMap<String, Expression>,
    inherit: bool,
}

impl ViewAttributes {
    /// Create an empty attribute map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute
    pub fn with(mut self, name: impl Into<String>, expression: Expression) -> Self {
        self.entries.insert(name.into(), expression);
        self
    }

    /// Let lookups continue to enclosing view boundaries
    pub fn inheriting(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// Insert an attribute
    pub fn insert(&mut self, name: impl Into<String>, expression: Expression) {
        self.entries.insert(name.into(), expression);
    }

    /// Get an attribute expression
    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.entries.get(name)
    }

    /// Check if an attribute is declared
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether lookups continue past this boundary
    pub fn inherits(&self) -> bool {
        self.inherit
    }

    /// Iterate attributes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.entries.iter().map(|(name, expr)| (name.as_str(), expr))
    }

    /// Attribute expressions, for dependency collection
    pub fn entries(&self) -> &IndexMap<String, Expression> {
        &self.entries
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no attributes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
