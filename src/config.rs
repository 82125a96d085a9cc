//! Configuration for a render tree's shared context state

/// Configuration shared by every context of one render tree
///
/// # Examples
///
/// ```rust
/// use template_scope::ContextConfig;
///
/// let config = ContextConfig::default()
///     .with_id_namespace("page")
///     .with_path_delimiter(".");
/// assert_eq!(config.id_namespace, "page");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Prefix of every id generated by `Context::id`. Default: ""
    pub id_namespace: String,

    /// Delimiter used to join resolved segments into a model path for
    /// write-back. Default: "."
    pub path_delimiter: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            id_namespace: String::new(),
            path_delimiter: ".".to_string(),
        }
    }
}

impl ContextConfig {
    /// Create new configuration with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id namespace
    pub fn with_id_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.id_namespace = namespace.into();
        self
    }

    /// Set the write-back path delimiter
    pub fn with_path_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.path_delimiter = delimiter.into();
        self
    }
}
