//! Operator table consumed by operator expressions

use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for operator operations
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Operator evaluation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    /// Wrong number of inputs
    #[error("Operator '{operator}' expects {expected} inputs, got {actual}")]
    InvalidArity {
        /// The operator symbol
        operator: String,
        /// Expected input count
        expected: usize,
        /// Actual input count
        actual: usize,
    },
    /// Inputs the operator cannot combine
    #[error("Operator '{operator}' cannot be applied to {operands}")]
    InvalidOperands {
        /// The operator symbol
        operator: String,
        /// Description of the operands
        operands: String,
    },
}

/// Trait for implementing template operators
pub trait TemplateOperator: Send + Sync {
    /// Operator name in the table (e.g. "+", "!U", "?")
    fn symbol(&self) -> &str;

    /// Fixed number of inputs, or `None` for variadic operators
    fn arity(&self) -> Option<usize>;

    /// Evaluate with already evaluated inputs
    fn evaluate(&self, inputs: &[Value]) -> OperatorResult<Value>;
}

/// Operator backed by a plain function
pub struct FnOperator {
    symbol: &'static str,
    arity: Option<usize>,
    function: fn(&[Value]) -> OperatorResult<Value>,
}

impl FnOperator {
    /// Create a fixed-arity operator
    pub const fn new(
        symbol: &'static str,
        arity: usize,
        function: fn(&[Value]) -> OperatorResult<Value>,
    ) -> Self {
        Self {
            symbol,
            arity: Some(arity),
            function,
        }
    }

    /// Create a variadic operator
    pub const fn variadic(
        symbol: &'static str,
        function: fn(&[Value]) -> OperatorResult<Value>,
    ) -> Self {
        Self {
            symbol,
            arity: None,
            function,
        }
    }
}

impl TemplateOperator for FnOperator {
    fn symbol(&self) -> &str {
        self.symbol
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }

    fn evaluate(&self, inputs: &[Value]) -> OperatorResult<Value> {
        (self.function)(inputs)
    }
}

/// Registry of template operators
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: FxHashMap<String, Arc<dyn TemplateOperator>>,
}

impl OperatorRegistry {
    /// Create an empty operator registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator, replacing any operator with the same symbol
    pub fn register<O: TemplateOperator + 'static>(&mut self, operator: O) {
        let operator: Arc<dyn TemplateOperator> = Arc::new(operator);
        self.operators.insert(operator.symbol().to_string(), operator);
    }

    /// Get an operator by symbol
    pub fn get(&self, symbol: &str) -> Option<Arc<dyn TemplateOperator>> {
        self.operators.get(symbol).cloned()
    }

    /// Check if an operator exists
    pub fn contains(&self, symbol: &str) -> bool {
        self.operators.contains_key(symbol)
    }

    /// Get all operator symbols
    pub fn symbols(&self) -> Vec<&str> {
        self.operators.keys().map(|s| s.as_str()).collect()
    }

    /// Check arity and evaluate the operator named `symbol`
    ///
    /// Returns `None` when no such operator is registered.
    pub fn evaluate(&self, symbol: &str, inputs: &[Value]) -> Option<OperatorResult<Value>> {
        let operator = self.operators.get(symbol)?;
        if let Some(expected) = operator.arity() {
            if expected != inputs.len() {
                return Some(Err(OperatorError::InvalidArity {
                    operator: symbol.to_string(),
                    expected,
                    actual: inputs.len(),
                }));
            }
        }
        Some(operator.evaluate(inputs))
    }
}

static MISSING: Value = Value::Null;

/// Input at `index`, or `Null` when fewer inputs were supplied
pub fn input(inputs: &[Value], index: usize) -> &Value {
    inputs.get(index).unwrap_or(&MISSING)
}

/// Create a registry with all built-in operators
pub fn create_standard_registry() -> OperatorRegistry {
    let mut registry = OperatorRegistry::new();
    super::operators::register_builtin_operators(&mut registry);
    registry
}
