//! Error types for scope resolution and expression evaluation

use crate::registry::OperatorError;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur while evaluating or resolving template expressions
///
/// Every variant is a fatal authoring defect in the scope or expression tree.
/// Missing data (a null path segment, an unset bracket key, an undeclared view
/// attribute) is never reported here: it surfaces as `Value::Null` from `get`
/// and as `None` from `resolve`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// No enclosing block declares the alias
    #[error("Alias not found: {alias}")]
    AliasNotFound {
        /// Alias name, including the leading `#`
        alias: String,
    },

    /// No controller in the ownership chain exposes the function
    #[error("Function not found for: {path}")]
    FunctionNotFound {
        /// Dotted path of the function
        path: String,
    },

    /// Operator missing from the operator table
    #[error("Operator not found: {name}")]
    OperatorNotFound {
        /// Operator symbol
        name: String,
    },

    /// Operator evaluation error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// View lookup failed
    #[error("{message}")]
    ViewNotFound {
        /// Requested view name
        name: String,
        /// Diagnostic listing the registered views
        message: String,
    },

    /// Write-back through an expression that has no stable path
    #[error("Cannot set value: no path for expression {expression}")]
    Unresolvable {
        /// Source text of the expression
        expression: String,
    },

    /// Model write through a value that cannot hold children
    #[error("Invalid path '{path}': {message}")]
    InvalidPath {
        /// Path that was written
        path: String,
        /// Error message
        message: String,
    },

    /// Error raised by a controller function
    #[error("Function error in {name}: {message}")]
    Function {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },

    /// Invalid operation
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Error message
        message: String,
    },
}

impl EvaluationError {
    /// Create a function error
    pub fn function(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Function {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
