//! Operator registry for template expressions
//!
//! Operator expressions call into a name-keyed table of [`TemplateOperator`]s
//! instead of searching controllers.

pub mod operator;
pub mod operators;

pub use operator::{
    FnOperator, OperatorError, OperatorRegistry, OperatorResult, TemplateOperator,
    create_standard_registry,
};
