//! Scope chain and expression evaluation for reactive templates
//!
//! Templates are parsed into [`Expression`] trees and evaluated against a
//! [`Context`], one node of the scope tree built while rendering. Every
//! expression can produce its value, the model path it was read from (for
//! two-way bindings) and the paths it depends on (for fine-grained updates).

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod expression;
pub mod model;
pub mod registry;
pub mod views;

// Re-export main types
pub use config::ContextConfig;
pub use context::{Context, ContextMeta};
pub use controller::{Component, Controller, Namespace, TemplateFunction, constructor, function};
pub use error::{EvaluationError, EvaluationResult};
pub use expression::{BlockType, Expression, ExpressionKind, ExpressionMeta};
pub use model::{MemoryModel, Model, ResolvedPath, Segment};
pub use registry::{OperatorRegistry, create_standard_registry};
pub use views::{View, ViewAttributes, ViewOptions, Views};
