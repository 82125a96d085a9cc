//! Built-in template operators
//!
//! Names follow the expression compiler: binary operators use their symbol,
//! unary operators carry a `U` suffix (`!U`, `-U`), `?` is the conditional
//! and `,` the sequence operator.

mod arithmetic;
mod comparison;
mod logical;

use super::operator::OperatorRegistry;

pub use arithmetic::register_arithmetic_operators;
pub use comparison::register_comparison_operators;
pub use logical::register_logical_operators;

/// Register all built-in operators
pub fn register_builtin_operators(registry: &mut OperatorRegistry) {
    register_logical_operators(registry);
    register_comparison_operators(registry);
    register_arithmetic_operators(registry);
}
