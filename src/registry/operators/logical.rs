//! Logical, conditional and sequence operators

use super::super::operator::{FnOperator, OperatorRegistry, OperatorResult, input};
use crate::model::js_truthy;
use serde_json::Value;

/// Register logical operators
pub fn register_logical_operators(registry: &mut OperatorRegistry) {
    registry.register(FnOperator::new("!U", 1, not));
    registry.register(FnOperator::new("||", 2, or));
    registry.register(FnOperator::new("&&", 2, and));
    registry.register(FnOperator::new("?", 3, conditional));
    registry.register(FnOperator::new("typeofU", 1, type_of));
    registry.register(FnOperator::variadic(",", sequence));
}

fn not(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(Value::Bool(!js_truthy(input(inputs, 0))))
}

fn or(inputs: &[Value]) -> OperatorResult<Value> {
    let chosen = if js_truthy(input(inputs, 0)) { input(inputs, 0) } else { input(inputs, 1) };
    Ok(chosen.clone())
}

fn and(inputs: &[Value]) -> OperatorResult<Value> {
    let chosen = if js_truthy(input(inputs, 0)) { input(inputs, 1) } else { input(inputs, 0) };
    Ok(chosen.clone())
}

fn conditional(inputs: &[Value]) -> OperatorResult<Value> {
    let chosen = if js_truthy(input(inputs, 0)) { input(inputs, 1) } else { input(inputs, 2) };
    Ok(chosen.clone())
}

fn type_of(inputs: &[Value]) -> OperatorResult<Value> {
    let name = match input(inputs, 0) {
        Value::Null => "undefined",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) | Value::Object(_) => "object",
    };
    Ok(Value::from(name))
}

fn sequence(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(inputs.last().cloned().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use crate::registry::create_standard_registry;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn eval(symbol: &str, inputs: &[Value]) -> Value {
        create_standard_registry()
            .evaluate(symbol, inputs)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_short_circuit_values() {
        assert_eq!(eval("||", &[json!(0), json!("b")]), json!("b"));
        assert_eq!(eval("||", &[json!("a"), json!("b")]), json!("a"));
        assert_eq!(eval("&&", &[json!(""), json!("b")]), json!(""));
        assert_eq!(eval("&&", &[json!(1), json!("b")]), json!("b"));
    }

    #[test]
    fn test_not_and_conditional() {
        assert_eq!(eval("!U", &[json!([])]), json!(false));
        assert_eq!(eval("!U", &[Value::Null]), json!(true));
        assert_eq!(eval("?", &[json!(true), json!(1), json!(2)]), json!(1));
        assert_eq!(eval("?", &[json!(null), json!(1), json!(2)]), json!(2));
    }

    #[test]
    fn test_typeof_and_sequence() {
        assert_eq!(eval("typeofU", &[json!({})]), json!("object"));
        assert_eq!(eval("typeofU", &[Value::Null]), json!("undefined"));
        assert_eq!(eval(",", &[json!(1), json!(2), json!(3)]), json!(3));
        assert_eq!(eval(",", &[]), Value::Null);
    }
}
