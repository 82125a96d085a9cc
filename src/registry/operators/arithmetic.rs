//! Arithmetic operators with JS number semantics

use super::super::operator::{FnOperator, OperatorRegistry, OperatorResult, input};
use crate::model::{number_value, to_display_string, to_number};
use serde_json::Value;

/// Register arithmetic operators
pub fn register_arithmetic_operators(registry: &mut OperatorRegistry) {
    registry.register(FnOperator::new("-U", 1, negate));
    registry.register(FnOperator::new("+U", 1, plus));
    registry.register(FnOperator::new("+", 2, add));
    registry.register(FnOperator::new("-", 2, subtract));
    registry.register(FnOperator::new("*", 2, multiply));
    registry.register(FnOperator::new("/", 2, divide));
    registry.register(FnOperator::new("%", 2, remainder));
}

// Non-numeric operands produce NaN, which has no JSON form
fn numeric(inputs: &[Value], op: fn(f64, f64) -> f64) -> OperatorResult<Value> {
    match (to_number(input(inputs, 0)), to_number(input(inputs, 1))) {
        (Some(left), Some(right)) => Ok(number_value(op(left, right))),
        _ => Ok(Value::Null),
    }
}

fn negate(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(to_number(input(inputs, 0)).map_or(Value::Null, |n| number_value(-n)))
}

fn plus(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(to_number(input(inputs, 0)).map_or(Value::Null, number_value))
}

/// `a + b`: concatenates when either side is a string, array or object
///
/// A missing operand concatenates as `undefined`, as in JS.
fn add(inputs: &[Value]) -> OperatorResult<Value> {
    let (left, right) = (input(inputs, 0), input(inputs, 1));
    let concatenates =
        |value: &Value| matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_));
    if concatenates(left) || concatenates(right) {
        let mut text = concat_string(left);
        text.push_str(&concat_string(right));
        return Ok(Value::String(text));
    }
    numeric(inputs, |l, r| l + r)
}

fn concat_string(value: &Value) -> String {
    match value {
        Value::Null => "undefined".to_string(),
        other => to_display_string(other),
    }
}

fn subtract(inputs: &[Value]) -> OperatorResult<Value> {
    numeric(inputs, |l, r| l - r)
}

fn multiply(inputs: &[Value]) -> OperatorResult<Value> {
    numeric(inputs, |l, r| l * r)
}

fn divide(inputs: &[Value]) -> OperatorResult<Value> {
    numeric(inputs, |l, r| l / r)
}

fn remainder(inputs: &[Value]) -> OperatorResult<Value> {
    numeric(inputs, |l, r| l % r)
}
