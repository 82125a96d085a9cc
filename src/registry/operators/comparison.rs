//! Equality, ordering and membership operators

use super::super::operator::{FnOperator, OperatorRegistry, OperatorResult, input};
use crate::model::{member, to_number};
use serde_json::Value;
use std::cmp::Ordering;

/// Register comparison operators
pub fn register_comparison_operators(registry: &mut OperatorRegistry) {
    registry.register(FnOperator::new("==", 2, loose_equal));
    registry.register(FnOperator::new("!=", 2, loose_not_equal));
    registry.register(FnOperator::new("===", 2, strict_equal));
    registry.register(FnOperator::new("!==", 2, strict_not_equal));
    registry.register(FnOperator::new("<", 2, less_than));
    registry.register(FnOperator::new(">", 2, greater_than));
    registry.register(FnOperator::new("<=", 2, less_equal));
    registry.register(FnOperator::new(">=", 2, greater_equal));
    registry.register(FnOperator::new("in", 2, contains_key));
}

/// Strict equality: same type and value, numbers compared numerically
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64() == r.as_f64(),
        _ => left == right,
    }
}

/// Loose equality with scalar coercion
///
/// `null` only equals `null`; numbers, booleans and strings are compared
/// numerically when their types differ.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            left == right
        }
        (Value::String(l), Value::String(r)) => l == r,
        _ => match (to_number(left), to_number(right)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        },
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        _ => to_number(left)?.partial_cmp(&to_number(right)?),
    }
}

fn loose_equal(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(Value::Bool(loose_equals(input(inputs, 0), input(inputs, 1))))
}

fn loose_not_equal(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(Value::Bool(!loose_equals(input(inputs, 0), input(inputs, 1))))
}

fn strict_equal(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(Value::Bool(strict_equals(input(inputs, 0), input(inputs, 1))))
}

fn strict_not_equal(inputs: &[Value]) -> OperatorResult<Value> {
    Ok(Value::Bool(!strict_equals(input(inputs, 0), input(inputs, 1))))
}

fn less_than(inputs: &[Value]) -> OperatorResult<Value> {
    let ordering = compare(input(inputs, 0), input(inputs, 1));
    Ok(Value::Bool(ordering == Some(Ordering::Less)))
}

fn greater_than(inputs: &[Value]) -> OperatorResult<Value> {
    let ordering = compare(input(inputs, 0), input(inputs, 1));
    Ok(Value::Bool(ordering == Some(Ordering::Greater)))
}

fn less_equal(inputs: &[Value]) -> OperatorResult<Value> {
    let ordering = compare(input(inputs, 0), input(inputs, 1));
    Ok(Value::Bool(matches!(ordering, Some(Ordering::Less | Ordering::Equal))))
}

fn greater_equal(inputs: &[Value]) -> OperatorResult<Value> {
    let ordering = compare(input(inputs, 0), input(inputs, 1));
    Ok(Value::Bool(matches!(
        ordering,
        Some(Ordering::Greater | Ordering::Equal)
    )))
}

fn contains_key(inputs: &[Value]) -> OperatorResult<Value> {
    let key = match input(inputs, 0) {
        Value::String(name) => name.clone(),
        Value::Null => return Ok(Value::Bool(false)),
        other => other.to_string(),
    };
    Ok(Value::Bool(member(input(inputs, 1), &key).is_some()))
}
