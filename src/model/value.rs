//! Value helpers shared by every expression variant
//!
//! Template data is plain JSON. `undefined` and `null` both map to
//! `Value::Null`, so a miss anywhere along a path collapses to `Null`.

use serde_json::{Number, Value};
use std::borrow::Cow;

/// Look up a chain of property names starting at `value`
///
/// The walk short-circuits to `Null` as soon as the current value is `Null`
/// or a segment is missing.
pub fn lookup<S: AsRef<str>>(segments: &[S], value: &Value) -> Value {
    walk(segments, value).into_owned()
}

/// Look up `segments`, then select the floating `item` of the result
///
/// Only the selected item is copied, not the collection holding it.
pub fn lookup_item<S: AsRef<str>>(segments: &[S], value: &Value, item: usize) -> Value {
    index_item(&walk(segments, value), item)
}

fn walk<'a, S: AsRef<str>>(segments: &[S], value: &'a Value) -> Cow<'a, Value> {
    let mut current = value;
    for (position, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        if current.is_null() {
            return Cow::Owned(Value::Null);
        }
        if let Some(length) = length_of(current, segment) {
            // Numbers carry no properties
            return Cow::Owned(if position + 1 == segments.len() {
                length
            } else {
                Value::Null
            });
        }
        match member(current, segment) {
            Some(next) => current = next,
            None => return Cow::Owned(Value::Null),
        }
    }
    Cow::Borrowed(current)
}

/// Read a single named member of an object or a decimal index of an array
pub fn member<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(name),
        Value::Array(items) => name.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn length_of(value: &Value, name: &str) -> Option<Value> {
    if name != "length" {
        return None;
    }
    match value {
        Value::Array(items) => Some(Value::from(items.len())),
        Value::String(text) => Some(Value::from(text.chars().count())),
        _ => None,
    }
}

/// Index `value` with a computed key, as `value[key]`
pub fn index_value(value: &Value, key: &Value) -> Value {
    match key {
        Value::Null => Value::Null,
        Value::Number(number) => match (value, number.as_u64()) {
            (Value::Array(items), Some(index)) => usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or(Value::Null),
            _ => lookup(&[number.to_string()], value),
        },
        Value::String(name) => lookup(&[name.as_str()], value),
        other => lookup(&[other.to_string()], value),
    }
}

/// Index `value` by a floating iteration index
///
/// Falsy values pass through untouched, everything else is indexed.
pub fn index_item(value: &Value, item: usize) -> Value {
    if !js_truthy(value) {
        return value.clone();
    }
    let selected = match value {
        Value::Array(items) => items.get(item),
        Value::Object(map) => map.get(&item.to_string()),
        _ => None,
    };
    selected.cloned().unwrap_or(Value::Null)
}

/// Truthiness used by conditional blocks
///
/// Based on Handlebars: unlike plain JS, `[]` is falsy and `0` is truthy.
pub fn template_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(_) => true,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Plain JS truthiness, used by operators and bracket indexing
pub fn js_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric view of a value, following JS `Number(value)` coercion for
/// scalars. Arrays and objects have no numeric value.
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Build a JSON number, keeping integral results as integers
///
/// Non-finite results have no JSON representation and become `Null`.
pub fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < 9_007_199_254_740_992.0 {
        return Value::from(number as i64);
    }
    Number::from_f64(number).map_or(Value::Null, Value::Number)
}

/// String form of a value as it would be concatenated in a template
pub fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
