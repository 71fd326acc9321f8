//! Comparison operators.
//!
//! These are strict about missing data: a `Null` operand means an upstream
//! provider failed to resolve, and a comparison against nothing is a fatal
//! evaluation error rather than a silent `false`.

use super::{null_operand, type_mismatch, Operator};
use crate::error::EvaluationError;
use crate::value::Value;
use ahash::AHashSet;

pub fn equals(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let (left, right) = pair(op, inputs)?;
    Ok(Value::Bool(left == right))
}

pub fn not_equals(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let (left, right) = pair(op, inputs)?;
    Ok(Value::Bool(left != right))
}

pub fn ordering(
    op: &Operator,
    inputs: &[&Value],
    compare: impl Fn(f64, f64) -> bool,
) -> Result<Value, EvaluationError> {
    let (left, right) = pair(op, inputs)?;
    let left = number(op, left)?;
    let right = number(op, right)?;
    Ok(Value::Bool(compare(left, right)))
}

pub fn between(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let value = number(op, operand(op, inputs, 0)?)?;
    let low = number(op, operand(op, inputs, 1)?)?;
    let high = number(op, operand(op, inputs, 2)?)?;
    Ok(Value::Bool(low <= value && value <= high))
}

pub fn in_set(op: &Operator, inputs: &[&Value], negate: bool) -> Result<Value, EvaluationError> {
    let (value, set) = pair(op, inputs)?;
    let items = match set {
        Value::Array(items) => items,
        other => return Err(type_mismatch(op, "array", other)),
    };
    let keys: AHashSet<String> = items.iter().map(membership_key).collect();
    let found = keys.contains(&membership_key(value));
    Ok(Value::Bool(found != negate))
}

pub fn type_is(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let value = operand_or_null(inputs, 0);
    let name = match operand(op, inputs, 1)? {
        Value::Text(name) => name,
        other => return Err(type_mismatch(op, "string", other)),
    };
    let matches = match name.as_str() {
        "string" => matches!(value, Value::Text(_)),
        "number" => matches!(value, Value::Number(_)),
        "boolean" => matches!(value, Value::Bool(_)),
        "date" => value
            .as_text()
            .is_some_and(|text| super::datetime::parse_date(text).is_some()),
        "map" => matches!(value, Value::Map(_)),
        // The editor historically offered both names for list-shaped data.
        "stack" | "array" => matches!(value, Value::Array(_)),
        _ => false,
    };
    Ok(Value::Bool(matches))
}

/// Validation-time domain check for the `TYPE_IS` type-name constant.
pub(super) fn check_type_name(name: &str) -> Result<(), String> {
    match name {
        "string" | "number" | "boolean" | "date" | "map" | "stack" | "array" => Ok(()),
        other => Err(format!("unknown type name '{}'", other)),
    }
}

/// Stable membership key: the canonical JSON encoding of the value, so
/// numbers, strings, and nested structures all hash consistently.
fn membership_key(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}

fn pair<'a>(op: &Operator, inputs: &[&'a Value]) -> Result<(&'a Value, &'a Value), EvaluationError> {
    Ok((operand(op, inputs, 0)?, operand(op, inputs, 1)?))
}

fn operand<'a>(
    op: &Operator,
    inputs: &[&'a Value],
    index: usize,
) -> Result<&'a Value, EvaluationError> {
    match inputs.get(index).copied() {
        None | Some(Value::Null) => Err(null_operand(op)),
        Some(value) => Ok(value),
    }
}

static NULL: Value = Value::Null;

fn operand_or_null<'a>(inputs: &[&'a Value], index: usize) -> &'a Value {
    inputs.get(index).copied().unwrap_or(&NULL)
}

fn number(op: &Operator, value: &Value) -> Result<f64, EvaluationError> {
    value
        .as_number()
        .ok_or_else(|| type_mismatch(op, "number", value))
}
