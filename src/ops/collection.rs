//! Array and set operators.
//!
//! Membership tests convert the source collection to a hash set first, so
//! repeated probes stay O(1). The numeric aggregates (`SUM`/`MIN`/`MAX`)
//! produce numbers for downstream comparison nodes rather than booleans.

use super::{type_mismatch, Operator};
use crate::error::EvaluationError;
use crate::value::Value;
use ahash::AHashSet;

pub fn contains_element(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let items = match source(op, inputs)? {
        Some(items) => items,
        None => return Ok(Value::Bool(false)),
    };
    let element = match inputs.get(1).copied() {
        None | Some(Value::Null) => return Ok(Value::Bool(false)),
        Some(value) => value,
    };
    let keys: AHashSet<String> = items.iter().map(membership_key).collect();
    Ok(Value::Bool(keys.contains(&membership_key(element))))
}

pub fn contains_any(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let items = match source(op, inputs)? {
        Some(items) => items,
        None => return Ok(Value::Bool(false)),
    };
    let candidates = match inputs.get(1).copied() {
        Some(Value::Array(candidates)) => candidates,
        Some(Value::Null) | None => return Ok(Value::Bool(false)),
        Some(other) => return Err(type_mismatch(op, "array", other)),
    };
    let keys: AHashSet<String> = items.iter().map(membership_key).collect();
    let any = candidates
        .iter()
        .any(|candidate| keys.contains(&membership_key(candidate)));
    Ok(Value::Bool(any))
}

pub fn sum(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let items = match source(op, inputs)? {
        Some(items) => items,
        None => return Ok(Value::Null),
    };
    let mut total = 0.0;
    for item in items {
        total += item
            .as_number()
            .ok_or_else(|| type_mismatch(op, "number", item))?;
    }
    Ok(Value::Number(total))
}

/// `MIN`/`MAX`: folds the numeric elements. An empty or absent source yields
/// `Null`, which downstream strict operators surface as an error.
pub fn fold_numeric(
    op: &Operator,
    inputs: &[&Value],
    fold: impl Fn(f64, f64) -> f64,
) -> Result<Value, EvaluationError> {
    let items = match source(op, inputs)? {
        Some(items) => items,
        None => return Ok(Value::Null),
    };
    let mut result: Option<f64> = None;
    for item in items {
        let number = item
            .as_number()
            .ok_or_else(|| type_mismatch(op, "number", item))?;
        result = Some(match result {
            Some(current) => fold(current, number),
            None => number,
        });
    }
    Ok(result.map(Value::Number).unwrap_or(Value::Null))
}

pub fn not_empty(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    match source(op, inputs)? {
        Some(items) => Ok(Value::Bool(!items.is_empty())),
        None => Ok(Value::Bool(false)),
    }
}

/// First input: the source collection. `Null` is reported as `None`.
fn source<'a>(op: &Operator, inputs: &[&'a Value]) -> Result<Option<&'a [Value]>, EvaluationError> {
    match inputs.first().copied() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(type_mismatch(op, "array", other)),
    }
}

/// Stable membership key: canonical JSON so nested values hash consistently.
fn membership_key(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}
