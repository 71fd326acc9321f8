//! Text operators.
//!
//! An absent subject (`Null`) makes the predicate false, matching the
//! datetime operators. A present subject of the wrong type is still a fatal
//! type mismatch. The length operators also accept arrays.

use super::{type_mismatch, Operator};
use crate::error::EvaluationError;
use crate::value::Value;

pub fn contains(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    text_predicate(op, inputs, |subject, needle| subject.contains(needle))
}

pub fn starts_with(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    text_predicate(op, inputs, |subject, needle| subject.starts_with(needle))
}

pub fn ends_with(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    text_predicate(op, inputs, |subject, needle| subject.ends_with(needle))
}

pub fn regex_match(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let pattern = needle(op, inputs)?;
    let regex = regex::Regex::new(pattern).map_err(|e| EvaluationError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    match subject(op, inputs)? {
        Some(text) => Ok(Value::Bool(regex.is_match(text))),
        None => Ok(Value::Bool(false)),
    }
}

pub fn length_compare(
    op: &Operator,
    inputs: &[&Value],
    compare: impl Fn(usize, usize) -> bool,
) -> Result<Value, EvaluationError> {
    let expected = bound(op, inputs, 1)?;
    match length(op, inputs)? {
        Some(len) => Ok(Value::Bool(compare(len, expected))),
        None => Ok(Value::Bool(false)),
    }
}

pub fn length_between(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let low = bound(op, inputs, 1)?;
    let high = bound(op, inputs, 2)?;
    match length(op, inputs)? {
        Some(len) => Ok(Value::Bool(low <= len && len <= high)),
        None => Ok(Value::Bool(false)),
    }
}

fn text_predicate(
    op: &Operator,
    inputs: &[&Value],
    predicate: impl Fn(&str, &str) -> bool,
) -> Result<Value, EvaluationError> {
    let needle = needle(op, inputs)?;
    match subject(op, inputs)? {
        Some(text) => Ok(Value::Bool(predicate(text, needle))),
        None => Ok(Value::Bool(false)),
    }
}

/// First input: the value under test. `Null` is reported as `None`.
fn subject<'a>(op: &Operator, inputs: &[&'a Value]) -> Result<Option<&'a str>, EvaluationError> {
    match inputs.first().copied() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(text)) => Ok(Some(text)),
        Some(other) => Err(type_mismatch(op, "string", other)),
    }
}

/// Second input: the constant needle or pattern.
fn needle<'a>(op: &Operator, inputs: &[&'a Value]) -> Result<&'a str, EvaluationError> {
    match inputs.get(1).copied() {
        Some(Value::Text(text)) => Ok(text),
        Some(other) => Err(type_mismatch(op, "string", other)),
        None => Err(super::null_operand(op)),
    }
}

/// Character count for text, element count for arrays.
fn length(op: &Operator, inputs: &[&Value]) -> Result<Option<usize>, EvaluationError> {
    match inputs.first().copied() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Text(text)) => Ok(Some(text.chars().count())),
        Some(Value::Array(items)) => Ok(Some(items.len())),
        Some(other) => Err(type_mismatch(op, "string or array", other)),
    }
}

fn bound(op: &Operator, inputs: &[&Value], index: usize) -> Result<usize, EvaluationError> {
    match inputs.get(index).copied() {
        Some(Value::Number(n)) => Ok(*n as usize),
        Some(other) => Err(type_mismatch(op, "number", other)),
        None => Err(super::null_operand(op)),
    }
}
