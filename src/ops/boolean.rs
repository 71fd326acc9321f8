//! Boolean aggregation operators.
//!
//! `AND`/`OR`/`ONE_OF` treat an input that failed to resolve (a `Null`
//! result) as false or skip it, rather than aborting the pass. The unary
//! operators are strict: a `Null` operand is a fatal evaluation error.

use super::{null_operand, type_mismatch, Operator};
use crate::error::EvaluationError;
use crate::value::Value;

pub fn and(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    for value in inputs {
        match value {
            Value::Null | Value::Bool(false) => return Ok(Value::Bool(false)),
            Value::Bool(true) => {}
            other => return Err(type_mismatch(op, "boolean", other)),
        }
    }
    Ok(Value::Bool(true))
}

pub fn or(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    for value in inputs {
        match value {
            Value::Bool(true) => return Ok(Value::Bool(true)),
            Value::Bool(false) | Value::Null => {}
            other => return Err(type_mismatch(op, "boolean", other)),
        }
    }
    Ok(Value::Bool(false))
}

pub fn one_of(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let mut trues = 0usize;
    for value in inputs {
        match value {
            Value::Bool(true) => trues += 1,
            Value::Bool(false) | Value::Null => {}
            other => return Err(type_mismatch(op, "boolean", other)),
        }
    }
    Ok(Value::Bool(trues == 1))
}

pub fn not(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    match single(op, inputs)? {
        Value::Bool(b) => Ok(Value::Bool(!*b)),
        other => Err(type_mismatch(op, "boolean", other)),
    }
}

pub fn is_true(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    match single(op, inputs)? {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        other => Err(type_mismatch(op, "boolean", other)),
    }
}

pub fn is_false(op: &Operator, inputs: &[&Value]) -> Result<Value, EvaluationError> {
    match single(op, inputs)? {
        Value::Bool(b) => Ok(Value::Bool(!*b)),
        other => Err(type_mismatch(op, "boolean", other)),
    }
}

fn single<'a>(op: &Operator, inputs: &[&'a Value]) -> Result<&'a Value, EvaluationError> {
    match inputs.first().copied() {
        None | Some(Value::Null) => Err(null_operand(op)),
        Some(value) => Ok(value),
    }
}
