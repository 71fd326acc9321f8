//! Datetime operators.
//!
//! Operands are ISO-8601 strings; anything unparsable or absent makes the
//! predicate false instead of raising an error. "Now" is injected by the
//! evaluation context, never read from the system clock here.

use crate::error::EvaluationError;
use crate::value::Value;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};

pub fn same_day(inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let result = match (date_operand(inputs, 0), date_operand(inputs, 1)) {
        (Some(a), Some(b)) => a.date_naive() == b.date_naive(),
        _ => false,
    };
    Ok(Value::Bool(result))
}

pub fn same_month(inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let result = match (date_operand(inputs, 0), date_operand(inputs, 1)) {
        (Some(a), Some(b)) => a.year() == b.year() && a.month() == b.month(),
        _ => false,
    };
    Ok(Value::Bool(result))
}

pub fn weekday_is(inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let result = match date_operand(inputs, 0) {
        Some(date) => {
            let weekday = date.weekday().number_from_monday();
            match inputs.get(1).copied() {
                Some(Value::Number(n)) => *n == weekday as f64,
                Some(Value::Text(name)) => name
                    .parse::<Weekday>()
                    .is_ok_and(|expected| expected.number_from_monday() == weekday),
                _ => false,
            }
        }
        None => false,
    };
    Ok(Value::Bool(result))
}

pub fn month_is(inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let result = match date_operand(inputs, 0) {
        Some(date) => {
            let month = date.month();
            match inputs.get(1).copied() {
                Some(Value::Number(n)) => *n == month as f64,
                Some(Value::Text(name)) => month_number(name) == Some(month),
                _ => false,
            }
        }
        None => false,
    };
    Ok(Value::Bool(result))
}

pub fn age_greater_than(inputs: &[&Value], now: DateTime<Utc>) -> Result<Value, EvaluationError> {
    let result = match (date_operand(inputs, 0), number_operand(inputs, 1)) {
        (Some(date), Some(years)) => now
            .date_naive()
            .years_since(date.date_naive())
            .is_some_and(|age| f64::from(age) > years),
        _ => false,
    };
    Ok(Value::Bool(result))
}

pub fn within_last(inputs: &[&Value], now: DateTime<Utc>) -> Result<Value, EvaluationError> {
    let result = match (date_operand(inputs, 0), number_operand(inputs, 1)) {
        (Some(date), Some(millis)) => {
            let elapsed = now.signed_duration_since(date);
            elapsed >= Duration::zero() && elapsed <= Duration::milliseconds(millis as i64)
        }
        _ => false,
    };
    Ok(Value::Bool(result))
}

pub fn within_next(inputs: &[&Value], now: DateTime<Utc>) -> Result<Value, EvaluationError> {
    let result = match (date_operand(inputs, 0), number_operand(inputs, 1)) {
        (Some(date), Some(millis)) => {
            let until = date.signed_duration_since(now);
            until >= Duration::zero() && until <= Duration::milliseconds(millis as i64)
        }
        _ => false,
    };
    Ok(Value::Bool(result))
}

pub fn between_dates(inputs: &[&Value]) -> Result<Value, EvaluationError> {
    let result = match (
        date_operand(inputs, 0),
        date_operand(inputs, 1),
        date_operand(inputs, 2),
    ) {
        (Some(date), Some(low), Some(high)) => low <= date && date <= high,
        _ => false,
    };
    Ok(Value::Bool(result))
}

/// Parses an ISO-8601 value: RFC 3339 with time and offset, or a plain
/// `YYYY-MM-DD` date taken as midnight UTC.
pub(crate) fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

// --- Validation-time domain checks ---

pub(super) fn check_weekday_constant(value: &Value) -> Result<(), String> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && (1.0..=7.0).contains(n) => Ok(()),
        Value::Text(name) if name.parse::<Weekday>().is_ok() => Ok(()),
        other => Err(format!(
            "expected a weekday name or a number from 1 to 7, got '{}'",
            other
        )),
    }
}

pub(super) fn check_month_constant(value: &Value) -> Result<(), String> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && (1.0..=12.0).contains(n) => Ok(()),
        Value::Text(name) if month_number(name).is_some() => Ok(()),
        other => Err(format!(
            "expected a month name or a number from 1 to 12, got '{}'",
            other
        )),
    }
}

pub(super) fn check_date_constant(value: &Value) -> Result<(), String> {
    match value {
        Value::Text(text) if parse_date(text).is_some() => Ok(()),
        other => Err(format!("expected an ISO-8601 date string, got '{}'", other)),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(month)
}

fn date_operand(inputs: &[&Value], index: usize) -> Option<DateTime<Utc>> {
    match inputs.get(index).copied() {
        Some(Value::Text(text)) => parse_date(text),
        _ => None,
    }
}

fn number_operand(inputs: &[&Value], index: usize) -> Option<f64> {
    inputs.get(index).and_then(|value| value.as_number())
}
