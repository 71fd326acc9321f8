//! The operator catalog.
//!
//! Every operator exposes three things: a static shape check (`validate`),
//! an execution function over already-computed input values (`execute`), and
//! a static output type (`return_type`). Dispatch is an exhaustive match
//! over the closed [`Operator`] enum, so adding an operator without wiring
//! all three is a compile error.

use crate::error::{EvaluationError, ValidationError};
use crate::graph::{Node, NodeIndex};
use crate::value::{Value, ValueType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod boolean;
pub mod collection;
pub mod compare;
pub mod datetime;
pub mod text;

/// The closed set of logic-node operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    // Boolean
    And,
    Or,
    Not,
    OneOf,
    IsTrue,
    IsFalse,

    // Comparison
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Between,
    InSet,
    NotInSet,
    TypeIs,

    // Text
    Contains,
    StartsWith,
    EndsWith,
    RegexMatch,
    LengthEquals,
    LengthGreaterThan,
    LengthLessThan,
    LengthBetween,

    // Collection
    ContainsElement,
    ContainsAny,
    Sum,
    Min,
    Max,
    NotEmpty,

    // Datetime
    SameDay,
    SameMonth,
    WeekdayIs,
    MonthIs,
    AgeGreaterThan,
    WithinLast,
    WithinNext,
    BetweenDates,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::OneOf => "ONE_OF",
            Operator::IsTrue => "IS_TRUE",
            Operator::IsFalse => "IS_FALSE",
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::LessThan => "LESS_THAN",
            Operator::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Operator::Between => "BETWEEN",
            Operator::InSet => "IN_SET",
            Operator::NotInSet => "NOT_IN_SET",
            Operator::TypeIs => "TYPE_IS",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::RegexMatch => "REGEX_MATCH",
            Operator::LengthEquals => "LENGTH_EQ",
            Operator::LengthGreaterThan => "LENGTH_GT",
            Operator::LengthLessThan => "LENGTH_LT",
            Operator::LengthBetween => "LENGTH_BETWEEN",
            Operator::ContainsElement => "CONTAINS_ELEMENT",
            Operator::ContainsAny => "CONTAINS_ANY",
            Operator::Sum => "SUM",
            Operator::Min => "MIN",
            Operator::Max => "MAX",
            Operator::NotEmpty => "NOT_EMPTY",
            Operator::SameDay => "SAME_DAY",
            Operator::SameMonth => "SAME_MONTH",
            Operator::WeekdayIs => "WEEKDAY_IS",
            Operator::MonthIs => "MONTH_IS",
            Operator::AgeGreaterThan => "AGE_GREATER_THAN",
            Operator::WithinLast => "WITHIN_LAST",
            Operator::WithinNext => "WITHIN_NEXT",
            Operator::BetweenDates => "BETWEEN_DATES",
        };
        write!(f, "{}", name)
    }
}

impl Operator {
    /// Static output type, used by the validator for the final-node check.
    pub fn return_type(&self) -> ValueType {
        match self {
            Operator::Sum | Operator::Min | Operator::Max => ValueType::Number,
            _ => ValueType::Bool,
        }
    }

    /// Static shape check: input arity, which inputs must be constants, and
    /// the type/domain of those constants. Never inspects runtime values;
    /// runtime type checks are deferred to [`Operator::execute`].
    pub fn validate(&self, node: &Node, graph: &NodeIndex<'_>) -> Result<(), ValidationError> {
        let check = match self {
            Operator::And | Operator::Or | Operator::OneOf => arity_at_least(node, 2),
            Operator::Not | Operator::IsTrue | Operator::IsFalse => arity(node, 1),

            Operator::Equals
            | Operator::NotEquals
            | Operator::LessThan
            | Operator::LessThanOrEqual
            | Operator::GreaterThan
            | Operator::GreaterThanOrEqual => {
                arity(node, 2).and_then(|()| at_most_one_dynamic(node, graph))
            }
            Operator::Between => arity(node, 3).and_then(|()| {
                let low = constant_number_at(node, graph, 1)?;
                let high = constant_number_at(node, graph, 2)?;
                if low > high {
                    Err(format!("lower bound {} exceeds upper bound {}", low, high))
                } else {
                    Ok(())
                }
            }),
            Operator::InSet | Operator::NotInSet => arity(node, 2)
                .and_then(|()| at_most_one_dynamic(node, graph))
                .and_then(|()| constant_array_at(node, graph, 1).map(|_| ())),
            Operator::TypeIs => arity(node, 2).and_then(|()| {
                let name = constant_text_at(node, graph, 1)?;
                compare::check_type_name(name)
            }),

            Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
                arity(node, 2).and_then(|()| constant_text_at(node, graph, 1).map(|_| ()))
            }
            Operator::RegexMatch => arity(node, 2).and_then(|()| {
                let pattern = constant_text_at(node, graph, 1)?;
                regex::Regex::new(pattern)
                    .map(|_| ())
                    .map_err(|e| format!("invalid regex pattern: {}", e))
            }),
            Operator::LengthEquals | Operator::LengthGreaterThan | Operator::LengthLessThan => {
                arity(node, 2).and_then(|()| non_negative_constant_at(node, graph, 1))
            }
            Operator::LengthBetween => arity(node, 3).and_then(|()| {
                non_negative_constant_at(node, graph, 1)?;
                non_negative_constant_at(node, graph, 2)?;
                let low = constant_number_at(node, graph, 1)?;
                let high = constant_number_at(node, graph, 2)?;
                if low > high {
                    Err(format!("lower bound {} exceeds upper bound {}", low, high))
                } else {
                    Ok(())
                }
            }),

            Operator::ContainsElement => arity(node, 2),
            Operator::ContainsAny => {
                arity(node, 2).and_then(|()| constant_array_at(node, graph, 1).map(|_| ()))
            }
            Operator::Sum | Operator::Min | Operator::Max | Operator::NotEmpty => arity(node, 1),

            Operator::SameDay | Operator::SameMonth => arity(node, 2),
            Operator::WeekdayIs => arity(node, 2).and_then(|()| {
                let value = constant_at(node, graph, 1)?;
                datetime::check_weekday_constant(value)
            }),
            Operator::MonthIs => arity(node, 2).and_then(|()| {
                let value = constant_at(node, graph, 1)?;
                datetime::check_month_constant(value)
            }),
            Operator::AgeGreaterThan | Operator::WithinLast | Operator::WithinNext => {
                arity(node, 2).and_then(|()| non_negative_constant_at(node, graph, 1))
            }
            Operator::BetweenDates => arity(node, 3).and_then(|()| {
                datetime::check_date_constant(constant_at(node, graph, 1)?)?;
                datetime::check_date_constant(constant_at(node, graph, 2)?)
            }),
        };

        check.map_err(|message| ValidationError::OperatorConfig {
            node_id: node.id,
            name: node.name.clone(),
            message,
        })
    }

    /// Executes the operator over its inputs' already-computed results.
    ///
    /// Runtime type checks deferred from [`Operator::validate`] happen here,
    /// because provider-sourced values are unknown until execution.
    pub fn execute(
        &self,
        inputs: &[&Value],
        now: DateTime<Utc>,
    ) -> Result<Value, EvaluationError> {
        match self {
            Operator::And => boolean::and(self, inputs),
            Operator::Or => boolean::or(self, inputs),
            Operator::Not => boolean::not(self, inputs),
            Operator::OneOf => boolean::one_of(self, inputs),
            Operator::IsTrue => boolean::is_true(self, inputs),
            Operator::IsFalse => boolean::is_false(self, inputs),

            Operator::Equals => compare::equals(self, inputs),
            Operator::NotEquals => compare::not_equals(self, inputs),
            Operator::LessThan => compare::ordering(self, inputs, |a, b| a < b),
            Operator::LessThanOrEqual => compare::ordering(self, inputs, |a, b| a <= b),
            Operator::GreaterThan => compare::ordering(self, inputs, |a, b| a > b),
            Operator::GreaterThanOrEqual => compare::ordering(self, inputs, |a, b| a >= b),
            Operator::Between => compare::between(self, inputs),
            Operator::InSet => compare::in_set(self, inputs, false),
            Operator::NotInSet => compare::in_set(self, inputs, true),
            Operator::TypeIs => compare::type_is(self, inputs),

            Operator::Contains => text::contains(self, inputs),
            Operator::StartsWith => text::starts_with(self, inputs),
            Operator::EndsWith => text::ends_with(self, inputs),
            Operator::RegexMatch => text::regex_match(self, inputs),
            Operator::LengthEquals => text::length_compare(self, inputs, |len, n| len == n),
            Operator::LengthGreaterThan => text::length_compare(self, inputs, |len, n| len > n),
            Operator::LengthLessThan => text::length_compare(self, inputs, |len, n| len < n),
            Operator::LengthBetween => text::length_between(self, inputs),

            Operator::ContainsElement => collection::contains_element(self, inputs),
            Operator::ContainsAny => collection::contains_any(self, inputs),
            Operator::Sum => collection::sum(self, inputs),
            Operator::Min => collection::fold_numeric(self, inputs, f64::min),
            Operator::Max => collection::fold_numeric(self, inputs, f64::max),
            Operator::NotEmpty => collection::not_empty(self, inputs),

            Operator::SameDay => datetime::same_day(inputs),
            Operator::SameMonth => datetime::same_month(inputs),
            Operator::WeekdayIs => datetime::weekday_is(inputs),
            Operator::MonthIs => datetime::month_is(inputs),
            Operator::AgeGreaterThan => datetime::age_greater_than(inputs, now),
            Operator::WithinLast => datetime::within_last(inputs, now),
            Operator::WithinNext => datetime::within_next(inputs, now),
            Operator::BetweenDates => datetime::between_dates(inputs),
        }
    }
}

// --- Shape-check helpers shared by the catalog ---

fn arity(node: &Node, expected: usize) -> Result<(), String> {
    if node.inputs.len() != expected {
        Err(format!(
            "requires exactly {} inputs, but has {}",
            expected,
            node.inputs.len()
        ))
    } else {
        Ok(())
    }
}

fn arity_at_least(node: &Node, minimum: usize) -> Result<(), String> {
    if node.inputs.len() < minimum {
        Err(format!(
            "requires at least {} inputs, but has {}",
            minimum,
            node.inputs.len()
        ))
    } else {
        Ok(())
    }
}

/// Comparison-style operators allow at most one non-constant input, so the
/// other side of the comparison is always known at validation time.
fn at_most_one_dynamic(node: &Node, graph: &NodeIndex<'_>) -> Result<(), String> {
    let dynamic = node
        .inputs
        .iter()
        .filter(|input| {
            graph
                .get(input)
                .map(|n| n.constant_value().is_none())
                .unwrap_or(true)
        })
        .count();
    if dynamic > 1 {
        Err(format!(
            "allows at most one non-constant input, but has {}",
            dynamic
        ))
    } else {
        Ok(())
    }
}

fn constant_at<'a>(
    node: &Node,
    graph: &NodeIndex<'a>,
    index: usize,
) -> Result<&'a Value, String> {
    let input_id = node
        .inputs
        .get(index)
        .ok_or_else(|| format!("missing input {}", index))?;
    graph
        .get(input_id)
        .and_then(|n| n.constant_value())
        .ok_or_else(|| format!("input {} must be a constant node", index))
}

fn constant_number_at(node: &Node, graph: &NodeIndex<'_>, index: usize) -> Result<f64, String> {
    constant_at(node, graph, index)?
        .as_number()
        .ok_or_else(|| format!("input {} must be a constant number", index))
}

fn constant_text_at<'a>(
    node: &Node,
    graph: &NodeIndex<'a>,
    index: usize,
) -> Result<&'a str, String> {
    constant_at(node, graph, index)?
        .as_text()
        .ok_or_else(|| format!("input {} must be a constant string", index))
}

fn constant_array_at<'a>(
    node: &Node,
    graph: &NodeIndex<'a>,
    index: usize,
) -> Result<&'a [Value], String> {
    constant_at(node, graph, index)?
        .as_array()
        .ok_or_else(|| format!("input {} must be a constant array", index))
}

fn non_negative_constant_at(
    node: &Node,
    graph: &NodeIndex<'_>,
    index: usize,
) -> Result<(), String> {
    let number = constant_number_at(node, graph, index)?;
    if number < 0.0 {
        Err(format!("input {} must not be negative, got {}", index, number))
    } else {
        Ok(())
    }
}

// --- Runtime helpers shared by the execution modules ---

pub(crate) fn type_mismatch(op: &Operator, expected: &str, found: &Value) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operation: op.to_string(),
        expected: expected.to_string(),
        found: found.clone(),
    }
}

pub(crate) fn null_operand(op: &Operator) -> EvaluationError {
    EvaluationError::NullOperand {
        operation: op.to_string(),
    }
}
