use std::cmp::Ordering;

use serde_json::Value;

use crate::spec::question::{Condition, Operand, Operator, Scalar};

/// Outcome of evaluating one condition against the referenced answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Met,
    NotMet,
    /// Unknown operator or invalid operand; treated as not met.
    Unsupported,
}

impl Evaluation {
    pub fn is_met(self) -> bool {
        matches!(self, Evaluation::Met)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Evaluation::Met => "met",
            Evaluation::NotMet => "not met",
            Evaluation::Unsupported => "unsupported",
        }
    }
}

impl From<bool> for Evaluation {
    fn from(met: bool) -> Self {
        if met {
            Evaluation::Met
        } else {
            Evaluation::NotMet
        }
    }
}

/// Evaluates `condition` against the referenced answer (`None` when the
/// referenced question has no recorded response).
///
/// Type mismatches never error; they resolve to "not met" for the positive
/// operators. `not-contains` follows the closed-world default and is met
/// whenever `contains` is not applicable, while `not-in` with a non-list
/// operand stays not met. Unknown operators and invalid operands are
/// [`Evaluation::Unsupported`].
pub fn evaluate(condition: &Condition, value: Option<&Value>) -> Evaluation {
    let operand = condition.value.as_ref();
    if let Some(Operand::Invalid(_)) = operand {
        return Evaluation::Unsupported;
    }
    let met = match &condition.operator {
        Operator::Equals => equals(value, operand),
        Operator::NotEquals => !equals(value, operand),
        Operator::Contains => contains(value, operand).unwrap_or(false),
        Operator::NotContains => contains(value, operand).is_none_or(|found| !found),
        Operator::GreaterThan => compare(value, operand, Ordering::is_gt),
        Operator::LessThan => compare(value, operand, Ordering::is_lt),
        Operator::GreaterThanOrEqual => compare(value, operand, Ordering::is_ge),
        Operator::LessThanOrEqual => compare(value, operand, Ordering::is_le),
        Operator::In => membership(value, operand).unwrap_or(false),
        Operator::NotIn => membership(value, operand).is_some_and(|found| !found),
        Operator::IsEmpty => is_empty_value(value),
        Operator::IsNotEmpty => is_not_empty_value(value),
        Operator::Unknown(_) => return Evaluation::Unsupported,
    };
    Evaluation::from(met)
}

/// Absent, `null`, whitespace-only strings and empty arrays count as empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Bool(_) | Value::Number(_) | Value::Object(_)) => false,
    }
}

fn is_not_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        // false and 0 are answers too
        Some(Value::Bool(_) | Value::Number(_) | Value::Object(_)) => true,
    }
}

fn equals(value: Option<&Value>, operand: Option<&Operand>) -> bool {
    match (value, operand) {
        (None, None) => true,
        (Some(value), Some(operand)) => operand.matches(value),
        _ => false,
    }
}

/// `None` when the combination of answer and operand does not support a
/// containment test.
fn contains(value: Option<&Value>, operand: Option<&Operand>) -> Option<bool> {
    match (value?, operand?) {
        (Value::String(text), Operand::Scalar(Scalar::Text(needle))) => {
            Some(text.contains(needle.as_str()))
        }
        (Value::Array(items), operand) => Some(items.iter().any(|item| operand.matches(item))),
        _ => None,
    }
}

fn compare<F>(value: Option<&Value>, operand: Option<&Operand>, predicate: F) -> bool
where
    F: Fn(Ordering) -> bool,
{
    let (Some(Value::Number(actual)), Some(Operand::Scalar(Scalar::Number(expected)))) =
        (value, operand)
    else {
        return false;
    };
    actual
        .as_f64()
        .and_then(|actual| actual.partial_cmp(expected))
        .is_some_and(predicate)
}

/// `None` when the operand is not a list.
fn membership(value: Option<&Value>, operand: Option<&Operand>) -> Option<bool> {
    let Some(Operand::List(items)) = operand else {
        return None;
    };
    Some(value.is_some_and(|value| items.iter().any(|item| item.matches(value))))
}
