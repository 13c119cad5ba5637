use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison applied between a referenced answer and a condition operand.
///
/// Unrecognised operator names deserialize into [`Operator::Unknown`] so a
/// malformed rule never prevents a form from loading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    In,
    NotIn,
    IsEmpty,
    IsNotEmpty,
    Unknown(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not-equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not-contains",
            Operator::GreaterThan => "greater-than",
            Operator::LessThan => "less-than",
            Operator::GreaterThanOrEqual => "greater-than-or-equal",
            Operator::LessThanOrEqual => "less-than-or-equal",
            Operator::In => "in",
            Operator::NotIn => "not-in",
            Operator::IsEmpty => "is-empty",
            Operator::IsNotEmpty => "is-not-empty",
            Operator::Unknown(name) => name,
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => Operator::Equals,
            "not-equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "not-contains" => Operator::NotContains,
            "greater-than" => Operator::GreaterThan,
            "less-than" => Operator::LessThan,
            "greater-than-or-equal" => Operator::GreaterThanOrEqual,
            "less-than-or-equal" => Operator::LessThanOrEqual,
            "in" => Operator::In,
            "not-in" => Operator::NotIn,
            "is-empty" => Operator::IsEmpty,
            "is-not-empty" => Operator::IsNotEmpty,
            _ => Operator::Unknown(name),
        }
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effect a condition has on the derived state of the question that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Show,
    Hide,
    Require,
    Disable,
    Enable,
    Unknown(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Show => "show",
            Action::Hide => "hide",
            Action::Require => "require",
            Action::Disable => "disable",
            Action::Enable => "enable",
            Action::Unknown(name) => name,
        }
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        match name.as_str() {
            "show" => Action::Show,
            "hide" => Action::Hide,
            "require" => Action::Require,
            "disable" => Action::Disable,
            "enable" => Action::Enable,
            _ => Action::Unknown(name),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single operand value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Strict-typed comparison against an answer value.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Scalar::Bool(expected), Value::Bool(actual)) => expected == actual,
            (Scalar::Number(expected), Value::Number(actual)) => actual.as_f64() == Some(*expected),
            (Scalar::Text(expected), Value::String(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Number(value) => write!(f, "{value}"),
            Scalar::Text(value) => write!(f, "{value:?}"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(f64::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

/// Operand of a condition: a scalar, or a list of scalars for `in`/`not-in`.
///
/// Any other JSON shape (objects, lists holding `null` or nested values)
/// lands in [`Operand::Invalid`]; such conditions are never met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Operand {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Invalid(Value),
}

impl Operand {
    /// Structural equality against an answer value. Lists match arrays of the
    /// same length whose elements match pairwise.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Operand::Scalar(scalar), value) => scalar.matches(value),
            (Operand::List(expected), Value::Array(actual)) => {
                expected.len() == actual.len()
                    && expected
                        .iter()
                        .zip(actual)
                        .all(|(scalar, item)| scalar.matches(item))
            }
            (Operand::List(_), _) | (Operand::Invalid(_), _) => false,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(scalar) => scalar.fmt(f),
            Operand::List(items) => {
                f.write_str("[")?;
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_str("]")
            }
            Operand::Invalid(value) => write!(f, "{value}"),
        }
    }
}

impl From<Scalar> for Operand {
    fn from(value: Scalar) -> Self {
        Operand::Scalar(value)
    }
}

impl From<bool> for Operand {
    fn from(value: bool) -> Self {
        Operand::Scalar(value.into())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value.into())
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Scalar(value.into())
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Scalar(value.into())
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Scalar(value.into())
    }
}

impl From<String> for Operand {
    fn from(value: String) -> Self {
        Operand::Scalar(value.into())
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for Operand {
    fn from(values: Vec<T>) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

/// Rule tying a question's derived state to another question's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(alias = "question_id")]
    pub question_id: String,
    #[schemars(with = "String")]
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Operand>,
    #[schemars(with = "String")]
    pub action: Action,
}

impl Condition {
    pub fn new(question_id: impl Into<String>, operator: Operator, action: Action) -> Self {
        Self {
            question_id: question_id.into(),
            operator,
            value: None,
            action,
        }
    }

    pub fn with_value(mut self, value: impl Into<Operand>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Definition of a single question as seen by the condition engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl QuestionSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            required: false,
            conditions: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Text shown for this question in evaluation paths.
    pub fn display_text(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}
