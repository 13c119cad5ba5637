use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::spec::question::QuestionSpec;

/// Errors raised while loading a form definition.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid form definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question at position {0} has an empty id")]
    EmptyQuestionId(usize),
}

/// Top-level form definition consumed by the condition engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FormSpec {
    pub id: String,
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

impl FormSpec {
    /// Parses a form definition from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SpecError> {
        let spec: FormSpec = serde_json::from_str(text)?;
        spec.check_ids()?;
        Ok(spec)
    }

    /// Parses a form definition from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, SpecError> {
        let spec: FormSpec = serde_json::from_value(value)?;
        spec.check_ids()?;
        Ok(spec)
    }

    pub fn question(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|question| question.id == id)
    }

    fn check_ids(&self) -> Result<(), SpecError> {
        match self
            .questions
            .iter()
            .position(|question| question.id.trim().is_empty())
        {
            Some(position) => Err(SpecError::EmptyQuestionId(position)),
            None => Ok(()),
        }
    }
}

/// JSON Schema describing form definition files.
pub fn form_schema() -> Value {
    schemars::schema_for!(FormSpec).to_value()
}
