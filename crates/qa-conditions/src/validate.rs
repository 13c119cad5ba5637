use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::ConditionEngine;
use crate::spec::form::FormSpec;

/// Outcome of checking a form's answers for missing required questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_required: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_fields: Vec<String>,
}

impl RequiredReport {
    /// Builds the report from the engine's current responses.
    pub fn from_engine(engine: &mut ConditionEngine) -> Self {
        let missing_required = engine.missing_required();
        let unknown_fields = engine.unknown_responses();
        Self {
            valid: missing_required.is_empty() && unknown_fields.is_empty(),
            missing_required,
            unknown_fields,
        }
    }
}

/// Reports visible, enabled questions that the conditions make required but
/// that have no answer, plus answers for ids the form does not define.
pub fn check_required(spec: &FormSpec, answers: &Value) -> RequiredReport {
    RequiredReport::from_engine(&mut ConditionEngine::from_form(spec, answers))
}
