use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recorded answer for one question. The value is opaque to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Response {
    #[serde(default)]
    pub value: Value,
}

impl Response {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Responses keyed by question id.
pub type ResponseMap = BTreeMap<String, Response>;

/// Converts a plain answers object (`{ "<question id>": <value> }`) into a
/// [`ResponseMap`]. Anything other than an object yields an empty map.
pub fn responses_from_answers(answers: &Value) -> ResponseMap {
    answers
        .as_object()
        .map(|object| {
            object
                .iter()
                .map(|(id, value)| (id.clone(), Response::new(value.clone())))
                .collect()
        })
        .unwrap_or_default()
}
