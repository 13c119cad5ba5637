use serde_json::Value;

use crate::engine::ConditionEngine;
use crate::spec::form::FormSpec;

pub type VisibilityMap = std::collections::BTreeMap<String, bool>;

/// One-shot visibility map for a form and a plain answers object.
pub fn resolve_visibility(spec: &FormSpec, answers: &Value) -> VisibilityMap {
    ConditionEngine::from_form(spec, answers)
        .states()
        .into_iter()
        .map(|(id, state)| (id, state.visible))
        .collect()
}
