use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::Action;

/// Derived state of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct QuestionState {
    pub visible: bool,
    pub required: bool,
    pub disabled: bool,
}

impl QuestionState {
    /// State reported for questions the engine does not know about.
    pub const NEUTRAL: QuestionState = QuestionState {
        visible: true,
        required: false,
        disabled: false,
    };

    pub(crate) fn initial(required: bool) -> Self {
        Self {
            required,
            ..Self::NEUTRAL
        }
    }

    /// Applies one condition outcome. Every action overwrites its field, so
    /// the last condition touching a field decides it.
    pub(crate) fn apply(&mut self, action: &Action, met: bool) {
        match action {
            Action::Show => self.visible = met,
            Action::Hide => self.visible = !met,
            Action::Require => self.required = met,
            Action::Disable => self.disabled = met,
            Action::Enable => self.disabled = !met,
            Action::Unknown(_) => {}
        }
    }
}

impl Default for QuestionState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
