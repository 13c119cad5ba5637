use thiserror::Error;

/// Anomalies found in a form definition. None of them are fatal: the engine
/// degrades to a safe default and records the diagnostic instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("question `{question_id}` uses unknown operator `{operator}`; condition treated as not met")]
    UnknownOperator {
        question_id: String,
        operator: String,
    },
    #[error("question `{question_id}` compares `{referenced}` against unsupported operand `{operand}`; condition treated as not met")]
    InvalidOperand {
        question_id: String,
        referenced: String,
        operand: String,
    },
    #[error("question `{question_id}` uses unknown action `{action}`; condition has no effect")]
    UnknownAction { question_id: String, action: String },
    #[error("question `{question_id}` references missing question `{referenced}`; its value is treated as absent")]
    MissingReference {
        question_id: String,
        referenced: String,
    },
    #[error("question `{id}` is defined more than once; the last definition is used")]
    DuplicateQuestion { id: String },
    #[error("question `{id}` depends on its own answer through a condition cycle")]
    DependencyCycle { id: String },
}
