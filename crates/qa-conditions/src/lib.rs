#![allow(missing_docs)]

pub mod answers;
pub mod diagnostics;
pub mod engine;
pub mod evaluate;
pub mod graph;
pub mod spec;
pub mod state;
pub mod validate;
pub mod visibility;

pub use answers::{Response, ResponseMap, responses_from_answers};
pub use diagnostics::Diagnostic;
pub use engine::{CacheStats, ConditionEngine};
pub use evaluate::{Evaluation, evaluate, is_empty_value};
pub use graph::DependencyGraph;
pub use spec::{
    Action, Condition, FormSpec, Operand, Operator, QuestionSpec, Scalar, SpecError, form_schema,
};
pub use state::QuestionState;
pub use validate::{RequiredReport, check_required};
pub use visibility::{VisibilityMap, resolve_visibility};
