pub mod form;
pub mod question;

pub use form::{FormSpec, SpecError, form_schema};
pub use question::{Action, Condition, Operand, Operator, QuestionSpec, Scalar};
