//! Domain services
//!
//! Stateless logic derived from the question list.

pub mod defaults;
pub mod validation;

pub use defaults::{initial_answer, initial_answers, type_default};
pub use validation::{
    fingerprint, Answers, FieldError, FieldRule, FieldValidator, ValidationErrors, ValidationSchema,
};
