//! Aggregates module

pub mod question;
pub mod schema;

pub use question::{FieldEdit, Question};
pub use schema::{FormSchema, DEFAULT_SCHEMA_ID};
