//! Inbound ports (Use case traits)
//!
//! Builder operations over the single active schema. Every operation is total;
//! the boolean results only report whether state changed.

use std::sync::Arc;

use crate::domain::aggregates::{FormSchema, Question};
use crate::domain::value_objects::{Direction, QuestionId, QuestionType};

pub trait SchemaUseCases: Send + Sync {
    /// Current schema
    fn schema(&self) -> Arc<FormSchema>;

    /// Current version of one question
    fn find_question(&self, id: &QuestionId) -> Option<Question>;

    /// Replace the schema wholesale, without validation
    fn set_schema(&self, schema: FormSchema);

    /// Append a question of `kind`, returning it
    fn add_question(&self, kind: QuestionType) -> Question;

    /// Replace the question with the same id
    fn update_question(&self, question: Question) -> bool;

    fn delete_question(&self, id: &QuestionId) -> bool;

    /// Swap with the adjacent question
    fn move_question(&self, id: &QuestionId, direction: Direction) -> bool;

    /// Append a copy of `question` under a fresh id, returning the copy
    fn duplicate_question(&self, question: &Question) -> Question;
}
