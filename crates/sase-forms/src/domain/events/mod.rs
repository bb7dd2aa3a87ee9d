//! Schema events
//!
//! Raised by the `FormSchema` aggregate for every mutation that changed state.
//! No-op mutations (unknown id, out-of-bounds move) raise nothing.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{Direction, QuestionId, QuestionType};

#[derive(Clone, Debug, PartialEq)]
pub enum SchemaEvent {
    Replaced {
        schema_id: String,
        question_count: usize,
        at: DateTime<Utc>,
    },
    QuestionAdded {
        question_id: QuestionId,
        kind: QuestionType,
        at: DateTime<Utc>,
    },
    QuestionUpdated {
        question_id: QuestionId,
        at: DateTime<Utc>,
    },
    QuestionDeleted {
        question_id: QuestionId,
        at: DateTime<Utc>,
    },
    QuestionMoved {
        question_id: QuestionId,
        direction: Direction,
        from: usize,
        to: usize,
        at: DateTime<Utc>,
    },
    QuestionDuplicated {
        source_id: QuestionId,
        question_id: QuestionId,
        at: DateTime<Utc>,
    },
}

impl SchemaEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Replaced { .. } => "schema.replaced",
            Self::QuestionAdded { .. } => "question.added",
            Self::QuestionUpdated { .. } => "question.updated",
            Self::QuestionDeleted { .. } => "question.deleted",
            Self::QuestionMoved { .. } => "question.moved",
            Self::QuestionDuplicated { .. } => "question.duplicated",
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Replaced { at, .. }
            | Self::QuestionAdded { at, .. }
            | Self::QuestionUpdated { at, .. }
            | Self::QuestionDeleted { at, .. }
            | Self::QuestionMoved { at, .. }
            | Self::QuestionDuplicated { at, .. } => *at,
        }
    }
}
