//! Form schema aggregate
//!
//! Ordered list of questions for one form. All mutations are total: an
//! unknown id or an out-of-bounds move leaves the schema untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::question::Question;
use crate::domain::events::SchemaEvent;
use crate::domain::value_objects::{Direction, QuestionId, QuestionType};

pub const DEFAULT_SCHEMA_ID: &str = "form";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormSchema {
    id: String,
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(skip)]
    events: Vec<SchemaEvent>,
}

impl FormSchema {
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_parts(id, Vec::new())
    }

    /// Build from parts without checking invariants (load path)
    pub fn from_parts(id: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            questions,
            events: vec![],
        }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn questions(&self) -> &[Question] { &self.questions }
    pub fn len(&self) -> usize { self.questions.len() }
    pub fn is_empty(&self) -> bool { self.questions.is_empty() }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == id)
    }

    /// Questions that are rendered and validated
    pub fn visible(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| !q.hidden)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the whole schema
    pub fn replace(&mut self, other: FormSchema) {
        self.id = other.id;
        self.questions = other.questions;
        self.raise_event(SchemaEvent::Replaced {
            schema_id: self.id.clone(),
            question_count: self.questions.len(),
            at: Utc::now(),
        });
    }

    /// Append a new question of `kind` with type defaults
    pub fn add_question(&mut self, kind: QuestionType) -> &Question {
        let question = Question::with_id(self.fresh_id(), kind);
        self.raise_event(SchemaEvent::QuestionAdded {
            question_id: question.id.clone(),
            kind,
            at: Utc::now(),
        });
        self.questions.push(question);
        &self.questions[self.questions.len() - 1]
    }

    /// Replace every question with the same id; false if there is none
    pub fn update_question(&mut self, question: Question) -> bool {
        let mut matched = false;
        for slot in self.questions.iter_mut().filter(|q| q.id == question.id) {
            *slot = question.clone();
            matched = true;
        }
        if !matched {
            return false;
        }
        self.raise_event(SchemaEvent::QuestionUpdated {
            question_id: question.id,
            at: Utc::now(),
        });
        true
    }

    pub fn delete_question(&mut self, id: &QuestionId) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| &q.id != id);
        if self.questions.len() == before {
            return false;
        }
        self.raise_event(SchemaEvent::QuestionDeleted {
            question_id: id.clone(),
            at: Utc::now(),
        });
        true
    }

    /// Swap with the adjacent question in `direction`. No wraparound.
    pub fn move_question(&mut self, id: &QuestionId, direction: Direction) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let to = match direction {
            Direction::Up if from > 0 => from - 1,
            Direction::Down if from + 1 < self.questions.len() => from + 1,
            _ => return false,
        };
        self.questions.swap(from, to);
        self.raise_event(SchemaEvent::QuestionMoved {
            question_id: id.clone(),
            direction,
            from,
            to,
            at: Utc::now(),
        });
        true
    }

    /// Append a deep copy of `question` under a fresh id, always at the end
    pub fn duplicate_question(&mut self, question: &Question) -> &Question {
        let mut copy = question.clone();
        copy.id = self.fresh_id();
        self.raise_event(SchemaEvent::QuestionDuplicated {
            source_id: question.id.clone(),
            question_id: copy.id.clone(),
            at: Utc::now(),
        });
        self.questions.push(copy);
        &self.questions[self.questions.len() - 1]
    }

    // =========================================================================
    // Domain Events
    // =========================================================================

    pub fn take_events(&mut self) -> Vec<SchemaEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: SchemaEvent) {
        self.events.push(event);
    }

    fn fresh_id(&self) -> QuestionId {
        loop {
            let id = QuestionId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::new(DEFAULT_SCHEMA_ID)
    }
}

// Pending events are not part of the schema's value.
impl PartialEq for FormSchema {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.questions == other.questions
    }
}
