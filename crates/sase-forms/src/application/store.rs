//! Form store
//!
//! Owns the single active schema and publishes every change to subscribers
//! through a `watch` channel. Snapshots are `Arc`s, so readers never block
//! the writer.

use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::aggregates::{FormSchema, Question};
use crate::domain::events::SchemaEvent;
use crate::domain::value_objects::{Direction, QuestionId, QuestionType};
use crate::ports::inbound::SchemaUseCases;

pub struct FormStore {
    tx: watch::Sender<Arc<FormSchema>>,
}

impl FormStore {
    pub fn new(schema: FormSchema) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(schema));
        Self { tx }
    }

    /// Receive a notification after each effective mutation
    pub fn subscribe(&self) -> watch::Receiver<Arc<FormSchema>> {
        self.tx.subscribe()
    }

    /// Apply `f` to the schema. Subscribers are only woken when the aggregate
    /// raised an event.
    fn mutate<R>(&self, f: impl FnOnce(&mut FormSchema) -> R) -> R {
        let mut result = None;
        self.tx.send_if_modified(|current| {
            let schema = Arc::make_mut(current);
            result = Some(f(schema));
            let events = schema.take_events();
            for event in &events {
                log_event(event);
            }
            !events.is_empty()
        });
        match result {
            Some(result) => result,
            None => unreachable!("send_if_modified always runs the closure"),
        }
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new(FormSchema::default())
    }
}

impl SchemaUseCases for FormStore {
    fn schema(&self) -> Arc<FormSchema> {
        self.tx.borrow().clone()
    }

    fn find_question(&self, id: &QuestionId) -> Option<Question> {
        self.tx.borrow().question(id).cloned()
    }

    fn set_schema(&self, schema: FormSchema) {
        self.mutate(|current| current.replace(schema))
    }

    fn add_question(&self, kind: QuestionType) -> Question {
        self.mutate(|schema| schema.add_question(kind).clone())
    }

    fn update_question(&self, question: Question) -> bool {
        self.mutate(|schema| schema.update_question(question))
    }

    fn delete_question(&self, id: &QuestionId) -> bool {
        self.mutate(|schema| schema.delete_question(id))
    }

    fn move_question(&self, id: &QuestionId, direction: Direction) -> bool {
        self.mutate(|schema| schema.move_question(id, direction))
    }

    fn duplicate_question(&self, question: &Question) -> Question {
        self.mutate(|schema| schema.duplicate_question(question).clone())
    }
}

fn log_event(event: &SchemaEvent) {
    match event {
        SchemaEvent::Replaced { schema_id, question_count, .. } => {
            tracing::info!(schema_id = %schema_id, questions = question_count, "schema replaced")
        }
        SchemaEvent::QuestionMoved { question_id, from, to, .. } => {
            tracing::debug!(question_id = %question_id, from, to, "question moved")
        }
        other => tracing::debug!(event = other.name(), "schema changed"),
    }
}
