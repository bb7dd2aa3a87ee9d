//! Question editor
//!
//! Builder view model for one question. Field edits land in a local copy and
//! are committed to the store after a quiet period; every edit restarts the
//! timer. Dropping the editor cancels a pending commit.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::domain::aggregates::{FieldEdit, Question};
use crate::domain::value_objects::{Direction, QuestionId, QuestionType, SelectOption};
use crate::ports::inbound::SchemaUseCases;
use crate::ports::outbound::{Notification, Notifier};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(600);
const AUTOSAVE_NOTICE: Duration = Duration::from_millis(2000);

pub struct QuestionEditor {
    local: Question,
    store: Arc<dyn SchemaUseCases>,
    notifier: Arc<dyn Notifier>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    show_instructions: bool,
}

impl QuestionEditor {
    /// Open an editor over the store's current version of `id`
    pub fn open(
        store: Arc<dyn SchemaUseCases>,
        notifier: Arc<dyn Notifier>,
        id: &QuestionId,
        delay: Duration,
    ) -> Option<Self> {
        let local = store.find_question(id)?;
        let show_instructions = local.instructions.is_some();
        Some(Self {
            local,
            store,
            notifier,
            delay,
            pending: None,
            show_instructions,
        })
    }

    pub fn question(&self) -> &Question {
        &self.local
    }

    pub fn has_pending_commit(&self) -> bool {
        self.pending.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }

    /// Apply an edit locally and reschedule the commit. Must be called from
    /// within a tokio runtime.
    pub fn apply(&mut self, edit: FieldEdit) -> bool {
        if matches!(edit, FieldEdit::Instructions(_)) {
            self.show_instructions = true;
        }
        let applied = self.local.apply(edit);
        if applied {
            self.schedule_commit();
        }
        applied
    }

    /// Reveal the instructions input without editing it
    pub fn reveal_instructions(&mut self) {
        self.show_instructions = true;
    }

    /// Commit immediately instead of waiting for the quiet period
    pub fn flush(&mut self) -> bool {
        self.cancel_pending();
        commit(self.store.as_ref(), self.notifier.as_ref(), &self.local)
    }

    // Structural actions go straight to the store.

    pub fn move_up(&self) -> bool {
        self.store.move_question(&self.local.id, Direction::Up)
    }

    pub fn move_down(&self) -> bool {
        self.store.move_question(&self.local.id, Direction::Down)
    }

    /// Duplicate the stored version, not the unsaved local copy
    pub fn duplicate(&self) -> Option<Question> {
        let stored = self.store.find_question(&self.local.id)?;
        Some(self.store.duplicate_question(&stored))
    }

    pub fn delete(mut self) -> bool {
        self.cancel_pending();
        self.store.delete_question(&self.local.id)
    }

    /// Editing surface for the current local state
    pub fn view(&self) -> EditorView {
        let q = &self.local;
        let heading = if q.title.is_empty() {
            q.kind.heading().unwrap_or("Question Title").to_string()
        } else {
            q.title.clone()
        };

        EditorView {
            id: q.id.clone(),
            kind: q.kind,
            heading,
            title: q.title.clone(),
            instructions: self
                .show_instructions
                .then(|| q.instructions.clone().unwrap_or_default()),
            section: EditorSection::for_question(q),
            custom_pattern: q.kind.has_canonical_pattern().then(|| {
                q.validation
                    .as_ref()
                    .and_then(|r| r.regex.clone())
                    .unwrap_or_default()
            }),
            required: q.required,
            hidden: q.hidden,
        }
    }

    fn schedule_commit(&mut self) {
        self.cancel_pending();

        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        let snapshot = self.local.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            commit(store.as_ref(), notifier.as_ref(), &snapshot);
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for QuestionEditor {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Write `local` to the store if it differs from the stored version
fn commit(store: &dyn SchemaUseCases, notifier: &dyn Notifier, local: &Question) -> bool {
    match store.find_question(&local.id) {
        Some(stored) if stored == *local => false,
        Some(_) => {
            store.update_question(local.clone());
            tracing::debug!(question_id = %local.id, "auto-saved question");
            notifier.notify(
                Notification::info("Auto Saving...", "Changes saved automatically")
                    .lasting(AUTOSAVE_NOTICE),
            );
            true
        }
        // Deleted while the commit was pending.
        None => false,
    }
}

/// Builder surface of one question
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub id: QuestionId,
    pub kind: QuestionType,
    pub heading: String,
    pub title: String,
    /// `None` while the instructions input is collapsed
    pub instructions: Option<String>,
    pub section: EditorSection,
    /// Only for types with a canonical pattern
    pub custom_pattern: Option<String>,
    pub required: bool,
    pub hidden: bool,
}

/// Type-specific part of the editor
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "camelCase")]
pub enum EditorSection {
    None,
    NumberBounds {
        min: Option<f64>,
        max: Option<f64>,
    },
    Choices {
        #[serde(rename = "isMulti")]
        is_multi: bool,
        options: Vec<SelectOption>,
    },
}

impl EditorSection {
    pub fn for_question(question: &Question) -> Self {
        match question.kind {
            QuestionType::Number => {
                let rules = question.validation.as_ref();
                Self::NumberBounds {
                    min: rules.and_then(|r| r.min),
                    max: rules.and_then(|r| r.max),
                }
            }
            QuestionType::Select => {
                let opts = question.select_options.clone().unwrap_or_default();
                Self::Choices {
                    is_multi: opts.is_multi,
                    options: opts.options,
                }
            }
            QuestionType::Text
            | QuestionType::Paragraph
            | QuestionType::Phone
            | QuestionType::Email
            | QuestionType::Url
            | QuestionType::Range => Self::None,
        }
    }
}
