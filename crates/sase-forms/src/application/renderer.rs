//! Form renderer
//!
//! Renderer view model: turns a schema snapshot into fillable fields, keeps
//! the entered values, validates them with the derived validation schema and
//! hands valid answers to the submission backend.

use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::aggregates::{FormSchema, Question};
use crate::domain::services::{
    fingerprint, initial_answer, initial_answers, Answers, ValidationErrors, ValidationSchema,
};
use crate::domain::value_objects::{QuestionId, QuestionType, SelectOption};
use crate::ports::outbound::{Notification, Notifier, SubmissionGateway, SubmissionReceipt};
use crate::FormsError;

const SUCCESS_NOTICE: Duration = Duration::from_millis(3000);

/// Shown in place of the form when the schema has no questions
pub const EMPTY_STATE: &str = "No form to render";

/// Single-entry memo of the derived validator, keyed by content fingerprint
#[derive(Default)]
pub struct ValidatorCache {
    entry: Option<(String, Arc<ValidationSchema>)>,
}

impl ValidatorCache {
    pub fn get_or_derive(&mut self, questions: &[Question]) -> Arc<ValidationSchema> {
        let key = fingerprint(questions);
        if let Some((cached_key, schema)) = &self.entry {
            if *cached_key == key {
                return Arc::clone(schema);
            }
        }
        let schema = Arc::new(ValidationSchema::derive(questions));
        self.entry = Some((key, Arc::clone(&schema)));
        schema
    }
}

/// Read side of the renderer's in-flight flag. Clones share state, so a view
/// can poll it while `submit` awaits the backend.
#[derive(Clone, Debug, Default)]
pub struct SubmissionStatus(Arc<AtomicBool>);

impl SubmissionStatus {
    pub fn is_submitting(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn begin(&self) -> InFlight {
        self.0.store(true, Ordering::Release);
        InFlight(Arc::clone(&self.0))
    }
}

/// Clears the flag when dropped, including when the submit future is cancelled
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct FormRenderer {
    schema: Arc<FormSchema>,
    validator: Arc<ValidationSchema>,
    cache: ValidatorCache,
    values: Answers,
    errors: ValidationErrors,
    status: SubmissionStatus,
    gateway: Arc<dyn SubmissionGateway>,
    notifier: Arc<dyn Notifier>,
}

impl FormRenderer {
    pub fn new(
        schema: Arc<FormSchema>,
        gateway: Arc<dyn SubmissionGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mut cache = ValidatorCache::default();
        let validator = cache.get_or_derive(schema.questions());
        let values = initial_answers(schema.questions());
        Self {
            schema,
            validator,
            cache,
            values,
            errors: ValidationErrors::default(),
            status: SubmissionStatus::default(),
            gateway,
            notifier,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Empty-state check: nothing to render
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.status.is_submitting()
    }

    /// Shared handle on the in-flight flag
    pub fn status(&self) -> SubmissionStatus {
        self.status.clone()
    }

    pub fn values(&self) -> &Answers {
        &self.values
    }

    /// Errors from the last validation
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Swap in a newer schema, keeping values of surviving visible fields
    pub fn refresh(&mut self, schema: Arc<FormSchema>) {
        self.validator = self.cache.get_or_derive(schema.questions());
        let mut values = Answers::new();
        for question in schema.visible() {
            let key = question.id.to_string();
            let value = self
                .values
                .remove(&key)
                .unwrap_or_else(|| initial_answer(question));
            values.insert(key, value);
        }
        self.values = values;
        self.schema = schema;
    }

    /// Set the value of a visible field; false for unknown or hidden ids
    pub fn set_value(&mut self, id: &QuestionId, value: Value) -> bool {
        if self.validator.field(id).is_none() {
            return false;
        }
        self.values.insert(id.to_string(), value);
        true
    }

    /// Merge many values at once, ignoring unknown keys
    pub fn fill(&mut self, answers: &Answers) {
        for (key, value) in answers {
            self.set_value(&QuestionId::from(key.as_str()), value.clone());
        }
    }

    /// Back to the initial values
    pub fn reset(&mut self) {
        self.values = initial_answers(self.schema.questions());
        self.errors = ValidationErrors::default();
    }

    /// Validate current values and return the cleaned answers
    pub fn validate(&mut self) -> Result<Answers, ValidationErrors> {
        let result = self.validator.validate(&self.values);
        self.errors = match &result {
            Ok(_) => ValidationErrors::default(),
            Err(errors) => errors.clone(),
        };
        result
    }

    /// Validate and submit. On success the form is reset; on failure the
    /// entered values are kept.
    pub async fn submit(&mut self) -> crate::Result<SubmissionReceipt> {
        let answers = self.validate()?;

        let in_flight = self.status.begin();
        let result = self.gateway.submit(self.schema.id(), &answers).await;
        drop(in_flight);

        match result {
            Ok(receipt) => {
                tracing::info!(form_id = %receipt.form_id, submission_id = %receipt.submission_id, "form submitted");
                self.notifier.notify(
                    Notification::success("Success", "Form submitted successfully")
                        .lasting(SUCCESS_NOTICE),
                );
                self.reset();
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(form_id = %self.schema.id(), error = %e, "form submission failed");
                self.notifier.notify(Notification::error(
                    "Error",
                    "Failed to submit form. Please try again.",
                ));
                Err(FormsError::Submission(e))
            }
        }
    }

    /// Fields to display, in schema order
    pub fn fields(&self) -> Vec<RenderedField> {
        self.schema
            .visible()
            .map(|q| RenderedField {
                id: q.id.clone(),
                label: q.title.clone(),
                instructions: q.instructions.clone().filter(|s| !s.is_empty()),
                required: q.required,
                control: Control::for_question(q),
                value: self.values.get(q.id.as_str()).cloned().unwrap_or(Value::Null),
                error: self.errors.message_for(&q.id).map(str::to_string),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub id: QuestionId,
    pub label: String,
    pub instructions: Option<String>,
    pub required: bool,
    pub control: Control,
    pub value: Value,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Tel,
}

/// Input control of a rendered field
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum Control {
    TextInput {
        kind: InputKind,
        placeholder: Option<String>,
    },
    TextArea {
        placeholder: Option<String>,
    },
    NumberInput,
    Dropdown {
        placeholder: String,
        options: Vec<SelectOption>,
    },
    Checkboxes {
        options: Vec<SelectOption>,
    },
}

impl Control {
    pub fn for_question(question: &Question) -> Self {
        let placeholder = question
            .placeholder
            .clone()
            .or_else(|| question.kind.placeholder().map(str::to_string));
        match question.kind {
            QuestionType::Text | QuestionType::Email | QuestionType::Url => Self::TextInput {
                kind: InputKind::Text,
                placeholder,
            },
            QuestionType::Phone => Self::TextInput {
                kind: InputKind::Tel,
                placeholder,
            },
            QuestionType::Paragraph => Self::TextArea { placeholder },
            QuestionType::Number | QuestionType::Range => Self::NumberInput,
            QuestionType::Select => {
                let options = question
                    .select_options
                    .as_ref()
                    .map(|o| o.options.clone())
                    .unwrap_or_default();
                if question.is_multi_select() {
                    Self::Checkboxes { options }
                } else {
                    Self::Dropdown {
                        placeholder: placeholder.unwrap_or_default(),
                        options,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FieldEdit;
    use crate::infrastructure::notifications::RecordingNotifier;
    use crate::infrastructure::submission::SimulatedSubmissionGateway;
    use crate::ports::outbound::{NotificationLevel, SubmissionError};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use tokio::sync::Notify;

    /// Accepts once released, signalling when a submission arrives
    #[derive(Default)]
    struct GatedGateway {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl SubmissionGateway for GatedGateway {
        async fn submit(&self, form_id: &str, _answers: &Answers) -> Result<SubmissionReceipt, SubmissionError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(SubmissionReceipt {
                submission_id: "sub-1".into(),
                form_id: form_id.into(),
                submitted_at: Utc::now(),
            })
        }
    }

    fn schema_of(questions: Vec<Question>) -> Arc<FormSchema> {
        Arc::new(FormSchema::from_parts("form", questions))
    }

    fn renderer(
        schema: Arc<FormSchema>,
        failure_rate: f64,
    ) -> (FormRenderer, Arc<SimulatedSubmissionGateway>, Arc<RecordingNotifier>) {
        let gateway = Arc::new(SimulatedSubmissionGateway::new(Duration::ZERO, failure_rate));
        let notifier = Arc::new(RecordingNotifier::default());
        let r = FormRenderer::new(schema, gateway.clone(), notifier.clone());
        (r, gateway, notifier)
    }

    fn bounded_number() -> Question {
        let mut q = Question::new(QuestionType::Number);
        q.required = true;
        q.apply(FieldEdit::Min(Some(5.0)));
        q.apply(FieldEdit::Max(Some(10.0)));
        q
    }

    #[test]
    fn test_controls_per_type() {
        let phone = Question::new(QuestionType::Phone);
        assert_eq!(
            Control::for_question(&phone),
            Control::TextInput { kind: InputKind::Tel, placeholder: Some("Enter phone number".into()) }
        );
        let mut multi = Question::new(QuestionType::Select);
        multi.apply(FieldEdit::AddOption("Red".into()));
        multi.apply(FieldEdit::Multi(true));
        assert!(matches!(Control::for_question(&multi), Control::Checkboxes { ref options } if options.len() == 1));
        assert_eq!(Control::for_question(&Question::new(QuestionType::Number)), Control::NumberInput);
    }

    #[test]
    fn test_fields_skip_hidden() {
        let shown = Question::new(QuestionType::Text);
        let mut hidden = Question::new(QuestionType::Text);
        hidden.hidden = true;
        let (r, _, _) = renderer(schema_of(vec![shown.clone(), hidden]), 0.0);

        let fields = r.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, shown.id);
        assert_eq!(r.values().len(), 1);
    }

    #[test]
    fn test_default_number_reports_range_error() {
        let q = bounded_number();
        let (mut r, _, _) = renderer(schema_of(vec![q.clone()]), 0.0);

        let errors = r.validate().unwrap_err();
        assert_eq!(errors.message_for(&q.id), Some("Must be at least 5"));
        assert_eq!(r.fields()[0].error.as_deref(), Some("Must be at least 5"));
    }

    #[test]
    fn test_set_value_rejects_hidden_and_unknown() {
        let mut hidden = Question::new(QuestionType::Text);
        hidden.hidden = true;
        let (mut r, _, _) = renderer(schema_of(vec![hidden.clone()]), 0.0);
        assert!(!r.set_value(&hidden.id, json!("x")));
        assert!(!r.set_value(&QuestionId::from("nope"), json!("x")));
    }

    #[tokio::test]
    async fn test_successful_submit_resets_form() {
        let q = bounded_number();
        let (mut r, gateway, notifier) = renderer(schema_of(vec![q.clone()]), 0.0);

        r.set_value(&q.id, json!(7));
        let receipt = r.submit().await.unwrap();
        assert_eq!(receipt.form_id, "form");
        assert_eq!(gateway.submissions("form")[0][q.id.as_str()], json!(7));
        assert_eq!(r.values()[q.id.as_str()], json!(0));
        assert_eq!(notifier.levels(), vec![NotificationLevel::Success]);
    }

    #[tokio::test]
    async fn test_invalid_submit_never_calls_backend() {
        let q = bounded_number();
        let (mut r, gateway, notifier) = renderer(schema_of(vec![q.clone()]), 0.0);

        r.set_value(&q.id, json!(3));
        let err = r.submit().await.unwrap_err();
        assert!(matches!(err, FormsError::Validation(ref e) if e.message_for(&q.id) == Some("Must be at least 5")));
        assert!(gateway.submissions("form").is_empty());
        assert!(notifier.levels().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_values() {
        let q = bounded_number();
        let (mut r, _, notifier) = renderer(schema_of(vec![q.clone()]), 1.0);

        r.set_value(&q.id, json!(8));
        assert!(matches!(r.submit().await, Err(FormsError::Submission(_))));
        assert_eq!(r.values()[q.id.as_str()], json!(8));
        assert_eq!(notifier.levels(), vec![NotificationLevel::Error]);
        assert!(!r.is_submitting());
    }

    #[tokio::test]
    async fn test_status_is_visible_while_backend_is_pending() {
        let q = bounded_number();
        let gateway = Arc::new(GatedGateway::default());
        let mut r = FormRenderer::new(
            schema_of(vec![q.clone()]),
            gateway.clone(),
            Arc::new(RecordingNotifier::default()),
        );
        let status = r.status();
        assert!(!status.is_submitting());

        r.set_value(&q.id, json!(6));
        let task = tokio::spawn(async move {
            let receipt = r.submit().await;
            (r, receipt)
        });

        gateway.entered.notified().await;
        assert!(status.is_submitting());

        gateway.release.notify_one();
        let (r, receipt) = task.await.unwrap();
        assert_eq!(receipt.unwrap().submission_id, "sub-1");
        assert!(!status.is_submitting());
        assert!(!r.is_submitting());
    }

    #[tokio::test]
    async fn test_cancelled_submit_clears_status() {
        let q = bounded_number();
        let gateway = Arc::new(GatedGateway::default());
        let mut r = FormRenderer::new(
            schema_of(vec![q.clone()]),
            gateway.clone(),
            Arc::new(RecordingNotifier::default()),
        );
        let status = r.status();
        r.set_value(&q.id, json!(6));

        let task = tokio::spawn(async move { r.submit().await.map(|_| ()) });
        gateway.entered.notified().await;
        assert!(status.is_submitting());

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!status.is_submitting());
    }

    #[test]
    fn test_refresh_keeps_surviving_values() {
        let a = Question::new(QuestionType::Text);
        let b = Question::new(QuestionType::Text);
        let (mut r, _, _) = renderer(schema_of(vec![a.clone(), b.clone()]), 0.0);
        r.set_value(&a.id, json!("kept"));
        r.set_value(&b.id, json!("dropped"));

        let c = Question::new(QuestionType::Number);
        let mut b_hidden = b.clone();
        b_hidden.hidden = true;
        r.refresh(schema_of(vec![a.clone(), b_hidden, c.clone()]));

        assert_eq!(r.values()[a.id.as_str()], json!("kept"));
        assert!(!r.values().contains_key(b.id.as_str()));
        assert_eq!(r.values()[c.id.as_str()], json!(0));
    }

    #[test]
    fn test_validator_cache_reuses_identical_snapshot() {
        let questions = vec![Question::new(QuestionType::Email)];
        let mut cache = ValidatorCache::default();
        let first = cache.get_or_derive(&questions);
        let second = cache.get_or_derive(&questions.clone());
        assert!(Arc::ptr_eq(&first, &second));

        let mut changed = questions.clone();
        changed[0].required = true;
        assert!(!Arc::ptr_eq(&first, &cache.get_or_derive(&changed)));
    }
}
