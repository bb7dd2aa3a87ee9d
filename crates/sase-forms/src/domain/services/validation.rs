//! Validation schema generator
//!
//! Derives one validator per visible question from a snapshot of the question
//! list. The derivation is pure and is redone from scratch for every new
//! snapshot; callers memoize on [`fingerprint`].

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::aggregates::Question;
use crate::domain::value_objects::{QuestionId, QuestionType};

/// Submitted values keyed by question id
pub type Answers = BTreeMap<String, Value>;

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_NOT_A_NUMBER: &str = "Must be a number";
pub const MSG_EXPECTED_STRING: &str = "Expected string";
pub const MSG_EXPECTED_LIST: &str = "Expected a list of options";
pub const MSG_INVALID_INPUT: &str = "Invalid input";
pub const MSG_BROKEN_PATTERN: &str = "Invalid validation pattern";
pub const MSG_SELECT_ONE: &str = "Please select an option";
pub const MSG_SELECT_AT_LEAST_ONE: &str = "At least one option must be selected";

/// Acceptance rule of a single field
#[derive(Clone, Debug)]
pub enum FieldRule {
    /// Any string, empty included
    AnyText,
    NonEmptyText,
    Number { min: Option<f64>, max: Option<f64> },
    Pattern(Regex),
    /// Custom pattern that does not compile
    BrokenPattern(String),
    SingleChoice,
    MultiChoice,
}

impl FieldRule {
    /// Rule for a question. Later steps override earlier ones: a pattern
    /// replaces the numeric rule, and select replaces everything.
    pub fn for_question(question: &Question) -> Self {
        let mut rule = match question.kind {
            QuestionType::Text | QuestionType::Paragraph => Self::NonEmptyText,
            QuestionType::Number | QuestionType::Range => {
                let rules = question.validation.as_ref();
                Self::Number {
                    min: rules.and_then(|r| r.min),
                    max: rules.and_then(|r| r.max),
                }
            }
            _ => Self::AnyText,
        };

        if let Some(pattern) = question.validation.as_ref().and_then(|r| r.active_pattern()) {
            rule = match Regex::new(pattern) {
                Ok(re) => Self::Pattern(re),
                Err(e) => {
                    tracing::warn!(question_id = %question.id, error = %e, "custom pattern does not compile");
                    Self::BrokenPattern(pattern.to_string())
                }
            };
        }

        if question.kind == QuestionType::Select {
            rule = if question.is_multi_select() {
                Self::MultiChoice
            } else {
                Self::SingleChoice
            };
        }

        rule
    }
}

#[derive(Clone, Debug)]
pub struct FieldValidator {
    pub question_id: QuestionId,
    pub required: bool,
    pub rule: FieldRule,
}

impl FieldValidator {
    pub fn for_question(question: &Question) -> Self {
        Self {
            question_id: question.id.clone(),
            required: question.required,
            rule: FieldRule::for_question(question),
        }
    }

    /// Check one submitted value. `Ok(None)` means the field is absent and
    /// allowed to be.
    pub fn check(&self, value: Option<&Value>) -> Result<Option<Value>, String> {
        let value = match value {
            None | Some(Value::Null) if self.required => return Err(MSG_REQUIRED.into()),
            None | Some(Value::Null) => return Ok(None),
            Some(v) => v,
        };

        if !self.required && is_blank(value) {
            return Ok(Some(value.clone()));
        }

        match &self.rule {
            FieldRule::AnyText => expect_str(value).map(|_| Some(value.clone())),
            FieldRule::NonEmptyText => match expect_str(value)? {
                "" => Err(MSG_REQUIRED.into()),
                _ => Ok(Some(value.clone())),
            },
            FieldRule::Number { min, max } => check_number(value, *min, *max).map(Some),
            FieldRule::Pattern(re) => match re.is_match(expect_str(value)?) {
                true => Ok(Some(value.clone())),
                false => Err(MSG_INVALID_INPUT.into()),
            },
            FieldRule::BrokenPattern(_) => Err(MSG_BROKEN_PATTERN.into()),
            FieldRule::SingleChoice => match expect_str(value)? {
                "" => Err(MSG_SELECT_ONE.into()),
                _ => Ok(Some(value.clone())),
            },
            FieldRule::MultiChoice => {
                let items = value.as_array().ok_or(MSG_EXPECTED_LIST)?;
                if !items.iter().all(Value::is_string) {
                    return Err(MSG_EXPECTED_LIST.into());
                }
                if items.is_empty() {
                    return Err(MSG_SELECT_AT_LEAST_ONE.into());
                }
                Ok(Some(value.clone()))
            }
        }
    }
}

/// Validator for a whole form
#[derive(Clone, Debug, Default)]
pub struct ValidationSchema {
    fields: Vec<FieldValidator>,
}

impl ValidationSchema {
    /// Derive from a question list. Hidden questions contribute nothing.
    pub fn derive(questions: &[Question]) -> Self {
        Self {
            fields: questions
                .iter()
                .filter(|q| !q.hidden)
                .map(FieldValidator::for_question)
                .collect(),
        }
    }

    pub fn fields(&self) -> &[FieldValidator] {
        &self.fields
    }

    pub fn field(&self, id: &QuestionId) -> Option<&FieldValidator> {
        self.fields.iter().find(|f| &f.question_id == id)
    }

    /// Validate a full answer map. On success returns only the known fields,
    /// with numbers normalized; unknown keys are stripped.
    pub fn validate(&self, answers: &Answers) -> Result<Answers, ValidationErrors> {
        let mut cleaned = Answers::new();
        let mut errors = Vec::new();

        for field in &self.fields {
            match field.check(answers.get(field.question_id.as_str())) {
                Ok(Some(value)) => {
                    cleaned.insert(field.question_id.to_string(), value);
                }
                Ok(None) => {}
                Err(message) => errors.push(FieldError {
                    question_id: field.question_id.clone(),
                    message,
                }),
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

/// Content hash of a question list, used as the validator cache key
pub fn fingerprint(questions: &[Question]) -> String {
    let bytes = serde_json::to_vec(questions).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub question_id: QuestionId,
    pub message: String,
}

/// Field errors in question order
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn message_for(&self, id: &QuestionId) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| &e.question_id == id)
            .map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::error::Error for ValidationErrors {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.question_id, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value.as_str().ok_or_else(|| MSG_EXPECTED_STRING.to_string())
}

fn check_number(value: &Value, min: Option<f64>, max: Option<f64>) -> Result<Value, String> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return Err(MSG_REQUIRED.into()),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or(MSG_NOT_A_NUMBER)?;

    if let Some(min) = min {
        if n < min {
            return Err(format!("Must be at least {}", min));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Err(format!("Must be at most {}", max));
        }
    }

    Ok(match value {
        Value::Number(_) => value.clone(),
        _ if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Value::from(n as i64),
        _ => Value::from(n),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FieldEdit;
    use serde_json::json;

    fn question(kind: QuestionType, required: bool) -> Question {
        let mut q = Question::new(kind);
        q.required = required;
        q
    }

    fn check(q: &Question, value: Value) -> Result<Option<Value>, String> {
        FieldValidator::for_question(q).check(Some(&value))
    }

    #[test]
    fn test_required_text_rejects_empty() {
        let q = question(QuestionType::Text, true);
        assert_eq!(check(&q, json!("")), Err(MSG_REQUIRED.to_string()));
        assert_eq!(FieldValidator::for_question(&q).check(None), Err(MSG_REQUIRED.to_string()));
        assert!(check(&q, json!("hello")).is_ok());
    }

    #[test]
    fn test_optional_field_accepts_absence_and_blank() {
        for kind in QuestionType::palette() {
            let q = question(*kind, false);
            let v = FieldValidator::for_question(&q);
            assert_eq!(v.check(None), Ok(None), "{}", kind);
            assert!(v.check(Some(&json!(""))).is_ok(), "{}", kind);
        }
        let multi = {
            let mut q = question(QuestionType::Select, false);
            q.apply(FieldEdit::Multi(true));
            q
        };
        assert!(check(&multi, json!([])).is_ok());
    }

    #[test]
    fn test_number_bounds() {
        let mut q = question(QuestionType::Number, true);
        q.apply(FieldEdit::Min(Some(5.0)));
        q.apply(FieldEdit::Max(Some(10.0)));

        assert_eq!(check(&q, json!(7)), Ok(Some(json!(7))));
        assert_eq!(check(&q, json!(3)), Err("Must be at least 5".to_string()));
        assert_eq!(check(&q, json!(11.5)), Err("Must be at most 10".to_string()));
        assert_eq!(check(&q, json!("8")), Ok(Some(json!(8))));
        assert_eq!(check(&q, json!("abc")), Err(MSG_NOT_A_NUMBER.to_string()));
        assert_eq!(check(&q, json!("")), Err(MSG_REQUIRED.to_string()));
    }

    #[test]
    fn test_fractional_bound_message() {
        let mut q = question(QuestionType::Number, false);
        q.apply(FieldEdit::Min(Some(2.5)));
        assert_eq!(check(&q, json!(1)), Err("Must be at least 2.5".to_string()));
    }

    #[test]
    fn test_canonical_email_pattern() {
        let q = question(QuestionType::Email, true);
        assert!(check(&q, json!("ops@opensase.io")).is_ok());
        assert_eq!(check(&q, json!("not-an-email")), Err(MSG_INVALID_INPUT.to_string()));
        assert_eq!(check(&q, json!("")), Err(MSG_INVALID_INPUT.to_string()));
    }

    #[test]
    fn test_pattern_overrides_number_rule() {
        let mut q = question(QuestionType::Number, true);
        q.apply(FieldEdit::Min(Some(100.0)));
        q.apply(FieldEdit::Pattern(Some("^[0-9]{2}$".into())));

        assert!(matches!(FieldRule::for_question(&q), FieldRule::Pattern(_)));
        // Range is ignored once a pattern is present, and numbers are not strings.
        assert!(check(&q, json!("42")).is_ok());
        assert_eq!(check(&q, json!(42)), Err(MSG_EXPECTED_STRING.to_string()));
    }

    #[test]
    fn test_cleared_pattern_falls_back_to_any_text() {
        let mut q = question(QuestionType::Phone, true);
        q.apply(FieldEdit::Pattern(Some(String::new())));
        assert!(matches!(FieldRule::for_question(&q), FieldRule::AnyText));
        assert!(check(&q, json!("")).is_ok());
    }

    #[test]
    fn test_broken_pattern_rejects_input() {
        let mut q = question(QuestionType::Url, true);
        q.apply(FieldEdit::Pattern(Some("([".into())));
        assert_eq!(check(&q, json!("https://x.io")), Err(MSG_BROKEN_PATTERN.to_string()));
    }

    #[test]
    fn test_select_rules() {
        let mut single = question(QuestionType::Select, true);
        single.apply(FieldEdit::AddOption("Red".into()));
        assert_eq!(check(&single, json!("")), Err(MSG_SELECT_ONE.to_string()));
        assert!(check(&single, json!("red")).is_ok());

        let mut multi = single.clone();
        multi.apply(FieldEdit::Multi(true));
        assert_eq!(check(&multi, json!([])), Err(MSG_SELECT_AT_LEAST_ONE.to_string()));
        assert_eq!(check(&multi, json!("red")), Err(MSG_EXPECTED_LIST.to_string()));
        assert!(check(&multi, json!(["red"])).is_ok());
    }

    #[test]
    fn test_hidden_questions_excluded() {
        let mut hidden = question(QuestionType::Text, true);
        hidden.hidden = true;
        let shown = question(QuestionType::Text, false);

        let schema = ValidationSchema::derive(&[hidden.clone(), shown.clone()]);
        assert_eq!(schema.fields().len(), 1);
        assert!(schema.field(&hidden.id).is_none());
        assert!(schema.validate(&Answers::new()).is_ok());
    }

    #[test]
    fn test_validate_strips_unknown_and_orders_errors() {
        let a = question(QuestionType::Text, true);
        let b = question(QuestionType::Number, true);
        let schema = ValidationSchema::derive(&[a.clone(), b.clone()]);

        let mut answers = Answers::new();
        answers.insert("stray".into(), json!("x"));
        let errors = schema.validate(&answers).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].question_id, a.id);
        assert_eq!(errors.message_for(&b.id), Some(MSG_REQUIRED));

        answers.insert(a.id.to_string(), json!("Ada"));
        answers.insert(b.id.to_string(), json!("12"));
        let cleaned = schema.validate(&answers).unwrap();
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[b.id.as_str()], json!(12));
        assert!(!cleaned.contains_key("stray"));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut q = question(QuestionType::Text, false);
        let before = fingerprint(std::slice::from_ref(&q));
        assert_eq!(before, fingerprint(std::slice::from_ref(&q)));
        q.apply(FieldEdit::Title("Name".into()));
        assert_ne!(before, fingerprint(std::slice::from_ref(&q)));
    }
}
