//! Validation rules attached to a question

use serde::{Deserialize, Serialize};

use super::QuestionType;

pub const PHONE_PATTERN: &str = r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4}$";
pub const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
pub const URL_PATTERN: &str = r"^(http|https)://[^\s/$.?#].[^\s]*$";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl ValidationRules {
    /// Default rules for a freshly typed question. `select` carries none.
    pub fn for_type(kind: QuestionType) -> Option<Self> {
        match kind {
            QuestionType::Text | QuestionType::Paragraph => Some(Self::default()),
            QuestionType::Phone => Some(Self::pattern(PHONE_PATTERN)),
            QuestionType::Email => Some(Self::pattern(EMAIL_PATTERN)),
            QuestionType::Url => Some(Self::pattern(URL_PATTERN)),
            QuestionType::Number | QuestionType::Range => Some(Self {
                min: None,
                max: None,
                regex: None,
            }),
            QuestionType::Select => None,
        }
    }

    pub fn pattern(regex: impl Into<String>) -> Self {
        Self {
            regex: Some(regex.into()),
            ..Self::default()
        }
    }

    /// The regex in effect; an empty string means none
    pub fn active_pattern(&self) -> Option<&str> {
        self.regex.as_deref().filter(|r| !r.is_empty())
    }
}
