//! Question entity
//!
//! One field definition of a form. The record is replaced wholesale by the
//! schema on update, so fields are public and the JSON shape mirrors the
//! stored schema documents.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    QuestionId, QuestionType, QuestionValue, SelectOptions, ValidationRules,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<QuestionValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_options: Option<SelectOptions>,
}

impl Question {
    /// Create a question of `kind` with a fresh id and the type's defaults
    pub fn new(kind: QuestionType) -> Self {
        Self::with_id(QuestionId::generate(), kind)
    }

    pub fn with_id(id: QuestionId, kind: QuestionType) -> Self {
        let mut question = Self {
            id,
            title: String::new(),
            kind,
            value: None,
            placeholder: None,
            instructions: None,
            required: false,
            hidden: false,
            validation: None,
            select_options: None,
        };
        question.reset_type_defaults();
        question
    }

    /// Switch type, discarding rules and options of the previous type
    pub fn set_type(&mut self, kind: QuestionType) {
        self.kind = kind;
        self.reset_type_defaults();
    }

    pub fn is_multi_select(&self) -> bool {
        self.kind == QuestionType::Select
            && self.select_options.as_ref().map(|o| o.is_multi).unwrap_or(false)
    }

    /// Apply a single builder edit. Returns false when the edit did not apply
    /// to this question (option edits on a non-select question).
    pub fn apply(&mut self, edit: FieldEdit) -> bool {
        match edit {
            FieldEdit::Title(title) => self.title = title,
            FieldEdit::Instructions(text) => self.instructions = text,
            FieldEdit::Type(kind) => self.set_type(kind),
            FieldEdit::Required(required) => self.required = required,
            FieldEdit::Hidden(hidden) => self.hidden = hidden,
            FieldEdit::Min(min) => self.validation.get_or_insert_with(Default::default).min = min,
            FieldEdit::Max(max) => self.validation.get_or_insert_with(Default::default).max = max,
            FieldEdit::Pattern(regex) => {
                self.validation.get_or_insert_with(Default::default).regex = regex
            }
            FieldEdit::DefaultValue(value) => self.value = value,
            FieldEdit::Multi(is_multi) => match self.choices_mut() {
                Some(opts) => opts.is_multi = is_multi,
                None => return false,
            },
            FieldEdit::AddOption(label) => match self.choices_mut() {
                Some(opts) => return opts.add_option(&label).is_some(),
                None => return false,
            },
            FieldEdit::RemoveOption(value) => match self.choices_mut() {
                Some(opts) => return opts.remove_option(&value),
                None => return false,
            },
        }
        true
    }

    fn choices_mut(&mut self) -> Option<&mut SelectOptions> {
        if self.kind != QuestionType::Select {
            return None;
        }
        self.select_options.as_mut()
    }

    fn reset_type_defaults(&mut self) {
        self.validation = ValidationRules::for_type(self.kind);
        self.select_options = match self.kind {
            QuestionType::Select => Some(SelectOptions::default()),
            _ => None,
        };
    }
}

/// Field-level edit made in the builder
#[derive(Clone, Debug, PartialEq)]
pub enum FieldEdit {
    Title(String),
    Instructions(Option<String>),
    Type(QuestionType),
    Required(bool),
    Hidden(bool),
    Min(Option<f64>),
    Max(Option<f64>),
    Pattern(Option<String>),
    DefaultValue(Option<QuestionValue>),
    Multi(bool),
    AddOption(String),
    RemoveOption(String),
}
