//! Question type
//!
//! Closed set of question kinds. Every per-type behaviour in the crate is a
//! `match` over this enum.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Paragraph,
    Phone,
    Email,
    Url,
    Number,
    /// Numeric subtype without a builder entry
    Range,
    Select,
}

impl QuestionType {
    /// Types offered by the "add question" palette, in display order
    pub fn palette() -> &'static [QuestionType] {
        &[
            Self::Text,
            Self::Paragraph,
            Self::Phone,
            Self::Email,
            Self::Url,
            Self::Number,
            Self::Select,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Paragraph => "paragraph",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Url => "url",
            Self::Number => "number",
            Self::Range => "range",
            Self::Select => "select",
        }
    }

    /// Palette label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Short Text",
            Self::Paragraph => "Long Text",
            Self::Phone => "Phone Number",
            Self::Email => "Email",
            Self::Url => "Website URL",
            Self::Number => "Number",
            Self::Range => "Range",
            Self::Select => "Choice",
        }
    }

    /// Fallback heading shown by the editor when the title is empty
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("Free Text"),
            Self::Paragraph => Some("Descriptive Text"),
            Self::Phone => Some("Phone Number"),
            Self::Email => Some("Email"),
            Self::Url => Some("URL"),
            Self::Number => Some("Number"),
            Self::Select => Some("Select"),
            Self::Range => None,
        }
    }

    /// Placeholder of the rendered input, if the control has one
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Text => Some("Enter short response"),
            Self::Paragraph => Some("Enter detailed response"),
            Self::Phone => Some("Enter phone number"),
            Self::Email => Some("Enter email address"),
            Self::Url => Some("Enter URL"),
            Self::Select => Some("Select an option"),
            Self::Number | Self::Range => None,
        }
    }

    /// Free-form string answers
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Paragraph | Self::Phone | Self::Email | Self::Url
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Range)
    }

    /// Types whose builder exposes a custom pattern input
    pub fn has_canonical_pattern(&self) -> bool {
        matches!(self, Self::Phone | Self::Email | Self::Url)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "paragraph" => Ok(Self::Paragraph),
            "phone" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            "url" => Ok(Self::Url),
            "number" => Ok(Self::Number),
            "range" => Ok(Self::Range),
            "select" => Ok(Self::Select),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&QuestionType::Url).unwrap(), "\"url\"");
        let t: QuestionType = serde_json::from_str("\"select\"").unwrap();
        assert_eq!(t, QuestionType::Select);
    }

    #[test]
    fn test_palette_excludes_range() {
        assert_eq!(QuestionType::palette().len(), 7);
        assert!(!QuestionType::palette().contains(&QuestionType::Range));
    }

    #[test]
    fn test_from_str_round_trip() {
        for t in QuestionType::palette() {
            assert_eq!(t.as_str().parse::<QuestionType>().unwrap(), *t);
        }
        assert!("date".parse::<QuestionType>().is_err());
    }
}
