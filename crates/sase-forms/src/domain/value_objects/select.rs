//! Choice options of a `select` question

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptions {
    #[serde(default)]
    pub is_multi: bool,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl SelectOptions {
    /// Append an option for the typed label.
    ///
    /// The value is the lowercased label, suffixed `-1`, `-2`, ... until it is
    /// unique within this list. Blank labels are ignored.
    pub fn add_option(&mut self, label: &str) -> Option<&SelectOption> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        let normalized = label.to_lowercase();
        let mut value = normalized.clone();
        let mut index = 1;
        while self.contains(&value) {
            value = format!("{}-{}", normalized, index);
            index += 1;
        }

        self.options.push(SelectOption {
            value,
            label: label.to_string(),
        });
        self.options.last()
    }

    /// Drop every option carrying `value`
    pub fn remove_option(&mut self, value: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|o| o.value != value);
        self.options.len() != before
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}
