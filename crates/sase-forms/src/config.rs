//! Runtime settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::infrastructure::source::DEFAULT_SCHEMA_PATH;
use crate::infrastructure::submission::{DEFAULT_FAILURE_RATE, DEFAULT_SUBMIT_DELAY};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsSettings {
    /// Quiet period before the builder commits an edit
    pub autosave_delay_ms: u64,
    /// Latency of the simulated submission backend
    pub submit_delay_ms: u64,
    /// Probability in [0, 1] that a simulated submission fails
    pub submit_failure_rate: f64,
    /// Schema document path, resolved against `base_url`
    pub schema_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for FormsSettings {
    fn default() -> Self {
        Self {
            autosave_delay_ms: 600,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY.as_millis() as u64,
            submit_failure_rate: DEFAULT_FAILURE_RATE,
            schema_url: DEFAULT_SCHEMA_PATH.to_string(),
            base_url: None,
        }
    }
}

impl FormsSettings {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Full schema URL, or `None` without a base to resolve against
    pub fn schema_location(&self) -> Option<String> {
        if self.schema_url.starts_with("http://") || self.schema_url.starts_with("https://") {
            return Some(self.schema_url.clone());
        }
        self.base_url.as_ref().map(|base| {
            format!("{}/{}", base.trim_end_matches('/'), self.schema_url.trim_start_matches('/'))
        })
    }
}
