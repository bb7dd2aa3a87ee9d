//! Simulated submission backend
//!
//! Stands in for a real endpoint: waits a fixed latency, then fails with a
//! configurable probability. Accepted answers are kept per form.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rand::Rng;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::services::Answers;
use crate::ports::outbound::{SubmissionError, SubmissionGateway, SubmissionReceipt};

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_FAILURE_RATE: f64 = 0.05;

pub struct SimulatedSubmissionGateway {
    delay: Duration,
    failure_rate: f64,
    accepted: DashMap<String, Vec<Answers>>,
}

impl SimulatedSubmissionGateway {
    pub fn new(delay: Duration, failure_rate: f64) -> Self {
        Self {
            delay,
            failure_rate: if failure_rate.is_nan() { 0.0 } else { failure_rate.clamp(0.0, 1.0) },
            accepted: DashMap::new(),
        }
    }

    /// Answers accepted so far for `form_id`
    pub fn submissions(&self, form_id: &str) -> Vec<Answers> {
        self.accepted
            .get(form_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

impl Default for SimulatedSubmissionGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY, DEFAULT_FAILURE_RATE)
    }
}

#[async_trait]
impl SubmissionGateway for SimulatedSubmissionGateway {
    async fn submit(&self, form_id: &str, answers: &Answers) -> Result<SubmissionReceipt, SubmissionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failed = rand::thread_rng().gen_bool(self.failure_rate);
        if failed {
            return Err(SubmissionError::Unavailable);
        }

        self.accepted
            .entry(form_id.to_string())
            .or_default()
            .push(answers.clone());

        let receipt = SubmissionReceipt {
            submission_id: Uuid::new_v4().to_string(),
            form_id: form_id.to_string(),
            submitted_at: Utc::now(),
        };
        tracing::debug!(form_id, submission_id = %receipt.submission_id, fields = answers.len(), "submission accepted");
        Ok(receipt)
    }
}
