//! Outbound ports
//!
//! Collaborators the builder and renderer depend on: where schemas come from,
//! where answers go, and how the user is told about outcomes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::domain::aggregates::FormSchema;
use crate::domain::services::Answers;

/// Schema source port
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch and decode a schema document
    async fn fetch(&self) -> Result<FormSchema, SourceError>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}

/// Submission backend port
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, form_id: &str, answers: &Answers) -> Result<SubmissionReceipt, SubmissionError>;
}

/// User-visible notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: String,
    pub form_id: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient message shown to the user
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    /// Display hint; `None` leaves it to the surface
    #[serde(skip)]
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::build(NotificationLevel::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::build(NotificationLevel::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::build(NotificationLevel::Error, title, description)
    }

    pub fn lasting(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    fn build(level: NotificationLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
            duration: None,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SourceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("schema could not be parsed: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission backend unavailable")]
    Unavailable,
}
