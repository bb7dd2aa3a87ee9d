//! OpenSASE Form Builder
//!
//! Self-hosted form builder: author a form as an ordered list of typed
//! questions, then render it, validate answers and submit them.
//!
//! ## Architecture
//!
//! - **Domain Layer**: question model, schema aggregate, domain events,
//!   validation-schema derivation
//! - **Application Layer**: schema store, builder and renderer view models
//! - **Ports Layer**: store use cases, schema source, submission backend,
//!   notifications
//! - **Infrastructure Layer**: HTTP/file sources, simulated backend, notifiers
//!
//! ## Features
//!
//! - Eight question types with canonical phone/email/url patterns
//! - Debounced auto-save of builder edits
//! - Validation derived from the live schema, memoized by content hash
//! - Domain events on every effective schema change

use thiserror::Error;

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;
pub mod config;

// Re-exports for convenience
pub use domain::aggregates::{FieldEdit, FormSchema, Question, DEFAULT_SCHEMA_ID};
pub use domain::value_objects::{
    Direction, QuestionId, QuestionType, QuestionValue, SelectOption, SelectOptions, ValidationRules,
};
pub use domain::events::SchemaEvent;
pub use domain::services::{Answers, FieldError, ValidationErrors, ValidationSchema};
pub use application::{FormRenderer, FormStore, QuestionEditor, SchemaLoadService};
pub use ports::inbound::SchemaUseCases;
pub use ports::outbound::{
    Notification, NotificationLevel, Notifier, SchemaSource, SourceError, SubmissionError,
    SubmissionGateway, SubmissionReceipt,
};
pub use config::FormsSettings;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FormsError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("form has invalid fields: {0}")]
    Validation(#[from] ValidationErrors),
}

pub type Result<T> = std::result::Result<T, FormsError>;
