//! Infrastructure layer
//!
//! Concrete adapters for the outbound ports.

pub mod notifications;
pub mod source;
pub mod submission;

pub use notifications::{ChannelNotifier, RecordingNotifier, TracingNotifier};
pub use source::{FileSchemaSource, HttpSchemaSource, DEFAULT_SCHEMA_PATH};
pub use submission::{SimulatedSubmissionGateway, DEFAULT_FAILURE_RATE, DEFAULT_SUBMIT_DELAY};
