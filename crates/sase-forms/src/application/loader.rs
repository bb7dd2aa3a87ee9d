//! Schema loading service

use std::sync::Arc;
use std::time::Duration;

use crate::domain::aggregates::FormSchema;
use crate::ports::inbound::SchemaUseCases;
use crate::ports::outbound::{Notification, Notifier, SchemaSource};

const LOADED_NOTICE: Duration = Duration::from_millis(2000);

/// Fetches a schema document and installs it into the store.
/// A failed load leaves the current schema in place.
pub struct SchemaLoadService {
    source: Arc<dyn SchemaSource>,
    notifier: Arc<dyn Notifier>,
}

impl SchemaLoadService {
    pub fn new(source: Arc<dyn SchemaSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self { source, notifier }
    }

    pub async fn load_into(&self, store: &dyn SchemaUseCases) -> crate::Result<Arc<FormSchema>> {
        match self.source.fetch().await {
            Ok(schema) => {
                tracing::info!(
                    source = %self.source.describe(),
                    schema_id = %schema.id(),
                    questions = schema.len(),
                    "schema loaded"
                );
                store.set_schema(schema);
                self.notifier.notify(
                    Notification::success("Success", "Form schema loaded successfully.")
                        .lasting(LOADED_NOTICE),
                );
                Ok(store.schema())
            }
            Err(e) => {
                tracing::warn!(source = %self.source.describe(), error = %e, "schema load failed");
                self.notifier
                    .notify(Notification::error("Error", "Failed to load schema."));
                Err(e.into())
            }
        }
    }
}
