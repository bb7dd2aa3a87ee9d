//! CLI Commands

pub mod config;
pub mod form;
pub mod options;
pub mod questions;
pub mod schema;

use anyhow::{anyhow, Context as _};
use colored::Colorize;
use sase_forms::infrastructure::TracingNotifier;
use sase_forms::{
    FieldEdit, FormSchema, FormStore, FormsSettings, Notification, NotificationLevel, Notifier,
    QuestionEditor, QuestionId, SchemaUseCases,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::output::OutputFormat;

const DEFAULT_SCHEMA_FILE: &str = "form.json";

/// Resolved settings shared by every command
pub struct Context {
    pub schema_path: PathBuf,
    pub format: OutputFormat,
    pub settings: FormsSettings,
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    pub fn new(config: Config, schema: Option<PathBuf>, format: Option<OutputFormat>) -> Self {
        let schema_path = schema
            .or_else(|| config.schema_file.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_FILE));
        let format = format
            .or_else(|| config.default_format.as_deref().and_then(|f| f.parse().ok()))
            .unwrap_or_default();
        Self {
            schema_path,
            format,
            settings: config.settings,
            notifier: notifier_for(format),
        }
    }

    /// Store over the schema file
    pub fn open_store(&self) -> anyhow::Result<Arc<FormStore>> {
        let schema = read_schema(&self.schema_path)?;
        Ok(Arc::new(FormStore::new(schema)))
    }

    pub fn save_store(&self, store: &FormStore) -> anyhow::Result<()> {
        write_schema(&self.schema_path, &store.schema())
    }

    /// Apply edits to one question and commit them at once
    pub fn edit_question(
        &self,
        store: &Arc<FormStore>,
        id: &QuestionId,
        edits: Vec<FieldEdit>,
    ) -> anyhow::Result<bool> {
        let mut editor = QuestionEditor::open(
            store.clone(),
            self.notifier.clone(),
            id,
            self.settings.autosave_delay(),
        )
        .ok_or_else(|| anyhow!("No question with id {}", id))?;

        for edit in edits {
            let description = format!("{:?}", edit);
            if !editor.apply(edit) {
                return Err(anyhow!("Edit {} does not apply to question {}", description, id));
            }
        }
        Ok(editor.flush())
    }
}

pub fn read_schema(path: &Path) -> anyhow::Result<FormSchema> {
    let raw = fs::read(path).with_context(|| {
        format!("No schema at {} (run `opensase-forms schema init`)", path.display())
    })?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_schema(path: &Path, schema: &FormSchema) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(schema)?)
        .with_context(|| format!("writing {}", path.display()))
}

/// Colored notices for tables; log events for json and yaml so that
/// machine-readable output never interleaves with them.
fn notifier_for(format: OutputFormat) -> Arc<dyn Notifier> {
    match format {
        OutputFormat::Table => Arc::new(ConsoleNotifier),
        OutputFormat::Json | OutputFormat::Yaml => Arc::new(TracingNotifier),
    }
}

/// Prints notifications to stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, n: Notification) {
        let title = match n.level {
            NotificationLevel::Success => n.title.green().bold(),
            NotificationLevel::Error => n.title.red().bold(),
            NotificationLevel::Info => n.title.blue().bold(),
        };
        eprintln!("{} {}", title, n.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sase_forms::QuestionType;
    use std::sync::Mutex;
    use tracing_subscriber::layer::SubscriberExt;

    /// Collects the level of every log event
    #[derive(Clone, Default)]
    struct Levels(Arc<Mutex<Vec<tracing::Level>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Levels {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    fn logged_levels(ctx: &Context, notification: Notification) -> Vec<tracing::Level> {
        let levels = Levels::default();
        let subscriber = tracing_subscriber::registry().with(levels.clone());
        tracing::subscriber::with_default(subscriber, || ctx.notifier.notify(notification));
        let seen = levels.0.lock().unwrap().clone();
        seen
    }

    fn context(dir: &Path) -> Context {
        Context::new(Config::default(), Some(dir.join("form.json")), None)
    }

    #[test]
    fn test_schema_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        assert!(ctx.open_store().is_err());

        write_schema(&ctx.schema_path, &FormSchema::new("signup")).unwrap();
        let store = ctx.open_store().unwrap();
        store.add_question(QuestionType::Email);
        ctx.save_store(&store).unwrap();

        let reread = read_schema(&ctx.schema_path).unwrap();
        assert_eq!(reread.id(), "signup");
        assert_eq!(reread.len(), 1);
    }

    #[test]
    fn test_context_precedence() {
        let mut config = Config::default();
        config.schema_file = Some("from-config.json".into());
        config.default_format = Some("yaml".into());

        let ctx = Context::new(config, None, None);
        assert_eq!(ctx.schema_path, PathBuf::from("from-config.json"));
        assert_eq!(ctx.format, OutputFormat::Yaml);

        let ctx = Context::new(Config::default(), Some("flag.json".into()), Some(OutputFormat::Json));
        assert_eq!(ctx.schema_path, PathBuf::from("flag.json"));
        assert_eq!(ctx.format, OutputFormat::Json);
    }

    #[test]
    fn test_structured_formats_log_notices() {
        for format in [OutputFormat::Json, OutputFormat::Yaml] {
            let ctx = Context::new(Config::default(), None, Some(format));
            let levels = logged_levels(&ctx, Notification::error("Error", "Failed to load schema."));
            assert_eq!(levels, vec![tracing::Level::WARN]);
        }

        let ctx = Context::new(Config::default(), None, Some(OutputFormat::Table));
        assert!(logged_levels(&ctx, Notification::success("Success", "Form schema loaded successfully.")).is_empty());
    }

    #[tokio::test]
    async fn test_edit_question_commits() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let store = Arc::new(FormStore::default());
        let q = store.add_question(QuestionType::Text);

        let changed = ctx
            .edit_question(&store, &q.id, vec![FieldEdit::Title("Name".into())])
            .unwrap();
        assert!(changed);
        assert_eq!(store.find_question(&q.id).unwrap().title, "Name");

        let err = ctx.edit_question(&store, &q.id, vec![FieldEdit::Multi(true)]);
        assert!(err.is_err());
        assert!(ctx.edit_question(&store, &QuestionId::from("missing"), vec![]).is_err());
    }
}
