//! Renderer commands: render, validate and submit

use anyhow::Context as _;
use sase_forms::application::{Control, InputKind, RenderedField, EMPTY_STATE};
use sase_forms::infrastructure::SimulatedSubmissionGateway;
use sase_forms::{Answers, FormRenderer, FormsError, SchemaUseCases, ValidationErrors};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tabled::Tabled;

use super::Context;
use crate::output::OutputFormat;

#[derive(Debug, Serialize, Tabled)]
struct FieldRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Control")]
    control: String,
    #[tabled(rename = "Value")]
    value: String,
}

impl FieldRow {
    fn new(field: &RenderedField) -> Self {
        let label = match (&field.instructions, field.required) {
            (Some(help), true) => format!("{} *\n{}", field.label, help),
            (Some(help), false) => format!("{}\n{}", field.label, help),
            (None, true) => format!("{} *", field.label),
            (None, false) => field.label.clone(),
        };
        Self {
            id: field.id.to_string(),
            label,
            control: describe_control(&field.control),
            value: field.value.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct ErrorRow {
    #[tabled(rename = "Question")]
    question_id: String,
    #[tabled(rename = "Error")]
    message: String,
}

fn describe_control(control: &Control) -> String {
    let options = |opts: &[sase_forms::SelectOption]| {
        opts.iter().map(|o| o.label.as_str()).collect::<Vec<_>>().join(" | ")
    };
    match control {
        Control::TextInput { kind: InputKind::Tel, .. } => "phone input".into(),
        Control::TextInput { placeholder, .. } => {
            format!("text input ({})", placeholder.as_deref().unwrap_or(""))
        }
        Control::TextArea { .. } => "text area".into(),
        Control::NumberInput => "number input".into(),
        Control::Dropdown { options: opts, .. } => format!("dropdown: {}", options(opts)),
        Control::Checkboxes { options: opts } => format!("checkboxes: {}", options(opts)),
    }
}

fn renderer(ctx: &Context, gateway: Arc<SimulatedSubmissionGateway>) -> anyhow::Result<FormRenderer> {
    let store = ctx.open_store()?;
    Ok(FormRenderer::new(store.schema(), gateway, ctx.notifier.clone()))
}

fn gateway(ctx: &Context) -> Arc<SimulatedSubmissionGateway> {
    Arc::new(SimulatedSubmissionGateway::new(
        ctx.settings.submit_delay(),
        ctx.settings.submit_failure_rate,
    ))
}

fn read_answers(path: &Path) -> anyhow::Result<Answers> {
    let raw = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("{} is not a JSON object", path.display()))
}

fn print_errors(errors: &ValidationErrors, format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<ErrorRow> = errors
        .errors()
        .iter()
        .map(|e| ErrorRow {
            question_id: e.question_id.to_string(),
            message: e.message.clone(),
        })
        .collect();
    format.print_rows(&rows)
}

pub fn render(ctx: &Context) -> anyhow::Result<()> {
    let renderer = renderer(ctx, gateway(ctx))?;
    if renderer.is_empty() {
        println!("{}", EMPTY_STATE);
        return Ok(());
    }
    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<FieldRow> = renderer.fields().iter().map(FieldRow::new).collect();
            ctx.format.print_rows(&rows)
        }
        _ => ctx.format.print(&renderer.fields()),
    }
}

pub fn validate(answers: &Path, ctx: &Context) -> anyhow::Result<()> {
    let mut renderer = renderer(ctx, gateway(ctx))?;
    renderer.fill(&read_answers(answers)?);
    match renderer.validate() {
        Ok(cleaned) => {
            println!("Answers are valid");
            ctx.format.print(&cleaned)
        }
        Err(errors) => {
            print_errors(&errors, ctx.format)?;
            anyhow::bail!("{} field(s) failed validation", errors.len())
        }
    }
}

pub async fn submit(answers: &Path, ctx: &Context) -> anyhow::Result<()> {
    let mut renderer = renderer(ctx, gateway(ctx))?;
    renderer.fill(&read_answers(answers)?);
    match renderer.submit().await {
        Ok(receipt) => ctx.format.print(&receipt),
        Err(FormsError::Validation(errors)) => {
            print_errors(&errors, ctx.format)?;
            anyhow::bail!("{} field(s) failed validation", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}
