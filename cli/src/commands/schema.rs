//! Schema commands

use anyhow::{anyhow, bail};
use sase_forms::infrastructure::{FileSchemaSource, HttpSchemaSource};
use sase_forms::{FormSchema, FormStore, Question, SchemaLoadService, SchemaSource, SchemaUseCases};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::Tabled;

use super::{write_schema, Context};
use crate::SchemaCommands;

#[derive(Debug, Serialize, Tabled)]
pub struct QuestionRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Required")]
    pub required: bool,
    #[tabled(rename = "Hidden")]
    pub hidden: bool,
}

impl QuestionRow {
    pub fn new(position: usize, q: &Question) -> Self {
        Self {
            position,
            id: q.id.to_string(),
            kind: q.kind.to_string(),
            title: q.title.clone(),
            required: q.required,
            hidden: q.hidden,
        }
    }
}

pub async fn handle(action: SchemaCommands, ctx: &Context) -> anyhow::Result<()> {
    match action {
        SchemaCommands::Init { id, force } => {
            if ctx.schema_path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", ctx.schema_path.display());
            }
            write_schema(&ctx.schema_path, &FormSchema::new(id))?;
            println!("Initialized empty schema at {}", ctx.schema_path.display());
        }
        SchemaCommands::Show => {
            let store = ctx.open_store()?;
            print_schema(&store.schema(), ctx)?;
        }
        SchemaCommands::Load { url, file } => {
            let source = source_for(url, file, ctx)?;
            // Keep the current file's schema when the fetch fails.
            let store = match ctx.open_store() {
                Ok(store) => store,
                Err(_) => Arc::new(FormStore::default()),
            };
            let service = SchemaLoadService::new(source, ctx.notifier.clone());
            let schema = service.load_into(store.as_ref()).await?;
            ctx.save_store(&store)?;
            println!("Loaded {} question(s) into {}", schema.len(), ctx.schema_path.display());
        }
    }
    Ok(())
}

pub fn print_schema(schema: &FormSchema, ctx: &Context) -> anyhow::Result<()> {
    match ctx.format {
        crate::output::OutputFormat::Table => {
            println!("Schema: {}", schema.id());
            let rows: Vec<QuestionRow> = schema
                .questions()
                .iter()
                .enumerate()
                .map(|(i, q)| QuestionRow::new(i + 1, q))
                .collect();
            ctx.format.print_rows(&rows)
        }
        _ => ctx.format.print(schema),
    }
}

fn source_for(
    url: Option<String>,
    file: Option<PathBuf>,
    ctx: &Context,
) -> anyhow::Result<Arc<dyn SchemaSource>> {
    if let Some(file) = file {
        return Ok(Arc::new(FileSchemaSource::new(file)));
    }
    let url = match url {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => url,
        Some(path) => match &ctx.settings.base_url {
            Some(base) => return Ok(Arc::new(HttpSchemaSource::with_base(base, &path))),
            None => bail!("{} is relative and no base_url is configured", path),
        },
        None => ctx
            .settings
            .schema_location()
            .ok_or_else(|| anyhow!("Pass --url or --file, or configure base_url"))?,
    };
    Ok(Arc::new(HttpSchemaSource::new(url)))
}
