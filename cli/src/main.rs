//! OpenSASE Forms CLI
//!
//! Builder and renderer for form schemas kept in a local JSON file.
//!
//! # Usage
//!
//! ```bash
//! opensase-forms schema init --id signup
//! opensase-forms question add email
//! opensase-forms question edit k3j9x0a1b --title "Work email" --required true
//! opensase-forms option add p0q9r8s7t "Red"
//! opensase-forms render --format json
//! opensase-forms submit --answers answers.json
//! ```

use clap::{Parser, Subcommand};
use sase_forms::{Direction, QuestionType};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "opensase-forms")]
#[command(author = "OpenSASE")]
#[command(version)]
#[command(about = "OpenSASE form builder", long_about = None)]
struct Cli {
    /// Schema file to operate on
    #[arg(long, short, env = "OPENSASE_FORMS_SCHEMA")]
    schema: Option<PathBuf>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, show and load schemas
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
    /// Edit questions
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },
    /// Edit options of select questions
    #[command(name = "option")]
    Options {
        #[command(subcommand)]
        action: OptionCommands,
    },
    /// Show the form as it would be rendered
    Render,
    /// Check an answers file against the form
    Validate {
        #[arg(long, short)]
        answers: PathBuf,
    },
    /// Validate and submit an answers file
    Submit {
        #[arg(long, short)]
        answers: PathBuf,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Start an empty schema
    Init {
        #[arg(long, default_value = sase_forms::DEFAULT_SCHEMA_ID)]
        id: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List questions
    Show,
    /// Replace the schema with a fetched document
    Load {
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum QuestionCommands {
    /// Append a question
    Add { kind: QuestionType },
    /// Edit fields of a question
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long = "type")]
        kind: Option<QuestionType>,
        #[arg(long)]
        required: Option<bool>,
        #[arg(long)]
        hidden: Option<bool>,
        #[arg(long, allow_negative_numbers = true, conflicts_with = "clear_min")]
        min: Option<f64>,
        #[arg(long, allow_negative_numbers = true, conflicts_with = "clear_max")]
        max: Option<f64>,
        /// Custom validation pattern; empty to clear
        #[arg(long)]
        pattern: Option<String>,
        #[arg(long)]
        clear_min: bool,
        #[arg(long)]
        clear_max: bool,
    },
    /// Delete a question
    Delete { id: String },
    /// Swap with the neighbour above or below
    Move { id: String, direction: Direction },
    /// Append a copy of a question
    Duplicate { id: String },
    /// List the question types offered by the builder
    Types,
}

#[derive(Subcommand)]
enum OptionCommands {
    /// Add an option by label
    Add { id: String, label: String },
    /// Remove every option with this value
    Remove { id: String, value: String },
    /// Allow several selections
    Multi {
        id: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match config::Config::load(cli.profile.as_deref()) {
        Ok(mut config) => {
            config.apply_env(std::env::vars());
            let ctx = commands::Context::new(config, cli.schema, cli.format);
            run(cli.command, &ctx, cli.profile.as_deref()).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, ctx: &commands::Context, profile: Option<&str>) -> anyhow::Result<()> {
    match command {
        Commands::Schema { action } => commands::schema::handle(action, ctx).await,
        Commands::Question { action } => commands::questions::handle(action, ctx).await,
        Commands::Options { action } => commands::options::handle(action, ctx).await,
        Commands::Render => commands::form::render(ctx),
        Commands::Validate { answers } => commands::form::validate(&answers, ctx),
        Commands::Submit { answers } => commands::form::submit(&answers, ctx).await,
        Commands::Config { action } => commands::config::handle(action, profile),
    }
}
