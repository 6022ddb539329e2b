//! MedPredict command-line front end.
//!
//! Usage:
//!   medpredict schema <module>
//!   medpredict normalize <module> <extraction.json>
//!   medpredict predict <module> [--field name=value]... [--report labs.pdf]
//!                      [--image scan.png] [--out dir] [--token T]
//!   medpredict template init [path] [--force]

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use medpredict_lib::config::{self, Settings};
use medpredict_lib::models::{ModuleId, RawExtraction};
use medpredict_lib::pipeline::normalize::normalize;
use medpredict_lib::pipeline::report::{write_default_template, ReportSynthesizer, TemplateStore};
use medpredict_lib::pipeline::schema::SchemaRegistry;
use medpredict_lib::pipeline::service::{build_http_client, HttpOracle, HttpScraper, Session};
use medpredict_lib::pipeline::strategy::module_for;
use medpredict_lib::pipeline::upload::Upload;
use medpredict_lib::workflow::{Workflow, WorkflowError};

#[derive(Parser)]
#[command(name = "medpredict")]
#[command(version)]
#[command(about = "Diagnostic predictions and printable reports", long_about = None)]
struct Cli {
    /// Settings file (JSON). Without it, defaults plus MEDPREDICT_* variables apply.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a module's field schema as JSON
    Schema {
        /// heart, lung, breast or diabetes
        module: ModuleId,
    },

    /// Map a scraper extraction (JSON file) onto a module's canonical fields
    Normalize {
        module: ModuleId,
        extraction: PathBuf,
    },

    /// Fill the form, submit it, and write the report
    Predict {
        module: ModuleId,

        /// Field value as name=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Lab report PDF to scrape before applying --field values
        #[arg(long)]
        report: Option<PathBuf>,

        /// Image for the breast and lung modules
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output directory (defaults to the configured output_dir)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Bearer token of the signed-in user
        #[arg(long, env = "MEDPREDICT_TOKEN")]
        token: Option<String>,
    },

    /// Manage the report template
    Template {
        #[command(subcommand)]
        action: TemplateCommand,
    },
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// Write the default template
    Init {
        /// Destination (defaults to the configured template_path)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in {raw:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    medpredict_lib::init_tracing();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::from_env()?,
    };
    let registry = SchemaRegistry::builtin()?;

    match cli.command {
        Commands::Schema { module } => {
            println!("{}", serde_json::to_string_pretty(registry.schema(module))?);
        }
        Commands::Normalize { module, extraction } => {
            let raw = read_extraction(&extraction)?;
            let record = normalize(module_for(module).as_ref(), registry.schema(module), &raw)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Predict {
            module,
            fields,
            report,
            image,
            out,
            token,
        } => {
            let session = token.map(Session::with_token).unwrap_or_default();
            let out = out.unwrap_or_else(|| settings.output_dir.clone());
            run_predict(&settings, &registry, module, fields, report, image, &out, &session)
                .await?;
        }
        Commands::Template {
            action: TemplateCommand::Init { path, force },
        } => {
            let path = path.unwrap_or_else(|| settings.template_path.clone());
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            write_default_template(&path)?;
            println!("Template written to {}", path.display());
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_predict(
    settings: &Settings,
    registry: &SchemaRegistry,
    module: ModuleId,
    fields: Vec<(String, String)>,
    report: Option<PathBuf>,
    image: Option<PathBuf>,
    out: &Path,
    session: &Session,
) -> Result<()> {
    let client = build_http_client(settings)?;
    let mut workflow = Workflow::for_module(module, registry);

    if let Some(path) = report {
        let upload = Upload::from_path(&path)
            .with_context(|| format!("Cannot read report {}", path.display()))?;
        let scraper = HttpScraper::with_client(settings, client.clone());
        let record = workflow
            .upload_report(&scraper, upload, session)
            .await
            .map_err(surface)?;
        eprintln!(
            "Scraped {} of {} fields from {}",
            record.filled_count(),
            record.len(),
            path.display()
        );
    }

    for (name, value) in fields {
        workflow.set_field(&name, value).map_err(surface)?;
    }

    if let Some(path) = image {
        let upload = Upload::from_path(&path)
            .with_context(|| format!("Cannot read image {}", path.display()))?;
        workflow.select_image(upload).map_err(surface)?;
    }

    let oracle = HttpOracle::with_client(settings, client);
    let verdict = workflow.submit(&oracle, session).await.map_err(surface)?;
    println!("{}", verdict.text);

    let synthesizer = ReportSynthesizer::new(TemplateStore::new(&settings.template_path));
    let artifact = workflow.export(&synthesizer).await.map_err(surface)?;
    let path = artifact
        .write_to_dir(out)
        .with_context(|| format!("Cannot write report to {}", out.display()))?;
    println!("Report written to {}", path.display());
    Ok(())
}

fn read_extraction(path: &Path) -> Result<RawExtraction> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(RawExtraction::from_json(&value))
}

/// Log the detailed failure, show the user-facing sentence.
fn surface(error: WorkflowError) -> anyhow::Error {
    tracing::error!(error = %error, "Workflow step failed");
    anyhow!(error.user_message())
}
