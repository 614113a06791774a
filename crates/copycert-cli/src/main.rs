use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use copycert_core::config::Settings;
use copycert_core::report::{model::ToolInfo, render};
use copycert_core::rules::catalog::RuleCatalog;

mod args;

use args::{Command, DocumentArgs, OutputFormat};

fn write_output(output: &str, out: Option<&std::path::Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write output: {}", path.display())),
        None => {
            print!("{output}");
            Ok(())
        }
    }
}

fn load_settings(doc: &DocumentArgs) -> Result<Settings> {
    match &doc.settings {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).context("invalid --log-level")?)
        .with_writer(std::io::stderr)
        .init();

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let (doc, review) = match args.command {
        Command::Catalog { format } => {
            let catalog = RuleCatalog::standard();
            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                    "catalog_version": copycert_core::RULE_CATALOG_VERSION,
                    "pillars": catalog.pillars(),
                }))?,
                OutputFormat::Text => render::render_catalog(&catalog),
            };
            return write_output(&output, None);
        }
        Command::Validate(doc) => (doc, false),
        Command::Review(doc) => (doc, true),
    };

    let settings = load_settings(&doc)?;
    debug!(?settings, "settings loaded");

    let report = if review {
        copycert_core::review(&doc.path, &settings, tool).await?
    } else {
        copycert_core::validate(&doc.path, &settings, tool)?
    };

    let output = match doc.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render::render_text(&report),
    };
    write_output(&output, doc.out.as_deref())?;

    std::process::exit(report.exit_code);
}
