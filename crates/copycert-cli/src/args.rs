use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "copycert",
    version,
    about = "Score marketing copy against the copywriting rubric"
)]
pub struct Args {
    /// Log filter for stderr output (e.g. warn, info, copycert_core=debug)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List pillars and edicts
    Catalog {
        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Score a document locally; exits 0 when eligible for review
    Validate(DocumentArgs),

    /// Score a document, then run the simulated review; exits 0 when certified
    Review(DocumentArgs),
}

#[derive(Debug, ClapArgs)]
pub struct DocumentArgs {
    /// Path to the document (plain text or HTML)
    pub path: PathBuf,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// JSON settings file; missing fields take their defaults
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
