//! FairLens CLI: audit free-form text for bias from the terminal.
//!
//! Runs the full AI-assisted analysis, or the offline fairness engine on a
//! saved scenario file.

mod commands;
mod render;

use clap::Parser;
use fairlens_ml::MitigationTechnique;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// FairLens: bias auditing with local fairness statistics
#[derive(Parser, Debug)]
#[command(name = "fairlens", version, about, long_about = None)]
struct Cli {
    /// LLM model to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Workspace directory
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Analyze text for bias and compute fairness metrics on a synthetic dataset
    Analyze(AnalyzeArgs),
    /// Compute fairness metrics for a saved scenario file
    Metrics {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Mitigation technique: reweighing, disparate-impact-remover
        #[arg(short, long)]
        technique: Option<MitigationTechnique>,
        /// Show the simulated result of every technique
        #[arg(long)]
        compare: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Export the reproducible Python analysis script for a scenario file
    Script {
        /// Scenario JSON file
        scenario: PathBuf,
        /// Output path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Default)]
struct AnalyzeArgs {
    /// Text to analyze
    text: Option<String>,
    /// Read the text from a file
    #[arg(short, long, conflicts_with = "text")]
    file: Option<PathBuf>,
    /// Mitigation technique: reweighing, disparate-impact-remover
    #[arg(short, long)]
    technique: Option<MitigationTechnique>,
    /// Skip the audit report
    #[arg(long)]
    no_report: bool,
    /// Skip the creative bias-spectrum analysis
    #[arg(long)]
    no_creative: bool,
    /// Save the synthetic scenario to this file
    #[arg(long)]
    save_scenario: Option<PathBuf>,
    /// Write the reproducible Python script to this file
    #[arg(long)]
    script_out: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default workspace configuration file
    Init,
    /// Show the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "fairlens", "fairlens")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "fairlens.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let options = commands::GlobalOptions {
        model: cli.model,
        quiet: cli.quiet,
    };
    commands::handle_command(cli.command, &workspace, &options).await
}
