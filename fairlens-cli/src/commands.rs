//! Subcommand handlers.

use crate::render;
use crate::{AnalyzeArgs, Commands, ConfigAction};
use anyhow::Context;
use fairlens_core::config::{WORKSPACE_CONFIG_DIR, workspace_config_path};
use fairlens_core::{FairlensConfig, LlmConfig};
use fairlens_ml::analysis::{AuditReport, BiasSpectrumAnalysis};
use fairlens_ml::{
    AnalysisProvider, AnalysisRun, AuditConfig, AuditOrchestrator, LlmAnalysisProvider,
    MetricsPair, MitigationTechnique, ScenarioDescriptor, generate_reproducible_script,
    load_scenario, save_scenario,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Options that apply to every subcommand.
#[derive(Debug, Default)]
pub struct GlobalOptions {
    pub model: Option<String>,
    pub quiet: bool,
}

/// Handle a subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    options: &GlobalOptions,
) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => handle_analyze(args, workspace, options).await,
        Commands::Metrics {
            scenario,
            technique,
            compare,
            json,
        } => handle_metrics(&scenario, technique, compare, json, workspace),
        Commands::Script { scenario, output } => {
            handle_script(&scenario, output.as_deref(), options)
        }
        Commands::Config { action } => handle_config(action, workspace),
    }
}

/// Everything a finished `analyze` produced, in its JSON output form.
#[derive(Debug, Serialize)]
struct AnalyzeOutput {
    run: AnalysisRun,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<AuditReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    creative: Option<BiasSpectrumAnalysis>,
}

fn resolve_input_text(args: &AnalyzeArgs) -> anyhow::Result<String> {
    match (&args.text, &args.file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        (None, None) => anyhow::bail!("Provide the text to analyze or --file <PATH>"),
    }
}

async fn handle_analyze(
    args: AnalyzeArgs,
    workspace: &Path,
    options: &GlobalOptions,
) -> anyhow::Result<()> {
    let text = resolve_input_text(&args)?;

    let mut config = fairlens_core::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    if let Some(model) = &options.model {
        config.llm.model = model.clone();
    }
    for warning in config.llm.validate() {
        warn!("Config: {}", warning);
    }

    let mut audit = AuditConfig::load(Some(workspace))
        .map_err(|e| anyhow::anyhow!("Failed to load audit config: {}", e))?;
    if args.no_report {
        audit.generate_report = false;
    }
    if args.no_creative {
        audit.creative_analysis = false;
    }

    let llm = fairlens_core::create_provider(&config.llm)
        .context("Failed to initialize the AI provider")?;
    let provider = Arc::new(LlmAnalysisProvider::new(llm, audit.temperatures));
    let creative_wait = Duration::from_secs(config.llm.timeout_secs);

    if !options.quiet && !args.json {
        eprintln!("Analyzing with {}...", config.llm.model);
    }
    let output = run_analysis(provider, audit, &text, args.technique, creative_wait).await?;

    if let Some(path) = &args.save_scenario {
        save_scenario(&output.run.scenario, path)
            .with_context(|| format!("Failed to save scenario to {}", path.display()))?;
        info!(path = %path.display(), "Saved scenario");
    }
    if let Some(path) = &args.script_out {
        std::fs::write(path, &output.run.script)
            .with_context(|| format!("Failed to write script to {}", path.display()))?;
        info!(path = %path.display(), "Wrote reproducible script");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print!("{}", render::render_run(&output.run));
    if let Some(report) = &output.report {
        print!("{}", render::render_report(report));
    }
    if let Some(creative) = &output.creative {
        print!("{}", render::render_spectrum(creative));
    }
    Ok(())
}

/// Run one analysis, then its report and the creative result if enabled.
///
/// A failed report or a missing creative result is logged and left out;
/// only the analysis run itself is fatal.
async fn run_analysis(
    provider: Arc<dyn AnalysisProvider>,
    audit: AuditConfig,
    text: &str,
    technique: Option<MitigationTechnique>,
    creative_wait: Duration,
) -> anyhow::Result<AnalyzeOutput> {
    let generate_report = audit.generate_report;
    let (orchestrator, mut creative_rx) = AuditOrchestrator::new(provider, audit);

    let run = orchestrator
        .run(text, technique)
        .await
        .context("An error occurred during analysis")?;

    let report = if generate_report {
        match orchestrator.report(&run).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!(error = %e, "Failed to generate the audit report");
                None
            }
        }
    } else {
        None
    };

    // The spawned creative task holds the only remaining sender once the
    // orchestrator is gone, so the channel closes when it finishes.
    drop(orchestrator);
    let creative = match tokio::time::timeout(creative_wait, async {
        while let Some(update) = creative_rx.recv().await {
            if update.run_id == run.id {
                return Some(update.result);
            }
        }
        None
    })
    .await
    {
        Ok(result) => result,
        Err(_) => {
            warn!(
                secs = creative_wait.as_secs(),
                "Timed out waiting for the creative analysis"
            );
            None
        }
    };
    debug!(creative = creative.is_some(), report = report.is_some(), "Analysis finished");

    Ok(AnalyzeOutput {
        run: Arc::unwrap_or_clone(run),
        report,
        creative,
    })
}

fn handle_metrics(
    path: &Path,
    technique: Option<MitigationTechnique>,
    compare: bool,
    json: bool,
    workspace: &Path,
) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let technique = match technique {
        Some(t) => t,
        None => {
            AuditConfig::load(Some(workspace))
                .map_err(|e| anyhow::anyhow!("Failed to load audit config: {}", e))?
                .default_technique
        }
    };
    let pairs = scenario_metrics(&scenario, technique, compare);

    if json {
        let value = if compare {
            serde_json::to_string_pretty(&pairs)?
        } else {
            serde_json::to_string_pretty(&pairs[0])?
        };
        println!("{}", value);
    } else {
        print!("{}", render::render_scenario(&scenario));
        if compare {
            print!("{}", render::render_comparison(&pairs));
        } else {
            print!("{}", render::render_metrics(&pairs[0]));
        }
    }
    Ok(())
}

/// Metrics for `scenario` under `technique`, or under every technique when
/// comparing. The first entry is always `technique`'s.
fn scenario_metrics(
    scenario: &ScenarioDescriptor,
    technique: MitigationTechnique,
    compare: bool,
) -> Vec<MetricsPair> {
    let base = MetricsPair::new(scenario.compute_metrics(), technique);
    if !compare {
        return vec![base];
    }
    let mut pairs = vec![base];
    pairs.extend(
        MitigationTechnique::ALL
            .iter()
            .filter(|t| **t != technique)
            .map(|t| base.with_technique(*t)),
    );
    pairs
}

fn handle_script(
    path: &Path,
    output: Option<&Path>,
    options: &GlobalOptions,
) -> anyhow::Result<()> {
    let scenario = load_scenario(path)?;
    let script = generate_reproducible_script(&scenario)?;
    match output {
        Some(out) => {
            std::fs::write(out, &script)
                .with_context(|| format!("Failed to write script to {}", out.display()))?;
            if !options.quiet {
                println!("Wrote reproducible script to: {}", out.display());
            }
        }
        None => print!("{}", script),
    }
    Ok(())
}

/// The full configuration file: the `[llm]` and `[audit]` tables.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: LlmConfig,
    audit: AuditConfig,
}

/// Write the default config file. Returns false if one already exists.
fn init_config(workspace: &Path) -> anyhow::Result<bool> {
    std::fs::create_dir_all(workspace.join(WORKSPACE_CONFIG_DIR))?;
    let config_path = workspace_config_path(workspace);
    if config_path.exists() {
        return Ok(false);
    }
    let toml_str = toml::to_string_pretty(&ConfigFile::default())?;
    std::fs::write(&config_path, toml_str)?;
    Ok(true)
}

fn effective_config(workspace: &Path) -> anyhow::Result<ConfigFile> {
    let FairlensConfig { llm } = fairlens_core::load_config(Some(workspace), None)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    let audit = AuditConfig::load(Some(workspace))
        .map_err(|e| anyhow::anyhow!("Failed to load audit config: {}", e))?;
    Ok(ConfigFile { llm, audit })
}

fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace_config_path(workspace);
            if init_config(workspace)? {
                println!(
                    "Created default configuration at: {}",
                    config_path.display()
                );
            } else {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = effective_config(workspace)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
