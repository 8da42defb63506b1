//! Subcommand handlers

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use mfc_adapters::AdapterRegistry;
use mfc_check::{AnalysisPipeline, CheckOrchestrator, HistoryAnalyzer, PreviousResultHistory};
use mfc_config::ConfigError;
use mfc_core::CheckResult;
use tracing::{info, warn};

use crate::display::render_summary;

/// How a command ended, mapped onto the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Failed,
    Issues,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::from(1),
            Outcome::Issues => ExitCode::from(2),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Task configuration (YAML or JSON)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Write the full result as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fetch projects one at a time
    #[arg(long)]
    pub no_parallel: bool,

    /// Skip ownership and reason enrichment
    #[arg(long)]
    pub no_analysis: bool,

    /// Earlier result JSON used to carry first-detection times forward
    #[arg(long)]
    pub previous: Option<PathBuf>,
}

pub async fn scan(args: &ScanArgs, json: bool) -> Result<Outcome> {
    let mut task = mfc_config::load(&args.config)
        .with_context(|| format!("loading task config {}", args.config.display()))?;
    if args.no_parallel {
        task = task.sequential();
    }

    let orchestrator = CheckOrchestrator::new(task, Arc::new(AdapterRegistry::with_defaults()))?;
    let mut result = orchestrator.check().await?;

    if args.no_analysis {
        if args.previous.is_some() {
            warn!("--previous ignored because analysis is disabled");
        }
    } else {
        result = analysis_pipeline(args.previous.as_deref())?.run(result);
    }

    if let Some(output) = &args.output {
        write_result(&result, output)?;
        info!(path = %output.display(), "result written");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_summary(&result));
    }

    Ok(if result.has_issues() { Outcome::Issues } else { Outcome::Clean })
}

fn analysis_pipeline(previous: Option<&Path>) -> Result<AnalysisPipeline> {
    let mut pipeline = AnalysisPipeline::standard();
    if let Some(path) = previous {
        let history = PreviousResultHistory::load(path)
            .with_context(|| format!("loading previous result {}", path.display()))?;
        pipeline.add(Box::new(HistoryAnalyzer::new(Box::new(history))));
    }
    Ok(pipeline)
}

fn write_result(result: &CheckResult, path: &Path) -> Result<()> {
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body).with_context(|| format!("writing result to {}", path.display()))
}

pub fn validate(config: &Path, json: bool) -> Result<Outcome> {
    let raw = mfc_config::load_raw(config)
        .with_context(|| format!("loading task config {}", config.display()))?;

    match mfc_config::validate(raw) {
        Ok(task) => {
            if json {
                let report = serde_json::json!({
                    "valid": true,
                    "task_id": task.task_id,
                    "targets": task.target_ids(),
                    "baselines": task.baseline_ids(),
                    "strategy": task.strategy.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} is valid: task {}, {} target(s), {} baseline(s), strategy {}",
                    config.display(),
                    task.task_id,
                    task.target_projects.len(),
                    task.baseline_projects.len(),
                    task.strategy
                );
            }
            Ok(Outcome::Clean)
        }
        Err(ConfigError::Invalid { problems }) => {
            if json {
                let report = serde_json::json!({ "valid": false, "problems": problems });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} is invalid:", config.display());
                for problem in &problems {
                    println!("  - {}", problem);
                }
            }
            Ok(Outcome::Failed)
        }
        Err(err) => Err(err.into()),
    }
}

pub fn init(output: &Path, force: bool) -> Result<Outcome> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }
    fs::write(output, mfc_config::TEMPLATE)
        .with_context(|| format!("writing template to {}", output.display()))?;
    println!("wrote task template to {}", output.display());
    Ok(Outcome::Clean)
}
