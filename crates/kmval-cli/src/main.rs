mod output;
mod preflight;
mod registry;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use kmval_core::{Error as CoreError, load_manifest};
use kmval_eval::{
    EvalError, ExecuteOptions, ExecutionEngine, KustomizeRenderer, SuiteMode, SuiteRunner,
    YqEvaluator,
};
use registry::{RunContext, RunReport, init_logging, write_report};
use settings::{SettingsError, load_settings};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Settings(#[from] SettingsError),
    #[error("{0}")]
    Manifest(#[from] CoreError),
    #[error("{0}")]
    Eval(#[from] EvalError),
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("kmval requires {0} to be installed and available in the $PATH")]
    MissingTool(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "kmval",
    version,
    about = "Validate rendered Kubernetes manifests against declared expectations"
)]
struct Cli {
    /// Directory holding the validation manifest and the kustomize artifacts.
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,
    /// Manifest file, relative to DIR.
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Stop at the first failing plan.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,
    /// Settings file; defaults to kmval.toml in DIR when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write a JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Append JSON log lines to this path.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::debug!(event = "run_failed", error = %err);
            eprintln!("{} {err}", "error:".red());
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every plan passed.
async fn run(cli: Cli) -> Result<bool, CliError> {
    let root = cli.dir.unwrap_or_else(|| PathBuf::from("."));
    let settings = load_settings(&root, cli.config.as_deref())?;
    init_logging(cli.log_file.as_deref())?;

    let mode = if cli.fail_fast || settings.fail_fast {
        SuiteMode::FailFast
    } else {
        SuiteMode::FullRun
    };
    let manifest_path = root.join(cli.file.as_deref().unwrap_or(settings.file.as_path()));

    let renderer = KustomizeRenderer::new(&root)
        .with_binary(settings.kustomize_bin.clone())
        .with_timeout(settings.render_timeout());
    let evaluator = YqEvaluator::new(settings.yq_bin.clone(), settings.query_dialect)
        .with_timeout(settings.query_timeout());

    if let Some(tool) = preflight::missing_tool(&renderer, &evaluator).await {
        return Err(CliError::MissingTool(tool));
    }

    let ctx = RunContext::start(manifest_path.clone(), mode);
    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        manifest = %manifest_path.display(),
        mode = ?mode
    );

    let manifest = load_manifest(&manifest_path)?;
    let engine = ExecutionEngine::new(
        evaluator,
        ExecuteOptions {
            unindexed_kind: settings.unindexed_kind,
            ..ExecuteOptions::default()
        },
    );
    let runner = SuiteRunner::new(renderer, engine, mode);

    let outcome = runner.run_with(&manifest, output::print_plan).await?;
    output::print_summary(&outcome);

    if let Some(path) = cli.report.as_deref() {
        save_report(path, &ctx, &outcome)?;
    }

    tracing::info!(
        event = "run_finished",
        run_id = %ctx.run_id,
        success = outcome.success()
    );
    Ok(outcome.success())
}

fn save_report(
    path: &Path,
    ctx: &RunContext,
    outcome: &kmval_eval::SuiteOutcome,
) -> Result<(), CliError> {
    write_report(path, &RunReport::new(ctx, outcome))?;
    tracing::info!(event = "report_written", path = %path.display());
    Ok(())
}
