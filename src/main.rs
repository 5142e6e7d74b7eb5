// Cadence - timed workflow runner
//
// This binary discovers workflow definitions, runs one through the
// execution host, and prints live progress from the engine's update
// stream. Ctrl-C stops the active run and tears the host down.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

mod capability;
mod config;
mod host;
mod utils;
mod workflow;

use crate::capability::{ConsoleAlert, ConsoleAnnouncer, ConsoleHaptics};
use crate::config::ConfigManager;
use crate::host::ExecutionHost;
use crate::workflow::{EndReason, RunPhase, RunUpdate, Workflow, WorkflowCatalog};

/// Cadence - run named sequences of timed steps with announcements and alerts
#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Timed workflow runner with spoken announcements, alert sounds, and haptic feedback")]
#[command(version)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration directory path
    #[arg(short, long)]
    config: Option<String>,

    /// List available workflows
    #[arg(long)]
    list: bool,

    /// Workflow to run: a catalog name or a path to a YAML definition
    #[arg(long)]
    workflow: Option<String>,

    /// Print updates as JSON lines instead of progress text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = match &args.config {
        Some(dir) => ConfigManager::with_config_dir(dir.into()).await?,
        None => ConfigManager::new().await?,
    };

    // The appender guard must outlive main for file logging to flush
    let _log_guard = init_logging(args.verbose, config_manager.config().log_file.as_deref())?;

    tracing::info!("Starting Cadence workflow runner");

    run_cli(args, config_manager).await?;

    tracing::info!("Cadence shutdown complete");
    Ok(())
}

/// Resolve the requested workflow and drive it to its end
async fn run_cli(args: Args, config_manager: ConfigManager) -> Result<()> {
    let workflows_dir = config_manager.workflows_dir();

    if !workflows_dir.exists() {
        std::fs::create_dir_all(&workflows_dir).with_context(|| {
            format!("Failed to create workflows directory: {}", workflows_dir.display())
        })?;
    }

    let catalog = WorkflowCatalog::new(&workflows_dir)?;

    if args.list || args.workflow.is_none() {
        list_workflows(&catalog);
        return Ok(());
    }

    let requested = args.workflow.as_deref().unwrap_or_default();
    let workflow = resolve_workflow(&catalog, requested)?;

    run_workflow(workflow, args.json).await
}

/// Print the catalog contents
fn list_workflows(catalog: &WorkflowCatalog) {
    println!("Available workflows:\n");

    if catalog.workflows().is_empty() {
        println!(
            "  No workflows found in {}",
            catalog.workflows_dir().display()
        );
        println!("\n  Create workflow YAML files there to get started.");
        return;
    }

    let mut names: Vec<_> = catalog.workflows().keys().collect();
    names.sort();

    for name in names {
        let workflow = &catalog.workflows()[name];
        println!(
            "  {} - {} steps, {}s of work, {}s rest between steps",
            name,
            workflow.steps.len(),
            workflow.total_step_seconds(),
            workflow.alert_duration_seconds
        );
    }

    println!("\nRun a workflow with: cadence --workflow <name>");
}

/// A workflow argument is either a catalog name or a YAML file path
fn resolve_workflow(catalog: &WorkflowCatalog, requested: &str) -> Result<Workflow> {
    if let Some(workflow) = catalog.get_workflow(requested) {
        return Ok(workflow.clone());
    }

    let path = Path::new(requested);
    if path.exists() {
        return WorkflowCatalog::load_workflow(path);
    }

    let mut names: Vec<_> = catalog.workflows().keys().cloned().collect();
    names.sort();
    anyhow::bail!(
        "Workflow '{}' not found. Available: {}",
        requested,
        if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        }
    )
}

/// Run one workflow through the host, printing progress until it ends
async fn run_workflow(workflow: Workflow, json: bool) -> Result<()> {
    let host = ExecutionHost::new(
        Arc::new(ConsoleAnnouncer),
        Arc::new(ConsoleAlert),
        Arc::new(ConsoleHaptics),
    )
    .await;

    let mut updates = host.subscribe();

    println!(
        "Starting workflow: {} ({} steps)",
        workflow.name,
        workflow.steps.len()
    );

    host.start(workflow).await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\nStopping...");
                host.shutdown().await;
            }
            update = updates.recv() => {
                let update = match update {
                    Ok(update) => update,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                        tracing::warn!("display fell behind by {} updates", missed);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                };

                if json {
                    println!("{}", serde_json::to_string(&update)?);
                } else {
                    print_update(&update);
                }

                if matches!(update, RunUpdate::Ended { .. }) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// One progress line per update
fn print_update(update: &RunUpdate) {
    match update {
        RunUpdate::Snapshot(RunPhase::Running {
            step,
            step_index,
            step_count,
            remaining_seconds,
            total_seconds,
            ..
        }) => {
            println!(
                "  → [{}/{}] {}: {}s / {}s",
                step_index + 1,
                step_count,
                step.label,
                remaining_seconds,
                total_seconds
            );
        }
        RunUpdate::Snapshot(RunPhase::Paused { step, .. }) => {
            println!("  ⏸ paused on {}", step.label);
        }
        RunUpdate::Snapshot(RunPhase::Resting {
            completed_step,
            remaining_seconds,
            ..
        }) => {
            println!(
                "  … rest after {}: {}s",
                completed_step.label, remaining_seconds
            );
        }
        RunUpdate::Snapshot(RunPhase::Completed) => {
            println!("  ✓ all steps completed");
        }
        RunUpdate::Snapshot(RunPhase::Idle) => {}
        RunUpdate::Ended { reason, summary } => match reason {
            EndReason::Completed => println!(
                "\n✓ Workflow '{}' completed ({} steps, {}s)",
                summary.workflow_name,
                summary.steps_completed,
                summary.duration.num_seconds()
            ),
            EndReason::Stopped => println!(
                "\n✗ Workflow '{}' stopped after {} of {} steps",
                summary.workflow_name, summary.steps_completed, summary.total_steps
            ),
        },
    }
}

/// Initialize logging based on verbosity level and optional log file
fn init_logging(
    verbose: bool,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("cadence_workflows={}", log_level).into());

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().context("log file path has no file name")?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            registry
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            registry.with(tracing_subscriber::fmt::layer()).init();
            Ok(None)
        }
    }
}
