//! launchcheck CLI - launch a DDP driver under Hydra and verify what it leaves on disk

mod logging;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::info;

use launchcheck_core::application::{
    HarnessConfig, HarnessService, OutcomeRow, Preconditions, ScenarioOutcome,
};
use launchcheck_core::domain::{DriverScript, Scenario};
use launchcheck_core::port::time_provider::SystemTimeProvider;
use launchcheck_core::port::{EnvironmentProbe, ProcessRunner};
use launchcheck_infra_system::{
    CommandEnvironmentProbe, GlobArtifactScanner, SubprocessRunner, TempWorkspaceFactory,
    YamlConfigLoader,
};
use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "launchcheck")]
#[command(about = "Multi-process launch verification harness", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (default: ./launchcheck.{toml,yaml,json} if present)
    #[arg(long, global = true, env = "LAUNCHCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Interpreter for the driver script
    #[arg(long, global = true)]
    interpreter: Option<String>,

    /// Driver script to use instead of the built-in training driver
    #[arg(long, global = true)]
    driver: Option<PathBuf>,

    /// Kill the driver after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Leave each workspace on disk after the run
    #[arg(long, global = true)]
    keep_workspace: bool,

    /// Run even when GPU / module preconditions are not met
    #[arg(long, global = true)]
    no_skip: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Single job with N processes
    SingleRun {
        /// Number of devices (processes)
        #[arg(short, long, default_value = "2")]
        devices: u32,

        /// Override the config tool's output subdirectory
        #[arg(long)]
        subdir: Option<String>,
    },

    /// Multirun sweep: one job per value of the swept parameter
    Sweep {
        /// Number of devices (processes) per job
        #[arg(short, long, default_value = "2")]
        devices: u32,

        /// Number of sweep jobs
        #[arg(short = 'j', long, default_value = "2")]
        num_jobs: u32,
    },

    /// Run the full parametrized set of single-run and sweep scenarios
    Matrix,

    /// Report GPU count and module availability
    Probe,
}

#[derive(Tabled)]
struct OutcomeTableRow {
    scenario: String,
    status: String,
    detail: String,
}

impl From<&ScenarioOutcome> for OutcomeTableRow {
    fn from(outcome: &ScenarioOutcome) -> Self {
        let status = match outcome {
            ScenarioOutcome::Passed(_) => "PASSED".green().to_string(),
            ScenarioOutcome::Failed { .. } => "FAILED".red().to_string(),
            ScenarioOutcome::Skipped { .. } => "SKIPPED".yellow().to_string(),
        };
        Self {
            scenario: outcome.scenario().to_string(),
            status,
            detail: outcome.detail(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Load settings, then let flags win
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(interpreter) = &cli.interpreter {
        settings.interpreter = interpreter.clone();
    }
    if let Some(driver) = &cli.driver {
        settings.driver = Some(driver.to_string_lossy().into_owned());
    }
    if cli.timeout_secs.is_some() {
        settings.timeout_secs = cli.timeout_secs;
    }
    settings.keep_workspace |= cli.keep_workspace;

    // 2. Initialize logging; the guard flushes the log file when main returns
    let _log_guard = logging::init(&settings, cli.verbose)?;
    info!("launchcheck v{} starting...", VERSION);

    // 3. Wire adapters
    let runner: Arc<dyn ProcessRunner> = Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider)));
    let probe = CommandEnvironmentProbe::new(runner.clone(), settings.interpreter.clone());

    let scenarios = match cli.command {
        Commands::Probe => return run_probe(&probe, cli.json).await,
        Commands::SingleRun { devices, subdir } => vec![Scenario::single_run(devices, subdir)?],
        Commands::Sweep { devices, num_jobs } => vec![Scenario::sweep(devices, num_jobs)?],
        Commands::Matrix => Scenario::default_matrix(),
    };

    let driver = load_driver(settings.driver_path().as_deref())?;
    let service = HarnessService::new(
        runner,
        Arc::new(GlobArtifactScanner::new()),
        Arc::new(YamlConfigLoader),
        driver,
        HarnessConfig {
            interpreter: settings.interpreter.clone(),
            timeout: settings.timeout(),
            ..HarnessConfig::default()
        },
    );

    let mut factory = TempWorkspaceFactory::new().keep(settings.keep_workspace);
    if let Some(dir) = settings.workspace_path() {
        factory = factory.in_dir(dir);
    }

    // 4. Skip on hosts that cannot run the launch at all
    let max_devices = scenarios.iter().map(Scenario::devices).max().unwrap_or(0);
    if !cli.no_skip {
        let outcome = Preconditions::for_devices(max_devices).check(&probe).await;
        if !outcome.is_satisfied() {
            let skipped: Vec<ScenarioOutcome> = scenarios
                .into_iter()
                .map(|scenario| ScenarioOutcome::Skipped {
                    scenario,
                    reasons: outcome.reasons().to_vec(),
                })
                .collect();
            render(&skipped, cli.json)?;
            return Ok(ExitCode::SUCCESS);
        }
    }

    // 5. Run
    let outcomes = service.run_matrix(&factory, &scenarios).await;
    render(&outcomes, cli.json)?;

    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    info!(total = outcomes.len(), failed, "Run complete");

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_driver(path: Option<&Path>) -> Result<DriverScript> {
    let Some(path) = path else {
        return Ok(DriverScript::training());
    };

    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read driver script {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Driver path has no usable file name: {}", path.display()))?;

    Ok(DriverScript::new(file_name, body)?)
}

async fn run_probe(probe: &dyn EnvironmentProbe, json: bool) -> Result<ExitCode> {
    let gpus = probe.gpu_count().await;
    let preconditions = Preconditions::default();
    let mut modules = Vec::with_capacity(preconditions.modules.len());
    for module in &preconditions.modules {
        modules.push((module.clone(), probe.module_available(module).await));
    }

    if json {
        let value = serde_json::json!({
            "gpus": gpus,
            "min_gpus": preconditions.min_gpus,
            "modules": modules
                .iter()
                .map(|(name, ok)| serde_json::json!({"name": name, "available": ok}))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Environment".cyan().bold());
    println!();
    let gpu_line = format!("{} (need {})", gpus, preconditions.min_gpus);
    if gpus >= preconditions.min_gpus {
        println!("  {} {}", "GPUs:".bold(), gpu_line.green());
    } else {
        println!("  {} {}", "GPUs:".bold(), gpu_line.yellow());
    }
    for (name, ok) in &modules {
        let state = if *ok { "available".green() } else { "missing".red() };
        println!("  {} {}", format!("{}:", name).bold(), state);
    }

    Ok(ExitCode::SUCCESS)
}

fn render(outcomes: &[ScenarioOutcome], json: bool) -> Result<()> {
    if json {
        let rows: Vec<OutcomeRow> = outcomes.iter().map(OutcomeRow::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let rows: Vec<OutcomeTableRow> = outcomes.iter().map(OutcomeTableRow::from).collect();
    println!("{}", Table::new(rows));

    for outcome in outcomes {
        if let ScenarioOutcome::Passed(report) = outcome {
            println!(
                "  {} {} ({})",
                "✓".green(),
                report.label,
                report.workspace.display()
            );
        }
    }
    Ok(())
}
