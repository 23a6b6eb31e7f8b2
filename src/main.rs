//! Turing CLI entry point.
//!
//! Provides `run`, `list`, `doctor`, and `generate` subcommands for executing
//! the scenario suite, inspecting the built-in catalogue, checking target
//! connectivity, or drafting new scenarios with an LLM.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use turing::analyst::{self, FailureAnalyst};
use turing::config::{TargetMode, TuringConfig};
use turing::driver::bridge::BridgeDriver;
use turing::driver::scripted::ScriptedDriver;
use turing::driver::{ChatDriver, DriverHealth};
use turing::generator::{self, ScenarioGenerator};
use turing::runner::{self, SuiteRunner};
use turing::scenario::{catalog, Category};
use turing::verifier::Verifier;

/// Turing — conversational-contract verifier for the Eva support chatbot.
#[derive(Parser)]
#[command(name = "turing", version, about)]
struct Cli {
    /// Config file path (otherwise `$TURING_CONFIG_PATH` or `./turing.toml`).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Run the scenario suite against the configured target.
    Run {
        /// Request an LLM failure analysis for each failed scenario.
        #[arg(long)]
        analyze: bool,
    },
    /// List the built-in scenario catalogue grouped by category.
    List,
    /// Check configuration and target reachability without sending scenarios.
    Doctor,
    /// Draft new scenario records from a feature description using the LLM.
    Generate {
        /// Natural-language description of the feature to cover.
        description: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may hold TURING_ANTHROPIC_API_KEY; existing env vars win.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { analyze } => handle_run(cli.config.as_deref(), analyze).await,
        Command::List => handle_list(),
        Command::Doctor => handle_doctor(cli.config.as_deref()).await,
        Command::Generate { description } => {
            handle_generate(cli.config.as_deref(), &description).await
        }
    }
}

/// Run the scenario suite against the configured target.
async fn handle_run(config_path: Option<&Path>, analyze: bool) -> anyhow::Result<()> {
    let config = TuringConfig::load_with(config_path).context("failed to load configuration")?;

    let logs_dir = turing::logging::default_logs_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine home directory for logs"))?;
    let _logging_guard = turing::logging::init_run(&logs_dir, &config.runner.log_level)?;

    let registry = catalog::builtin().context("failed to load scenario catalogue")?;
    let driver = build_driver(&config);

    let suite = SuiteRunner::new(Verifier::new(config.runner.excerpt_chars));
    let report = suite.run(&registry, driver.as_ref()).await;

    println!(
        "suite finished: {} passed, {} failed, {} total",
        report.passed, report.failed, report.total
    );
    for outcome in report.failures() {
        println!();
        println!("FAIL {} [{}]", outcome.name, outcome.category);
        for failure in &outcome.result.failures {
            println!("  - {failure}");
        }
    }

    let report_dir = Path::new(&config.report.dir);
    let report_path = runner::write_report(&report, report_dir)
        .await
        .context("failed to write run report")?;
    println!();
    println!("report written to {}", report_path.display());

    if analyze && report.failed > 0 {
        run_analyses(&config, &report, report_dir).await?;
    }

    if !report.all_passed() {
        // Flush file logs before the nonzero exit.
        drop(_logging_guard);
        std::process::exit(1);
    }
    Ok(())
}

/// Send each failed outcome to the LLM analyst and save the analyses.
async fn run_analyses(
    config: &TuringConfig,
    report: &runner::RunReport,
    report_dir: &Path,
) -> anyhow::Result<()> {
    let analyst_config = config.analyst.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "no analyst configured; set TURING_ANTHROPIC_API_KEY or add an [analyst] table to turing.toml"
        )
    })?;

    let analyst = FailureAnalyst::new(
        analyst_config.api_key.clone(),
        analyst_config.model.clone(),
    );

    for outcome in report.failures() {
        info!(scenario = %outcome.name, "requesting failure analysis");
        match analyst.analyze(outcome).await {
            Ok(analysis) => {
                let path = analyst::save_analysis(&analysis, &outcome.name, report_dir)
                    .await
                    .context("failed to save failure analysis")?;
                println!(
                    "analysis for {:?} written to {}",
                    outcome.name,
                    path.display()
                );
            }
            Err(e) => {
                warn!(scenario = %outcome.name, error = %e, "failure analysis failed");
            }
        }
    }

    Ok(())
}

/// List the built-in scenario catalogue grouped by category.
fn handle_list() -> anyhow::Result<()> {
    turing::logging::init_cli("info");

    let registry = catalog::builtin().context("failed to load scenario catalogue")?;

    println!("{} scenarios in the built-in catalogue", registry.len());
    for category in Category::ALL {
        let scenarios: Vec<_> = registry.in_category(category).collect();
        if scenarios.is_empty() {
            continue;
        }
        println!();
        println!("{category} ({})", scenarios.len());
        for scenario in scenarios {
            println!("  {} (expects: {})", scenario.name, scenario.expected);
        }
    }

    Ok(())
}

/// Check configuration and target reachability without sending scenarios.
async fn handle_doctor(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = TuringConfig::load_with(config_path).context("failed to load configuration")?;
    turing::logging::init_cli(&config.runner.log_level);

    let resolved_path = match config_path {
        Some(p) => p.to_path_buf(),
        None => TuringConfig::config_path().context("failed to resolve config path")?,
    };
    println!("config file: {}", resolved_path.display());
    println!("target mode: {}", config.target.mode.label());
    println!("target url: {}", config.target.url);
    if let Err(e) = url::Url::parse(&config.target.url) {
        println!("  warning: target url does not parse: {e}");
    }
    if config.target.mode == TargetMode::Bridge {
        println!("bridge url: {}", config.bridge.base_url);
        if let Err(e) = url::Url::parse(&config.bridge.base_url) {
            println!("  warning: bridge url does not parse: {e}");
        }
    }
    println!(
        "response timeout: {}s",
        config.runner.response_timeout_seconds
    );
    println!("report dir: {}", config.report.dir);
    println!(
        "analyst: {}",
        if config.analyst.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    let registry = catalog::builtin().context("failed to load scenario catalogue")?;
    println!("catalogue: {} scenarios", registry.len());

    let driver = build_driver(&config);
    println!();
    match driver.health_check().await {
        Ok(health) => {
            let (kind, state, details) = match &health {
                DriverHealth::Healthy { kind, details } => (kind, "healthy", details),
                DriverHealth::Degraded { kind, details } => (kind, "degraded", details),
                DriverHealth::Unavailable { kind, details } => (kind, "unavailable", details),
            };
            println!("driver {}: {state} ({details})", kind.label());
            if !health.is_healthy() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            println!("driver health check failed: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Draft scenario records for a feature description and save them for review.
async fn handle_generate(config_path: Option<&Path>, description: &str) -> anyhow::Result<()> {
    let config = TuringConfig::load_with(config_path).context("failed to load configuration")?;
    turing::logging::init_cli(&config.runner.log_level);

    let analyst_config = config.analyst.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "scenario generation needs an API key; set TURING_ANTHROPIC_API_KEY or add an [analyst] table to turing.toml"
        )
    })?;

    let drafter = ScenarioGenerator::new(
        analyst_config.api_key.clone(),
        analyst_config.model.clone(),
    );

    info!(model = %analyst_config.model, "requesting scenario drafts");
    let records = drafter
        .generate(description)
        .await
        .context("scenario generation failed")?;

    let path = generator::save_scenarios(&records, description, Path::new(&config.report.dir))
        .await
        .context("failed to save generated scenarios")?;

    println!("{} scenarios drafted", records.len());
    println!("drafts written to {}", path.display());
    println!("review the phrase contracts before relying on them");
    Ok(())
}

/// Construct the chat driver for the configured target mode.
fn build_driver(config: &TuringConfig) -> Box<dyn ChatDriver> {
    match config.target.mode {
        TargetMode::Mock => Box::new(ScriptedDriver::mock_eva()),
        TargetMode::Bridge => Box::new(BridgeDriver::new(
            config.bridge.base_url.clone(),
            config.target.url.clone(),
            config.runner.response_timeout_seconds,
        )),
    }
}
