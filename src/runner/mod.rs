//! Suite orchestration and run reporting.
//!
//! The runner walks the scenario registry in order, asks the driver for a
//! reply to each scripted input, and hands reply and record to the
//! verifier. One scenario's failure never aborts the run: driver timeouts
//! and transport errors are folded into that scenario's outcome (a missing
//! reply and an empty reply read the same to the contract) and evaluation
//! continues. The finished [`RunReport`] can be written to disk as JSON
//! for later analysis.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::driver::ChatDriver;
use crate::scenario::{Category, ResponseBehavior, ScenarioRegistry};
use crate::verifier::{VerificationResult, Verifier};

/// Outcome of one scenario within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name, unique within the run.
    pub name: String,
    /// Topical grouping, echoed for report readers.
    pub category: Category,
    /// Behaviour the reply was held to.
    pub expected: ResponseBehavior,
    /// The scripted input that was sent.
    pub user_input: String,
    /// Truncated capture of the reply, empty when none arrived.
    pub response_excerpt: String,
    /// The verifier's verdict for this scenario.
    pub result: VerificationResult,
    /// Wall-clock time spent driving and checking this scenario.
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Whether this scenario passed all checks.
    pub fn passed(&self) -> bool {
        self.result.passed
    }
}

/// Full record of one suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Driver kind label that produced the replies.
    pub driver: String,
    /// Number of scenarios evaluated.
    pub total: usize,
    /// Number of scenarios that passed.
    pub passed: usize,
    /// Number of scenarios that failed.
    pub failed: usize,
    /// Per-scenario outcomes in registry order.
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunReport {
    /// Whether every scenario in the run passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Failed outcomes in registry order.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// Drives the registry through a chat driver and collects outcomes.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    verifier: Verifier,
}

impl SuiteRunner {
    /// Create a runner evaluating replies with the given verifier.
    pub fn new(verifier: Verifier) -> Self {
        Self { verifier }
    }

    /// Evaluate every registry scenario against the driver, in order.
    ///
    /// Scenarios are independent; a failed or unreachable one is recorded
    /// and the run moves on.
    pub async fn run(&self, registry: &ScenarioRegistry, driver: &dyn ChatDriver) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            run_id = %run_id,
            driver = driver.kind().label(),
            scenarios = registry.len(),
            "starting suite run"
        );

        let mut outcomes = Vec::with_capacity(registry.len());
        for record in registry.scenarios() {
            let started = Instant::now();
            debug!(scenario = %record.name, "sending scenario input");

            let (response_excerpt, result) =
                match driver.send_and_capture(&record.user_input).await {
                    Ok(text) => {
                        let result = self.verifier.verify(record, &text);
                        (self.verifier.excerpt(&text), result)
                    }
                    Err(e) => {
                        warn!(scenario = %record.name, error = %e, "no response captured");
                        (
                            String::new(),
                            VerificationResult::empty_response(format!(
                                "no response captured: {e}"
                            )),
                        )
                    }
                };

            let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            info!(
                scenario = %record.name,
                passed = result.passed,
                duration_ms,
                "scenario evaluated"
            );

            outcomes.push(ScenarioOutcome {
                name: record.name.clone(),
                category: record.category,
                expected: record.expected,
                user_input: record.user_input.clone(),
                response_excerpt,
                result,
                duration_ms,
            });
        }

        let passed = outcomes.iter().filter(|o| o.passed()).count();
        let failed = outcomes.len().saturating_sub(passed);
        info!(run_id = %run_id, passed, failed, "suite run finished");

        RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            driver: driver.kind().label().to_owned(),
            total: outcomes.len(),
            passed,
            failed,
            outcomes,
        }
    }
}

/// Write a run report to `dir` as pretty-printed JSON.
///
/// Writes to a temporary file first, then renames to the final path, so
/// readers always see a complete file. Returns the report path.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or serialization or
/// file operations fail.
pub async fn write_report(report: &RunReport, dir: &Path) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create report directory {}", dir.display()))?;

    let short_id: String = report.run_id.simple().to_string().chars().take(8).collect();
    let file_name = format!(
        "run-{}-{short_id}.json",
        report.started_at.format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(file_name);

    let json = serde_json::to_string_pretty(report).context("failed to serialize run report")?;

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .context("failed to write report temp file")?;
    tokio::fs::rename(&tmp_path, &path)
        .await
        .context("failed to rename report temp file")?;

    debug!(path = %path.display(), "run report written");
    Ok(path)
}
