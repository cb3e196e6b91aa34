// Scenario reports

use super::verify::ArtifactSummary;
use crate::domain::Scenario;
use crate::error::HarnessError;
use serde::Serialize;
use std::path::PathBuf;

/// Result of one passing scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub label: String,
    pub command: String,
    pub workspace: PathBuf,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
    pub artifacts: ArtifactSummary,
}

/// Verdict for one entry of a matrix run
#[derive(Debug)]
pub enum ScenarioOutcome {
    Passed(ScenarioReport),
    Failed {
        scenario: Scenario,
        error: HarnessError,
    },
    Skipped {
        scenario: Scenario,
        reasons: Vec<String>,
    },
}

impl ScenarioOutcome {
    pub fn scenario(&self) -> &Scenario {
        match self {
            ScenarioOutcome::Passed(report) => &report.scenario,
            ScenarioOutcome::Failed { scenario, .. } | ScenarioOutcome::Skipped { scenario, .. } => {
                scenario
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ScenarioOutcome::Failed { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            ScenarioOutcome::Passed(_) => "passed",
            ScenarioOutcome::Failed { .. } => "failed",
            ScenarioOutcome::Skipped { .. } => "skipped",
        }
    }

    /// One-line explanation for tables and JSON output
    pub fn detail(&self) -> String {
        match self {
            ScenarioOutcome::Passed(report) => format!(
                "{} snapshots, {} logs in {}ms",
                report.artifacts.snapshots, report.artifacts.logs, report.duration_ms
            ),
            ScenarioOutcome::Failed { error, .. } => error.to_string(),
            ScenarioOutcome::Skipped { reasons, .. } => reasons.join("; "),
        }
    }
}

/// Serializable row for machine-readable output; passing runs carry their report
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRow {
    pub scenario: String,
    pub status: &'static str,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ScenarioReport>,
}

impl From<&ScenarioOutcome> for OutcomeRow {
    fn from(outcome: &ScenarioOutcome) -> Self {
        let report = match outcome {
            ScenarioOutcome::Passed(report) => Some(report.clone()),
            _ => None,
        };
        Self {
            scenario: outcome.scenario().to_string(),
            status: outcome.status(),
            detail: outcome.detail(),
            report,
        }
    }
}
